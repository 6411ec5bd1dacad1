/// The bookable slots of one day: a fixed, finite, ordered list of display
/// labels, independent of any particular day's bookings. The list comes from
/// configuration (`SLOT_CATALOGUE`), not from the store; labels may be
/// 12-hour ("09:00 AM") or 24-hour ("09:00") depending on deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalogue {
    labels: Vec<String>,
}

impl SlotCatalogue {
    /// Parse a comma-separated label list. Surrounding whitespace is
    /// trimmed, empty entries are dropped, order is preserved.
    pub fn from_config(raw: &str) -> Self {
        let labels = raw
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();

        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|known| known == label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
