use serde::{Deserialize, Serialize};

use booking_cell::Appointment;

// ==============================================================================
// AGENDA VIEW MODELS
// ==============================================================================

/// One date's appointments, in slot order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateGroup {
    pub date: String,
    pub appointments: Vec<Appointment>,
}

/// Headline counters for the admin view, recomputed from the full list on
/// every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaCounts {
    pub today_active: usize,
    pub total_active: usize,
    pub total_cancelled: usize,
}

/// Counters describing an active search: matches in total, cancelled
/// matches, and the effective (total minus cancelled) remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCounts {
    pub total: usize,
    pub cancelled: usize,
    pub effective: usize,
}

/// Everything the admin screen needs for one render, derived from the flat
/// appointment list, a reference "today" and an optional search query.
/// Pure data: building it has no side effects and is restartable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaView {
    pub today: String,
    pub query: Option<String>,
    /// Date groups at or after `today`, ascending.
    pub upcoming: Vec<DateGroup>,
    /// Date groups before `today`, ascending. Hidden by default without a
    /// search, but always part of the searchable set.
    pub past: Vec<DateGroup>,
    pub counts: AgendaCounts,
    pub search: Option<SearchCounts>,
    /// Dates whose groups are presented expanded: with an active search,
    /// every group that contains a match.
    pub expanded_dates: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub q: Option<String>,
    /// Reference day override (ISO `YYYY-MM-DD`); defaults to the server's
    /// local calendar day.
    pub today: Option<String>,
}
