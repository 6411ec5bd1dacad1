use booking_cell::{Appointment, AppointmentStatus};

use crate::models::{AgendaCounts, AgendaView, DateGroup, SearchCounts};

/// Sort key for a slot label: `hours * 100 + minutes` in 24-hour space.
/// Accepts both "hh:mm AM/PM" catalogue labels (12 AM maps to hour 0,
/// 12 PM stays hour 12) and 24-hour "HH:MM" labels, for which the mapping
/// is the identity. Never displayed. Unparseable labels rank last.
pub fn slot_rank(label: &str) -> u32 {
    parse_slot_rank(label).unwrap_or(u32::MAX)
}

fn parse_slot_rank(label: &str) -> Option<u32> {
    let label = label.trim();

    let (time_part, meridiem) = match label.split_once(' ') {
        Some((time, tag)) => (time, Some(tag.trim())),
        None => (label, None),
    };

    let (hours_str, minutes_str) = time_part.split_once(':')?;
    let hours: u32 = hours_str.parse().ok()?;
    let minutes: u32 = minutes_str.parse().ok()?;
    if minutes > 59 {
        return None;
    }

    let hours = match meridiem {
        Some(tag) if tag.eq_ignore_ascii_case("AM") => {
            if hours == 0 || hours > 12 {
                return None;
            }
            if hours == 12 {
                0
            } else {
                hours
            }
        }
        Some(tag) if tag.eq_ignore_ascii_case("PM") => {
            if hours == 0 || hours > 12 {
                return None;
            }
            if hours == 12 {
                12
            } else {
                hours + 12
            }
        }
        Some(_) => return None,
        None => {
            if hours > 23 {
                return None;
            }
            hours
        }
    };

    Some(hours * 100 + minutes)
}

/// Order by date ascending (lexicographic, valid for zero-padded ISO
/// dates), then slot rank ascending. Stable, hence idempotent.
pub fn sort_appointments(mut list: Vec<Appointment>) -> Vec<Appointment> {
    list.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| slot_rank(&a.time_slot).cmp(&slot_rank(&b.time_slot)))
    });
    list
}

/// Group a sorted list by date, preserving the per-date order and the
/// first-occurrence order of the dates themselves.
pub fn group_by_date(list: &[Appointment]) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();

    for appointment in list {
        match groups.last_mut() {
            Some(group) if group.date == appointment.date => {
                group.appointments.push(appointment.clone());
            }
            _ => groups.push(DateGroup {
                date: appointment.date.clone(),
                appointments: vec![appointment.clone()],
            }),
        }
    }

    groups
}

/// Split sorted-ascending date keys around `today`: keys `>= today` are
/// upcoming (today included), keys `< today` are past. String comparison
/// is valid only under the zero-padded ISO invariant.
pub fn partition_past_future(
    date_keys: &[String],
    today: &str,
) -> (Vec<String>, Vec<String>) {
    let mut future_or_today = Vec::new();
    let mut past = Vec::new();

    for key in date_keys {
        if key.as_str() >= today {
            future_or_today.push(key.clone());
        } else {
            past.push(key.clone());
        }
    }

    (future_or_today, past)
}

/// Case-insensitive substring match on client name, raw substring match on
/// phone (phone is digits and punctuation, nothing to case-fold). The empty
/// query is the identity, not an empty result.
pub fn filter_by_search(list: &[Appointment], query: &str) -> Vec<Appointment> {
    if query.is_empty() {
        return list.to_vec();
    }

    let needle = query.to_lowercase();

    list.iter()
        .filter(|appointment| {
            appointment.client_name.to_lowercase().contains(&needle)
                || appointment.phone.contains(query)
        })
        .cloned()
        .collect()
}

pub fn agenda_counts(list: &[Appointment], today: &str) -> AgendaCounts {
    let active = |a: &&Appointment| a.status != AppointmentStatus::Cancelled;

    AgendaCounts {
        today_active: list
            .iter()
            .filter(active)
            .filter(|a| a.date == today)
            .count(),
        total_active: list.iter().filter(active).count(),
        total_cancelled: list
            .iter()
            .filter(|a| a.status == AppointmentStatus::Cancelled)
            .count(),
    }
}

pub fn search_counts(matches: &[Appointment]) -> SearchCounts {
    let cancelled = matches
        .iter()
        .filter(|a| a.status == AppointmentStatus::Cancelled)
        .count();

    SearchCounts {
        total: matches.len(),
        cancelled,
        effective: matches.len() - cancelled,
    }
}

impl AgendaView {
    /// Derive the whole admin view from the flat list. With a non-empty
    /// query, the groups are built from the matches only (past dates
    /// included) and every group holding a match is presented expanded.
    /// Counts always describe the full list; search counts the matches.
    pub fn build(list: Vec<Appointment>, today: &str, query: Option<&str>) -> Self {
        let sorted = sort_appointments(list);
        let counts = agenda_counts(&sorted, today);

        let query = query.map(str::trim).filter(|q| !q.is_empty());

        let (visible, search) = match query {
            Some(q) => {
                let matches = filter_by_search(&sorted, q);
                let search = search_counts(&matches);
                (matches, Some(search))
            }
            None => (sorted, None),
        };

        let groups = group_by_date(&visible);
        let date_keys: Vec<String> = groups.iter().map(|g| g.date.clone()).collect();
        let (future_or_today, past_keys) = partition_past_future(&date_keys, today);

        let expanded_dates = if query.is_some() {
            date_keys.clone()
        } else {
            Vec::new()
        };

        let (mut upcoming, mut past) = (Vec::new(), Vec::new());
        for group in groups {
            if future_or_today.contains(&group.date) {
                upcoming.push(group);
            } else {
                past.push(group);
            }
        }
        debug_assert_eq!(past.len(), past_keys.len());

        Self {
            today: today.to_string(),
            query: query.map(str::to_string),
            upcoming,
            past,
            counts,
            search,
            expanded_dates,
        }
    }
}
