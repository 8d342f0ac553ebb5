use std::collections::{HashMap, HashSet};

use shared::domain::{
    ClientSummary, CollaboratorSummary, Record, Summary, UNKNOWN_CLIENT, UNKNOWN_COLLABORATOR,
};

use crate::{format::fixed1, schema::Field};

/// Summaries keyed by name, iterated in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Keyed<T> {
    fn get_or_insert_with(&mut self, name: &str, create: impl FnOnce() -> T) -> &mut T {
        let slot = match self.index.get(name) {
            Some(slot) => *slot,
            None => {
                self.entries.push(create());
                let slot = self.entries.len() - 1;
                self.index.insert(name.to_string(), slot);
                slot
            }
        };
        &mut self.entries[slot]
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|slot| &self.entries[*slot])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub collaborators: Keyed<CollaboratorSummary>,
    pub clients: Keyed<ClientSummary>,
}

/// Folds records into per-collaborator and per-client summaries.
///
/// Always starts from empty maps; there is no incremental path.
pub fn aggregate(records: &[Record]) -> Aggregates {
    let mut aggregates = Aggregates::default();

    for record in records {
        let collaborator = Field::Collaborator.resolve_or(record, UNKNOWN_COLLABORATOR);
        let client = Field::Client.resolve_or(record, UNKNOWN_CLIENT);
        let hours = record_hours(record);
        let task = Field::Tasks.resolve(record);
        let week = Field::Week.resolve(record);

        let summary = aggregates
            .collaborators
            .get_or_insert_with(collaborator, || CollaboratorSummary::new(collaborator));
        summary.hours += hours;
        summary.clients.insert(client);
        if let Some(task) = task {
            summary.tasks.push(task.to_string());
        }
        if let Some(week) = week {
            summary.weeks.insert(week);
        }

        let summary = aggregates
            .clients
            .get_or_insert_with(client, || ClientSummary::new(client));
        summary.hours += hours;
        summary.collaborators.insert(collaborator);
        summary.missions += 1;
        if let Some(week) = week {
            summary.weeks.insert(week);
        }
    }

    aggregates
}

pub fn record_hours(record: &Record) -> f64 {
    parse_hours(Field::Hours.resolve_or(record, ""))
}

/// Hours worked as written in a cell. Anything that does not start with a
/// number, or that parses negative or non-finite, counts as zero.
pub fn parse_hours(raw: &str) -> f64 {
    match parse_float_prefix(raw) {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Longest leading decimal number in `raw`, after leading whitespace.
/// `"3.5h"` gives 3.5 and `"3,5"` gives 3.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// Headline figures shown above the hours table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardTotals {
    pub total_hours: f64,
    pub collaborators: usize,
    pub clients: usize,
    pub distinct_weeks: usize,
}

impl DashboardTotals {
    pub fn compute(records: &[Record], aggregates: &Aggregates) -> Self {
        let total_hours = records.iter().map(record_hours).fold(0.0, |acc, hours| acc + hours);
        // Rows with no week still count as one shared "empty" week.
        let weeks: HashSet<&str> = records
            .iter()
            .map(|record| Field::Week.resolve_or(record, ""))
            .collect();

        Self {
            total_hours,
            collaborators: aggregates.collaborators.len(),
            clients: aggregates.clients.len(),
            distinct_weeks: weeks.len(),
        }
    }

    pub fn average_per_week(&self) -> Option<f64> {
        (self.distinct_weeks > 0).then(|| self.total_hours / self.distinct_weeks as f64)
    }

    pub fn total_label(&self) -> String {
        format!("{} h", fixed1(self.total_hours))
    }

    pub fn average_label(&self) -> String {
        self.average_per_week()
            .map(|average| format!("{} h", fixed1(average)))
            .unwrap_or_else(|| "--".to_string())
    }
}

/// Name filter then stable descending sort by hours; equal hours keep
/// first-seen order.
pub fn ranked<'a, T: Summary>(items: impl IntoIterator<Item = &'a T>, filter: &str) -> Vec<&'a T>
where
    T: 'a,
{
    let needle = filter.to_lowercase();
    let mut ranked: Vec<&T> = items
        .into_iter()
        .filter(|item| item.name().to_lowercase().contains(&needle))
        .collect();
    ranked.sort_by(|a, b| {
        b.hours()
            .partial_cmp(&a.hours())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

#[cfg(test)]
#[path = "tests/aggregate_tests.rs"]
mod tests;
