//! Row mapping and the logical field schema.
//!
//! Sheets are addressed by header name, and the same column has been titled
//! differently over time. Each [`Field`] carries the ordered list of headers
//! it accepts; the first one holding a non-empty value wins.

use shared::domain::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Collaborator,
    Client,
    Hours,
    Tasks,
    Week,
    Title,
    Author,
    Text,
    CreatedAt,
}

impl Field {
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Collaborator => &["Collaborateur"],
            Self::Client => &["Client"],
            Self::Hours => &["Heures"],
            Self::Tasks => &["Tâches réalisées", "Taches"],
            Self::Week => &["Semaine réalisée", "Semaine"],
            Self::Title => &["Titre", "Title"],
            Self::Author => &["Auteur", "Author"],
            Self::Text => &["Texte", "Text"],
            Self::CreatedAt => &["Date", "CreatedAt"],
        }
    }

    /// First non-empty value among this field's aliases.
    pub fn resolve(self, record: &Record) -> Option<&str> {
        self.aliases()
            .iter()
            .filter_map(|alias| record.get(alias))
            .find(|value| !value.is_empty())
    }

    pub fn resolve_or<'a>(self, record: &'a Record, fallback: &'a str) -> &'a str {
        self.resolve(record).unwrap_or(fallback)
    }
}

/// Zips a header row with a data row. Cells past the end of `row` become
/// empty strings; cells past the end of `headers` are dropped.
pub fn map_row<H: AsRef<str>, C: AsRef<str>>(headers: &[H], row: &[C]) -> Record {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let value: &str = row.get(index).map_or("", |cell| cell.as_ref());
            (header.as_ref().trim().to_string(), value.to_string())
        })
        .collect()
}

/// Splits a grid into its header row and maps every following row.
pub fn map_grid(grid: &[Vec<String>]) -> Vec<Record> {
    let Some((headers, rows)) = grid.split_first() else {
        return Vec::new();
    };
    rows.iter().map(|row| map_row(headers, row)).collect()
}

#[cfg(test)]
#[path = "tests/schema_tests.rs"]
mod tests;
