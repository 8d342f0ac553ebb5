use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Collaborator bucket used when a row has no collaborator name.
pub const UNKNOWN_COLLABORATOR: &str = "Inconnu";
/// Client bucket used when a row has no client name.
pub const UNKNOWN_CLIENT: &str = "N/A";

/// One normalized spreadsheet row, keyed by trimmed header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Set of names that remembers first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSet(Vec<String>);

impl NameSet {
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.0.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|existing| existing == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The `n` most recently inserted names, oldest first.
    pub fn last(&self, n: usize) -> &[String] {
        &self.0[self.0.len().saturating_sub(n)..]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorSummary {
    pub name: String,
    pub hours: f64,
    pub clients: NameSet,
    pub tasks: Vec<String>,
    pub weeks: NameSet,
}

impl CollaboratorSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub name: String,
    pub hours: f64,
    pub collaborators: NameSet,
    pub missions: usize,
    pub weeks: NameSet,
}

impl ClientSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Implemented by summaries so views can sort and filter both kinds alike.
pub trait Summary {
    fn name(&self) -> &str;
    fn hours(&self) -> f64;
}

impl Summary for CollaboratorSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn hours(&self) -> f64 {
        self.hours
    }
}

impl Summary for ClientSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn hours(&self) -> f64 {
        self.hours
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub title: String,
    pub author: String,
    pub text: String,
    /// Raw timestamp as found in the sheet, or RFC 3339 when the sheet had none.
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Basse,
    #[default]
    Normale,
    Haute,
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "basse" | "low" => Ok(Self::Basse),
            "normale" | "normal" | "" => Ok(Self::Normale),
            "haute" | "high" => Ok(Self::Haute),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Static link card shown in the documents section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentLink {
    pub label: &'static str,
    pub icon: &'static str,
    pub url: &'static str,
}
