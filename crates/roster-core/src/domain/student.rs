use crate::domain::ids::StudentId;
use crate::rules::duplicates::{normalize_text, NormalizedTriple};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: StudentId,
    pub full_name: String,
    pub email: String,
    pub course: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl StudentRecord {
    pub fn normalized_triple(&self) -> NormalizedTriple {
        NormalizedTriple::new(&self.full_name, &self.email, &self.course)
    }
}

/// Canonical stored form of an email address: trimmed, inner whitespace
/// collapsed, lowercased. `None` when nothing is left.
pub fn normalize_email(value: &str) -> Option<String> {
    let normalized = normalize_text(value);
    if normalized.is_empty() {
        return None;
    }
    Some(normalized)
}
