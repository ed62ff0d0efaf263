use crate::domain::{StudentId, StudentRecord};

/// Trim, collapse whitespace runs to a single space, lowercase.
pub fn normalize_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for part in value.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(part.chars().flat_map(char::to_lowercase));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedTriple {
    pub full_name: String,
    pub email: String,
    pub course: String,
}

impl NormalizedTriple {
    pub fn new(full_name: &str, email: &str, course: &str) -> Self {
        Self {
            full_name: normalize_text(full_name),
            email: normalize_text(email),
            course: normalize_text(course),
        }
    }
}

/// First record other than `exclude` whose normalized triple equals
/// `candidate`.
pub fn find_duplicate<'a, I>(
    candidate: &NormalizedTriple,
    records: I,
    exclude: Option<StudentId>,
) -> Option<&'a StudentRecord>
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    records
        .into_iter()
        .filter(|record| Some(record.id) != exclude)
        .find(|record| record.normalized_triple() == *candidate)
}

pub fn is_duplicate<'a, I>(
    candidate: &NormalizedTriple,
    records: I,
    exclude: Option<StudentId>,
) -> bool
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    find_duplicate(candidate, records, exclude).is_some()
}
