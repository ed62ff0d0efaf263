use crate::domain::normalize_email;
use crate::dto::StudentInput;
use crate::error::{Field, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;

/// A full name must be strictly longer than this many characters.
pub const MIN_NAME_LEN: usize = 3;
pub const MIN_COURSE_LEN: usize = 3;

static FULL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+(?:\s+[A-Za-z]+)+$").expect("valid full name regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Fields that passed every rule, in their stored form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
    pub full_name: String,
    pub email: String,
    pub course: String,
}

/// Runs the rule set in order and stops at the first violation.
pub fn validate(input: &StudentInput) -> Result<StudentFields, ValidationError> {
    // Presence of all three fields is checked before any format rule.
    let full_name = required(input.full_name.as_deref(), Field::FullName)?;
    let email = required(input.email.as_deref(), Field::Email)?;
    let course = required(input.course.as_deref(), Field::Course)?;

    if full_name.chars().count() <= MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort);
    }
    if full_name.split_whitespace().count() < 2 {
        return Err(ValidationError::NameNotFull);
    }
    if !FULL_NAME_RE.is_match(full_name) {
        return Err(ValidationError::NameNotLetters);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if course.chars().count() < MIN_COURSE_LEN {
        return Err(ValidationError::CourseTooShort);
    }

    let email = normalize_email(email).ok_or(ValidationError::Required(Field::Email))?;
    Ok(StudentFields {
        full_name: full_name.to_string(),
        email,
        course: course.to_string(),
    })
}

fn required(value: Option<&str>, field: Field) -> Result<&str, ValidationError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed),
        _ => Err(ValidationError::Required(field)),
    }
}
