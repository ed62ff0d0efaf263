use thiserror::Error;

pub const DUPLICATE_RECORD_MESSAGE: &str = "duplicate data is not allowed";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "email already exists";
pub const NOT_FOUND_MESSAGE: &str = "Student not found";
pub const INTERNAL_MESSAGE: &str = "Server error";

/// First violated rule of the student rule set.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("fullName, email, and course are required.")]
    Required(Field),
    #[error("full name too short.")]
    NameTooShort,
    #[error("enter full name")]
    NameNotFull,
    #[error("full name must contain letters only.")]
    NameNotLetters,
    #[error("enter a valid email.")]
    InvalidEmail,
    #[error("course too short.")]
    CourseTooShort,
}

impl ValidationError {
    /// Form field the message should be attached to.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Required(field) => *field,
            ValidationError::NameTooShort
            | ValidationError::NameNotFull
            | ValidationError::NameNotLetters => Field::FullName,
            ValidationError::InvalidEmail => Field::Email,
            ValidationError::CourseTooShort => Field::Course,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    Email,
    Course,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::FullName => "Full Name",
            Field::Email => "Email",
            Field::Course => "Course",
        }
    }

    /// Routes a server-side message to a form field: anything mentioning
    /// email lands on the email input, everything else on the name input.
    pub fn for_message(message: &str) -> Field {
        if message.to_ascii_lowercase().contains("email") {
            Field::Email
        } else {
            Field::FullName
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::{Field, ValidationError};

    #[test]
    fn field_for_message_prefers_email() {
        assert_eq!(Field::for_message("Email already exists"), Field::Email);
        assert_eq!(
            Field::for_message("duplicate data is not allowed"),
            Field::FullName
        );
    }

    #[test]
    fn rule_errors_map_to_fields() {
        assert_eq!(ValidationError::NameNotFull.field(), Field::FullName);
        assert_eq!(ValidationError::InvalidEmail.field(), Field::Email);
        assert_eq!(ValidationError::CourseTooShort.field(), Field::Course);
        assert_eq!(
            ValidationError::Required(Field::Course).field(),
            Field::Course
        );
    }
}
