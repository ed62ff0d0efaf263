use serde::{Deserialize, Serialize};

/// Create/update payload as submitted by a client. Fields stay raw until
/// validation cleans them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
}

impl StudentInput {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        course: impl Into<String>,
    ) -> Self {
        Self {
            full_name: Some(full_name.into()),
            email: Some(email.into()),
            course: Some(course.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
