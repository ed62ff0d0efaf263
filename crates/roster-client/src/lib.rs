pub mod error;

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use roster_core::{MessageDto, StudentId, StudentInput, StudentRecord};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

pub use error::{ClientError, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const STUDENTS_PATH: &str = "students";

/// Blocking client for the student API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("roster/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base: with_trailing_slash(base),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn list_students(&self) -> Result<Vec<StudentRecord>> {
        let url = self.students_url()?;
        debug!(%url, "listing students");
        decode(self.http.get(url).send()?)
    }

    pub fn create_student(&self, input: &StudentInput) -> Result<StudentRecord> {
        let url = self.students_url()?;
        debug!(%url, "creating student");
        decode(self.http.post(url).json(input).send()?)
    }

    pub fn update_student(&self, id: StudentId, input: &StudentInput) -> Result<StudentRecord> {
        let url = self.student_url(id)?;
        debug!(%url, "updating student");
        decode(self.http.put(url).json(input).send()?)
    }

    /// Returns the confirmation message sent by the server.
    pub fn delete_student(&self, id: StudentId) -> Result<String> {
        let url = self.student_url(id)?;
        debug!(%url, "deleting student");
        let body: MessageDto = decode(self.http.delete(url).send()?)?;
        Ok(body.message)
    }

    fn students_url(&self) -> Result<Url> {
        Ok(self.base.join(STUDENTS_PATH)?)
    }

    fn student_url(&self, id: StudentId) -> Result<Url> {
        Ok(self.base.join(&format!("{STUDENTS_PATH}/{id}"))?)
    }
}

// `Url::join` replaces the last path segment unless the base ends in a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }
    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let message = response
        .json::<MessageDto>()
        .map(|body| body.message)
        .unwrap_or(fallback);
    debug!(status = status.as_u16(), %message, "api request rejected");
    Err(ClientError::from_status(status, message))
}
