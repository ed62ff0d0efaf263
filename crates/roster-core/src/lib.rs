pub mod domain;
pub mod dto;
pub mod error;
pub mod rules;
pub mod time;

pub use domain::*;
pub use dto::*;
pub use error::{ErrorKind, Field, ValidationError};
pub use rules::*;
