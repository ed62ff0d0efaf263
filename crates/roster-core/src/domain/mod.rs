pub mod ids;
pub mod student;

pub use ids::StudentId;
pub use student::{normalize_email, StudentRecord};
