pub mod duplicates;
pub mod validation;

pub use duplicates::{find_duplicate, is_duplicate, normalize_text, NormalizedTriple};
pub use validation::{validate, StudentFields, MIN_COURSE_LEN, MIN_NAME_LEN};
