pub mod serde_ext;
pub mod validate;

pub use validate::{ValidatedJson, ValidatedQuery};
