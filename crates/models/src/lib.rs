//! Directory entities and their field rules.

pub mod errors;
pub mod user;

pub use user::{FormErrors, User, UserInput};
