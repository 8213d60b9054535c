//! Service layer for the user directory.
//! - `storage` persists ordered collections as a single JSON document.
//! - `users` holds the repository abstraction and the business-facing service.
//! - Field rules live in the `models` crate and are reused here.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod users;
