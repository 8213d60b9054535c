//! Storage abstractions for service layer
//!
//! Contains reusable file-backed stores for collections that are persisted
//! as one JSON document and rewritten wholesale on every change.

pub mod json_list_store;
