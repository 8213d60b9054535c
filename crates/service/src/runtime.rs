//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Make sure the data file can be created; warn when it does not exist yet.
pub async fn ensure_env(users_file: &str) -> anyhow::Result<()> {
    common::env::ensure_data_file_dir(users_file).await
}
