//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding the data file exists; warn if the file itself is missing.
pub async fn ensure_data_file_dir(data_file: &str) -> anyhow::Result<()> {
    let path = Path::new(data_file);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    }
    if tokio::fs::metadata(path).await.is_err() {
        warn!(%data_file, "data file not found; starting with an empty collection");
    } else {
        info!(%data_file, "using existing data file");
    }
    Ok(())
}
