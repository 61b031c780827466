//! Writing rendered content back to destinations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_destination(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    debug!(path = %path.display(), bytes = content.len(), "wrote destination");
    Ok(())
}
