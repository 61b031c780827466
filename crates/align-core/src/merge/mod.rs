//! Merge-preserving destination updates.
//!
//! Destinations usually carry settings this tool does not own. Merging keeps
//! those intact and replaces only the managed part: the root key of a JSON
//! object, or the namespaced sections of a section-text file.

pub mod json;
pub mod sections;

use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

pub use sections::{merge_sections, strip_managed_sections};

/// Source of the current content of a destination file.
pub trait DestinationReader {
    /// Read the file at `path`, or `Ok(None)` when it does not exist.
    fn read(&self, path: &Path) -> std::io::Result<Option<String>>;

    /// Read the file, treating any I/O failure as absence.
    fn read_lenient(&self, path: &Path) -> Option<String> {
        match self.read(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable destination");
                None
            }
        }
    }
}

/// Reads destinations from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl DestinationReader for FsReader {
    fn read(&self, path: &Path) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}
