//! File reader that tolerates undecodable files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Read `relative` under `root` as UTF-8 text.
///
/// Returns `Ok(None)` when the bytes are not valid UTF-8 or the file is
/// empty; such a file contributes nothing to the session. A diagnostic is
/// printed for decode failures. Other I/O errors propagate.
pub fn read_source(root: &Path, relative: &str) -> Result<Option<String>> {
    let path = root.join(relative);
    let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    match String::from_utf8(bytes) {
        Ok(text) if text.is_empty() => {
            debug!(path = relative, "file is empty");
            Ok(None)
        }
        Ok(text) => Ok(Some(text)),
        Err(err) => {
            warn!(path = relative, err = %err, "file is not valid UTF-8");
            println!("cannot read {relative} as UTF-8 text, skipping");
            Ok(None)
        }
    }
}
