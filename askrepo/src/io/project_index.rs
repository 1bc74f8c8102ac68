//! Project index: enumerate source files under a project root.

use std::path::{Component, Path};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::core::file_set::ProjectFileSet;

/// Walk `root` and collect files whose extension is in `extensions`.
///
/// Paths are relative to `root` and always use `/` separators. Siblings are
/// visited in file-name order so the listing is deterministic. Any traversal
/// error (including a missing root) is fatal. Files whose relative path is
/// not valid UTF-8 are left out, since they could not be named back.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn scan_project(root: &Path, extensions: &[String]) -> Result<ProjectFileSet> {
    if !root.is_dir() {
        return Err(anyhow!("project root {} is not a directory", root.display()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !has_allowed_extension(path, extensions) {
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("relativize {}", path.display()))?;
        match to_slash_path(relative) {
            Some(rel) => paths.push(rel),
            None => warn!(path = %relative.display(), "skipping non-UTF-8 file name"),
        }
    }

    debug!(files = paths.len(), "project scanned");
    Ok(ProjectFileSet::from_paths(paths))
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}

fn to_slash_path(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    Some(parts.join("/"))
}
