//! File contents accumulated across retrieval rounds.

use std::collections::BTreeMap;

use crate::core::file_set::ProjectFileSet;

/// Mapping from project-relative path to decoded file text.
///
/// Grows monotonically: an entry is never removed, never overwritten and
/// never stored with empty content. Iteration is in path order so rendered
/// prompts are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedContent {
    files: BTreeMap<String, String>,
}

impl CollectedContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Record `content` for `path`.
    ///
    /// Returns `false` (and stores nothing) when the path is already collected
    /// or the content is empty.
    pub fn insert(&mut self, path: impl Into<String>, content: String) -> bool {
        let path = path.into();
        if content.is_empty() || self.files.contains_key(&path) {
            return false;
        }
        self.files.insert(path, content);
        true
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    /// True if every collected path is a member of `known`.
    pub fn is_subset_of(&self, known: &ProjectFileSet) -> bool {
        self.paths().all(|path| known.contains(path))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
