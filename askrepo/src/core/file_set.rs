//! Ground-truth list of project files produced by the project index.

use std::collections::HashSet;

/// Ordered, duplicate-free list of project-relative file paths.
///
/// Built once per session and never mutated. Keeps a hash index next to the
/// ordered list so membership checks stay cheap for large projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFileSet {
    paths: Vec<String>,
    index: HashSet<String>,
}

impl ProjectFileSet {
    /// Build a set from paths in traversal order. Later duplicates are dropped.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for path in paths {
            let path = path.into();
            if set.index.insert(path.clone()) {
                set.paths.push(path);
            }
        }
        set
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains(path)
    }

    /// Paths in traversal order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_occurrence_order() {
        let set = ProjectFileSet::from_paths(["b.py", "a.py", "b.py", "c/d.go"]);
        assert_eq!(set.paths(), ["b.py", "a.py", "c/d.go"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn membership_is_exact() {
        let set = ProjectFileSet::from_paths(["src/main.py"]);
        assert!(set.contains("src/main.py"));
        assert!(!set.contains("main.py"));
        assert!(!set.contains("./src/main.py"));
    }
}
