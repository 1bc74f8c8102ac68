//! Ground-truth checks for a proposed file selection.
//!
//! Purely structural: the validator checks existence and count, never
//! relevance. The "already collected" exclusion is requested in the prompt
//! and is not enforced here.

use crate::core::file_set::ProjectFileSet;

/// Upper bound on files requested in a single round.
pub const MAX_FILES_PER_ROUND: usize = 10;

/// Check a proposed selection against the known project files:
/// - at most `max_files` entries
/// - every entry is a member of `known`
///
/// Returns a list of stable problem messages (empty on success).
pub fn validate_selection(
    proposed: &[String],
    known: &ProjectFileSet,
    max_files: usize,
) -> Vec<String> {
    let mut problems = Vec::new();

    if proposed.len() > max_files {
        problems.push(format!(
            "too many files requested ({} > {})",
            proposed.len(),
            max_files
        ));
    }

    for path in proposed {
        if !known.contains(path) {
            problems.push(format!("file {} does not exist", path));
        }
    }

    problems
}
