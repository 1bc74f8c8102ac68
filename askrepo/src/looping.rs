//! Retrieval loop controller: request, fetch, repeat until converged.
//!
//! ```text
//! Scanning -> Requesting --empty--> Done
//!                 |   ^
//!            files|   |round += 1
//!                 v   |
//!               Fetching --round == max_iterations--> Insufficient
//! ```

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use crate::core::collected::CollectedContent;
use crate::core::file_set::ProjectFileSet;
use crate::core::types::SelectionOutcome;
use crate::io::config::AskConfig;
use crate::io::file_reader::read_source;
use crate::io::project_index::scan_project;
use crate::io::service::ReasoningService;
use crate::select::{PlannerConfig, SelectionPlanner};

/// Reason why `run_session` stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStop {
    /// The service returned an empty selection.
    Converged,
    /// The planner ran out of attempts; treated like an empty selection.
    SelectionExhausted { problems: Vec<String> },
    /// `max_iterations` rounds passed without an empty selection.
    Insufficient { max_iterations: u32 },
}

impl SessionStop {
    /// True for the terminal states that proceed to answer synthesis.
    pub fn should_answer(&self) -> bool {
        !matches!(self, SessionStop::Insufficient { .. })
    }
}

/// Summary of a retrieval session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub known: ProjectFileSet,
    pub collected: CollectedContent,
    /// Planner invocations performed (at most `max_iterations`).
    pub rounds: u32,
    pub stop: SessionStop,
}

/// Why a selected file contributed nothing this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyCollected,
    Unreadable,
}

/// Progress notifications emitted while the session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent<'a> {
    Scanned { files: usize },
    Requesting { round: u32 },
    Selected { round: u32, files: &'a [String] },
    Fetched { path: &'a str, bytes: usize },
    Skipped { path: &'a str, reason: SkipReason },
}

/// Collect the files needed to answer `question` about the project at `root`.
///
/// Stops on an empty selection (natural convergence or planner exhaustion) or
/// after `config.session.max_iterations` rounds, whichever comes first.
/// Index and service errors abort the session.
#[instrument(skip_all, fields(root = %root.display(), max_iterations = config.session.max_iterations))]
pub fn run_session<S: ReasoningService, F: FnMut(&SessionEvent<'_>)>(
    service: &S,
    question: &str,
    root: &Path,
    config: &AskConfig,
    mut on_event: F,
) -> Result<SessionOutcome> {
    let known = scan_project(root, &config.index.extensions)?;
    on_event(&SessionEvent::Scanned { files: known.len() });

    let planner = SelectionPlanner::new(PlannerConfig::from(&config.session))?;
    let max_iterations = config.session.max_iterations;
    let mut collected = CollectedContent::new();
    let mut rounds = 0u32;

    let stop = loop {
        if rounds >= max_iterations {
            warn!(rounds, "retrieval did not converge");
            break SessionStop::Insufficient { max_iterations };
        }
        rounds += 1;

        on_event(&SessionEvent::Requesting { round: rounds });
        let files = match planner.plan(service, question, &known, &collected)? {
            SelectionOutcome::Selected(files) => files,
            SelectionOutcome::Converged => break SessionStop::Converged,
            SelectionOutcome::Exhausted { problems, .. } => {
                break SessionStop::SelectionExhausted { problems };
            }
        };
        on_event(&SessionEvent::Selected {
            round: rounds,
            files: &files,
        });

        fetch_round(root, &files, &mut collected, &mut on_event)?;
        debug_assert!(collected.is_subset_of(&known));
    };

    info!(rounds, collected = collected.len(), stop = ?stop, "session finished");
    Ok(SessionOutcome {
        known,
        collected,
        rounds,
        stop,
    })
}

/// Read every selected file that is not collected yet.
fn fetch_round<F: FnMut(&SessionEvent<'_>)>(
    root: &Path,
    files: &[String],
    collected: &mut CollectedContent,
    on_event: &mut F,
) -> Result<()> {
    for path in files {
        if collected.contains(path) {
            debug!(path = %path, "already collected");
            on_event(&SessionEvent::Skipped {
                path,
                reason: SkipReason::AlreadyCollected,
            });
            continue;
        }
        match read_source(root, path)? {
            Some(content) => {
                let bytes = content.len();
                collected.insert(path.clone(), content);
                on_event(&SessionEvent::Fetched { path, bytes });
            }
            None => on_event(&SessionEvent::Skipped {
                path,
                reason: SkipReason::Unreadable,
            }),
        }
    }
    Ok(())
}
