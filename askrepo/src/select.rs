//! Selection planner: ask the reasoning service which files are still needed.
//!
//! Each invocation renders one selection prompt, then runs a bounded retry
//! loop. Every attempt sends a fresh request built from an append-only
//! [`Conversation`]; an invalid reply extends that conversation with one
//! user correction listing every problem. The rejected reply itself is not
//! carried forward.

use anyhow::{Context, Result};
use jsonschema::{Draft, Validator};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::core::collected::CollectedContent;
use crate::core::file_set::ProjectFileSet;
use crate::core::path_validator::{MAX_FILES_PER_ROUND, validate_selection};
use crate::core::types::{Conversation, FileSelection, Message, SelectionOutcome};
use crate::io::config::SessionConfig;
use crate::io::prompt::{PromptEngine, SELECTION_SYSTEM, SelectionPromptInputs};
use crate::io::service::{ReasoningService, ResponseSchema, ServiceRequest};

const FILE_SELECTION_SCHEMA: &str = include_str!("../schemas/file_selection.schema.json");
const FILE_SELECTION_SCHEMA_NAME: &str = "file_selection";

/// Retry and size limits for one planner invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Total reasoning-service attempts before giving up.
    pub max_attempts: u32,
    /// Maximum files a valid selection may name.
    pub max_files: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_files: MAX_FILES_PER_ROUND,
        }
    }
}

impl From<&SessionConfig> for PlannerConfig {
    fn from(session: &SessionConfig) -> Self {
        Self {
            max_attempts: session.max_selection_attempts,
            max_files: session.max_files_per_round,
        }
    }
}

/// Builds selection requests and validates replies against the project index.
pub struct SelectionPlanner {
    config: PlannerConfig,
    engine: PromptEngine,
    schema: Value,
    validator: Validator,
}

impl SelectionPlanner {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        let schema: Value =
            serde_json::from_str(FILE_SELECTION_SCHEMA).context("parse file selection schema")?;
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&schema)
            .context("compile file selection schema")?;
        Ok(Self {
            config,
            engine: PromptEngine::new(),
            schema,
            validator,
        })
    }

    /// Ask which files are still needed to answer `question`.
    ///
    /// Returns `Selected` for a valid non-empty list, `Converged` for a valid
    /// empty list and `Exhausted` once every attempt produced an invalid
    /// reply. Service failures propagate unchanged.
    #[instrument(skip_all, fields(known = known.len(), collected = collected.len()))]
    pub fn plan<S: ReasoningService>(
        &self,
        service: &S,
        question: &str,
        known: &ProjectFileSet,
        collected: &CollectedContent,
    ) -> Result<SelectionOutcome> {
        let prompt = self.engine.render_selection(&SelectionPromptInputs {
            question,
            known,
            collected,
            max_files: self.config.max_files,
        })?;
        let mut conversation = Conversation::new(SELECTION_SYSTEM).with(Message::user(prompt));
        let mut problems = Vec::new();

        for attempt in 1..=self.config.max_attempts {
            let request = ServiceRequest {
                conversation: conversation.clone(),
                response_schema: Some(ResponseSchema {
                    name: FILE_SELECTION_SCHEMA_NAME.to_string(),
                    schema: self.schema.clone(),
                }),
            };
            let reply = service.complete(&request)?;

            problems = match self.parse_reply(&reply) {
                Ok(selection) => {
                    let found = validate_selection(&selection.files, known, self.config.max_files);
                    if found.is_empty() {
                        debug!(attempt, files = selection.files.len(), "selection accepted");
                        return Ok(if selection.files.is_empty() {
                            SelectionOutcome::Converged
                        } else {
                            SelectionOutcome::Selected(selection.files)
                        });
                    }
                    found
                }
                Err(found) => found,
            };

            warn!(attempt, problems = ?problems, "invalid file selection");
            println!(
                "retry {attempt}/{}: invalid file selection, regenerating",
                self.config.max_attempts
            );
            let correction = self
                .engine
                .render_correction(&problems, self.config.max_files)?;
            conversation = conversation.with(Message::user(correction));
        }

        println!(
            "no valid file selection after {} attempts, returning an empty selection",
            self.config.max_attempts
        );
        Ok(SelectionOutcome::Exhausted {
            attempts: self.config.max_attempts,
            problems,
        })
    }

    /// Parse a reply into the `{ files: string[] }` shape.
    ///
    /// Shape failures are reported as problem strings so they take the same
    /// retry path as failed path validation.
    fn parse_reply(&self, reply: &str) -> Result<FileSelection, Vec<String>> {
        let value: Value = serde_json::from_str(strip_markdown_fences(reply))
            .map_err(|err| vec![format!("response is not valid JSON: {err}")])?;
        let messages: Vec<String> = self
            .validator
            .iter_errors(&value)
            .map(|err| format!("response does not match the file selection schema: {err}"))
            .collect();
        if !messages.is_empty() {
            return Err(messages);
        }
        serde_json::from_value(value)
            .map_err(|err| vec![format!("response does not match the file selection schema: {err}")])
    }
}

/// Strip markdown code fences some models wrap around JSON replies.
fn strip_markdown_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let clean = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    clean.strip_suffix("```").unwrap_or(clean).trim()
}
