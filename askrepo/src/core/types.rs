//! Shared deterministic types for the retrieval core.
//!
//! These types define stable contracts between the planner, the loop
//! controller and the reasoning service. They hold no I/O handles.

use serde::{Deserialize, Serialize};

/// Structured reply expected from a file-selection call.
///
/// Mirrors `schemas/file_selection.schema.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSelection {
    pub files: Vec<String>,
}

/// Speaker of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered dialogue sent to the reasoning service.
///
/// Append-only: [`Conversation::with`] consumes the value and returns the
/// extended log, so earlier messages are never rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation with a system instruction.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system)],
        }
    }

    /// Return this conversation with `message` appended.
    #[must_use]
    pub fn with(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Result of one selection-planner invocation.
///
/// `Converged` and `Exhausted` both mean "request nothing further", but are
/// kept apart so the controller can report why it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// A validated, non-empty list of files to fetch next.
    Selected(Vec<String>),
    /// The service returned a valid empty selection.
    Converged,
    /// Every attempt produced an invalid selection.
    Exhausted { attempts: u32, problems: Vec<String> },
}

impl SelectionOutcome {
    /// Files to fetch; empty for `Converged` and `Exhausted`.
    pub fn files(&self) -> &[String] {
        match self {
            SelectionOutcome::Selected(files) => files,
            SelectionOutcome::Converged | SelectionOutcome::Exhausted { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }
}
