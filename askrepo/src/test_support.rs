//! Test-only helpers: scripted reasoning service and fixture projects.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow};
use serde_json::json;
use tempfile::TempDir;

use crate::io::service::{ReasoningService, ServiceRequest};

/// One scripted reply from the reasoning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    /// Raw reply text.
    Text(String),
    /// A service-level failure with the given message.
    Error(String),
}

/// Build a `{"files": [...]}` reply.
pub fn selection_reply(files: &[&str]) -> ScriptedReply {
    ScriptedReply::Text(json!({ "files": files }).to_string())
}

/// Reasoning service that replays queued replies and records every request.
///
/// Errors once the queue is empty so tests notice unexpected extra calls.
#[derive(Debug, Default)]
pub struct ScriptedService {
    replies: RefCell<VecDeque<ScriptedReply>>,
    requests: RefCell<Vec<ServiceRequest>>,
}

impl ScriptedService {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.requests.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl ReasoningService for ScriptedService {
    fn complete(&self, request: &ServiceRequest) -> Result<String> {
        self.requests.borrow_mut().push(request.clone());
        match self.replies.borrow_mut().pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Error(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("scripted service has no reply queued")),
        }
    }
}

/// Temporary project directory populated with source files.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Create a project holding the given `(relative path, contents)` files.
    pub fn with_files(files: &[(&str, &str)]) -> Result<Self> {
        let project = Self::new()?;
        for (path, contents) in files {
            project.write(path, contents.as_bytes())?;
        }
        Ok(project)
    }

    pub fn write(&self, relative: &str, contents: &[u8]) -> Result<()> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
