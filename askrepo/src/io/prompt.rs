//! Prompt rendering for file selection and answer synthesis.

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::Serialize;

use crate::core::collected::CollectedContent;
use crate::core::file_set::ProjectFileSet;

pub const SELECTION_SYSTEM: &str = include_str!("prompts/selection_system.md");
pub const ANSWER_SYSTEM: &str = include_str!("prompts/answer_system.md");

const SELECTION_TEMPLATE: &str = include_str!("prompts/selection.md");
const CORRECTION_TEMPLATE: &str = include_str!("prompts/correction.md");
const ANSWER_TEMPLATE: &str = include_str!("prompts/answer.md");

/// Collected file for template rendering.
#[derive(Debug, Clone, Serialize)]
struct FileContext<'a> {
    path: &'a str,
    content: &'a str,
}

fn file_contexts(collected: &CollectedContent) -> Vec<FileContext<'_>> {
    collected
        .iter()
        .map(|(path, content)| FileContext { path, content })
        .collect()
}

/// Everything the selection prompt shows the reasoning service.
#[derive(Debug, Clone, Copy)]
pub struct SelectionPromptInputs<'a> {
    pub question: &'a str,
    pub known: &'a ProjectFileSet,
    pub collected: &'a CollectedContent,
    pub max_files: usize,
}

/// Template engine wrapper around minijinja.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template("selection", SELECTION_TEMPLATE)
            .expect("selection template should be valid");
        env.add_template("correction", CORRECTION_TEMPLATE)
            .expect("correction template should be valid");
        env.add_template("answer", ANSWER_TEMPLATE)
            .expect("answer template should be valid");
        Self { env }
    }

    /// Render the user message asking which files are still needed.
    pub fn render_selection(&self, input: &SelectionPromptInputs<'_>) -> Result<String> {
        let collected_paths: Vec<&str> = input.collected.paths().collect();
        let template = self.env.get_template("selection")?;
        let rendered = template
            .render(context! {
                known_files => input.known.paths(),
                collected_paths => collected_paths,
                collected => file_contexts(input.collected),
                question => input.question.trim(),
                max_files => input.max_files,
            })
            .context("render selection prompt")?;
        Ok(rendered)
    }

    /// Render the follow-up message listing every validation problem.
    pub fn render_correction(&self, problems: &[String], max_files: usize) -> Result<String> {
        let template = self.env.get_template("correction")?;
        let rendered = template
            .render(context! { problems => problems, max_files => max_files })
            .context("render correction prompt")?;
        Ok(rendered)
    }

    /// Render the final question over all collected content.
    pub fn render_answer(&self, question: &str, collected: &CollectedContent) -> Result<String> {
        let template = self.env.get_template("answer")?;
        let rendered = template
            .render(context! {
                collected => file_contexts(collected),
                question => question.trim(),
            })
            .context("render answer prompt")?;
        Ok(rendered)
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}
