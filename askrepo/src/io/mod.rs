//! I/O helpers for the retrieval session.

pub mod config;
pub mod file_reader;
pub mod project_index;
pub mod prompt;
pub mod service;
