//! Question answering over a source tree by iterative file retrieval.
//!
//! A reasoning service is asked, round by round, which project files it still
//! needs; the selected files are read and fed back until it signals that the
//! collected content is sufficient. The architecture enforces a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (file sets, collected content,
//!   selection validation). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (filesystem, HTTP, prompt rendering).
//!   Isolated behind small seams so tests can script the reasoning service.
//!
//! Orchestration modules ([`select`], [`looping`], [`answer`]) coordinate core
//! logic with I/O to implement a question session.

pub mod answer;
pub mod core;
pub mod io;
pub mod logging;
pub mod looping;
pub mod select;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
