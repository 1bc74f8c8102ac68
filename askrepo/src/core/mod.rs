//! Deterministic, pure logic shared by the retrieval loop.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod collected;
pub mod file_set;
pub mod path_validator;
pub mod types;
