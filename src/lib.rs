//! Replay harness - drives an external replay validator over a test corpus
//!
//! The corpus holds recordings paired with JSON expectation documents.
//! Each expectation is rendered into a configuration script and the
//! validator is run once per pair; results are collected into a report.

pub mod cli;
pub mod commands;
pub mod common;
pub mod discovery;
pub mod harness;
pub mod invoke;
pub mod report;
pub mod synth;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use report::{CaseOutcome, CaseStatus, RunReport};
