//! Structured run results
//!
//! Every discovered recording produces one outcome, in discovery order.
//! The summary line and the process exit code are both derived from the
//! collected outcomes.

use std::path::PathBuf;

use serde::Serialize;

use crate::invoke::Invocation;

/// Final state of one test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    /// The replay tool exited with a non-zero code (or was signalled)
    Failed { exit_code: Option<i32> },
    TimedOut { after_secs: u64 },
    LaunchFailed { message: String },
    /// The recording had no sibling expectation document
    MissingExpectation { expected: PathBuf },
    /// The expectation could not be read or the script not written
    SynthesisFailed { message: String },
}

impl CaseStatus {
    pub fn is_failure(&self) -> bool {
        !matches!(self, CaseStatus::Passed)
    }
}

/// Outcome of a single test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOutcome {
    /// `<dir>/<recording file name>`
    pub case_id: String,
    pub recording: PathBuf,
    #[serde(flatten)]
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CaseOutcome {
    /// Outcome with no captured output
    pub fn new(case_id: String, recording: PathBuf, status: CaseStatus) -> Self {
        Self {
            case_id,
            recording,
            status,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Build an outcome from a finished tool invocation
    pub fn from_invocation(case_id: String, recording: PathBuf, invocation: Invocation) -> Self {
        match invocation {
            Invocation::Exited {
                code,
                stdout,
                stderr,
            } => {
                let status = if code == Some(0) {
                    CaseStatus::Passed
                } else {
                    CaseStatus::Failed { exit_code: code }
                };
                Self {
                    case_id,
                    recording,
                    status,
                    stdout,
                    stderr,
                }
            }
            Invocation::TimedOut { after_secs } => {
                Self::new(case_id, recording, CaseStatus::TimedOut { after_secs })
            }
            Invocation::LaunchFailed { message } => {
                Self::new(case_id, recording, CaseStatus::LaunchFailed { message })
            }
        }
    }

    /// One-line description of why the case failed, `None` if it passed
    pub fn failure_line(&self) -> Option<String> {
        let line = match &self.status {
            CaseStatus::Passed => return None,
            CaseStatus::Failed {
                exit_code: Some(code),
            } => format!("Test \"{}\" failed with exit code {}", self.case_id, code),
            CaseStatus::Failed { exit_code: None } => {
                format!("Test \"{}\" was terminated by a signal", self.case_id)
            }
            CaseStatus::TimedOut { after_secs } => format!(
                "Test \"{}\" timed out after {} seconds",
                self.case_id, after_secs
            ),
            CaseStatus::LaunchFailed { message } => {
                format!("Test \"{}\" could not be run: {}", self.case_id, message)
            }
            CaseStatus::MissingExpectation { expected } => {
                let recording = file_name(&self.recording);
                let expected = file_name(expected);
                let extension = expected
                    .rsplit_once('.')
                    .map(|(_, ext)| ext)
                    .unwrap_or_default();
                format!(
                    "No matching .{} file found for log file {}",
                    extension, recording
                )
            }
            CaseStatus::SynthesisFailed { message } => {
                format!("Test \"{}\" could not be prepared: {}", self.case_id, message)
            }
        };
        Some(line)
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Aggregate of all outcomes of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl RunReport {
    pub fn record(&mut self, outcome: CaseOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of failing cases, missing expectations included
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_failure())
            .count()
    }

    pub fn passed(&self) -> usize {
        self.total() - self.failures()
    }

    /// Process exit status for CI: 0 only when nothing failed
    pub fn exit_code(&self) -> i32 {
        if self.failures() == 0 {
            0
        } else {
            1
        }
    }

    /// The final summary sentence
    pub fn summary(&self) -> String {
        match self.failures() {
            0 => "All tests successful!".to_string(),
            n => format!("{} testcase(s) failed!", n),
        }
    }
}
