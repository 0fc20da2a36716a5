//! Replay tool invocation
//!
//! The replay tool is a black box: it is launched once per test case with
//! `<script flag> <script> <recording> <reference>` and judged by its exit
//! code. Output streams are captured so failures can be shown verbatim.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::common::config::ToolConfig;

/// How a single launch of the replay tool ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// The process ran to completion
    Exited {
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The process exceeded the configured timeout and was killed
    TimedOut { after_secs: u64 },
    /// The process could not be started or waited on
    LaunchFailed { message: String },
}

impl Invocation {
    /// Whether the tool reported success
    pub fn succeeded(&self) -> bool {
        matches!(self, Invocation::Exited { code: Some(0), .. })
    }
}

/// Something that can run one replay validation
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Run the validator for one test case and wait for it to finish
    async fn invoke(&self, script: &Path, recording: &Path, reference: &Path) -> Invocation;
}

/// The real replay tool, run as a child process
#[derive(Debug, Clone)]
pub struct ExternalTool {
    binary: PathBuf,
    script_flag: String,
    timeout: Option<Duration>,
}

impl ExternalTool {
    /// Create an invoker for `binary` with the given tool settings
    pub fn new(binary: impl Into<PathBuf>, config: &ToolConfig) -> Self {
        Self {
            binary: binary.into(),
            script_flag: config.script_flag.clone(),
            timeout: config.timeout(),
        }
    }
}

#[async_trait]
impl ToolInvoker for ExternalTool {
    async fn invoke(&self, script: &Path, recording: &Path, reference: &Path) -> Invocation {
        tracing::debug!(
            binary = %self.binary.display(),
            script = %script.display(),
            recording = %recording.display(),
            reference = %reference.display(),
            "Launching replay tool"
        );

        let child = Command::new(&self.binary)
            .arg(&self.script_flag)
            .arg(script)
            .arg(recording)
            .arg(reference)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                return Invocation::LaunchFailed {
                    message: format!("Failed to spawn '{}': {}", self.binary.display(), e),
                }
            }
        };

        let waiting = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => match timeout(limit, waiting).await {
                Ok(output) => output,
                Err(_) => {
                    let after_secs = whole_secs(limit);
                    tracing::warn!(
                        recording = %recording.display(),
                        secs = after_secs,
                        "Replay tool timed out"
                    );
                    return Invocation::TimedOut { after_secs };
                }
            },
            None => waiting.await,
        };

        match output {
            Ok(output) => {
                tracing::debug!(code = ?output.status.code(), "Replay tool exited");
                Invocation::Exited {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }
            }
            Err(e) => Invocation::LaunchFailed {
                message: format!("Failed to wait for replay tool: {}", e),
            },
        }
    }
}

/// Seconds in `d`, rounded up so a sub-second limit never reads as zero
fn whole_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
