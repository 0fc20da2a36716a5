//! Orchestration loop
//!
//! Runs discovered test cases strictly one after another: render the
//! script, launch the replay tool, record the outcome. All cases share a
//! single script location, so nothing here may run concurrently.

use std::path::{Path, PathBuf};

use crate::discovery::{case_id, Discovery, TestCase, Walker};
use crate::invoke::ToolInvoker;
use crate::report::{CaseOutcome, CaseStatus, RunReport};
use crate::synth::{ScriptFile, Synthesizer};

/// Everything needed for one run over a corpus
pub struct Harness<I> {
    walker: Walker,
    synthesizer: Synthesizer,
    script: ScriptFile,
    invoker: I,
    reference: PathBuf,
}

impl<I: ToolInvoker> Harness<I> {
    pub fn new(
        walker: Walker,
        synthesizer: Synthesizer,
        script: ScriptFile,
        invoker: I,
        reference: impl Into<PathBuf>,
    ) -> Self {
        Self {
            walker,
            synthesizer,
            script,
            invoker,
            reference: reference.into(),
        }
    }

    /// Walk the corpus and run every case
    ///
    /// `on_outcome` sees each outcome as soon as it is recorded. Per-case
    /// problems never abort the run; the script file is removed once the
    /// walk completes.
    pub async fn run<F>(self, mut on_outcome: F) -> RunReport
    where
        F: FnMut(&CaseOutcome),
    {
        let Harness {
            walker,
            synthesizer,
            script,
            invoker,
            reference,
        } = self;

        tracing::debug!(root = %walker.root().display(), "Starting corpus walk");

        let mut report = RunReport::default();
        for discovery in walker {
            let outcome = match discovery {
                Discovery::Pair(case) => {
                    run_case(&case, &synthesizer, &script, &invoker, &reference).await
                }
                Discovery::MissingExpectation {
                    recording,
                    expected,
                } => {
                    let dir = recording.parent().unwrap_or(Path::new(""));
                    let name = recording
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    CaseOutcome::new(
                        case_id(dir, &name),
                        recording.clone(),
                        CaseStatus::MissingExpectation { expected },
                    )
                }
            };
            on_outcome(&outcome);
            report.record(outcome);
        }

        if let Err(e) = script.remove() {
            tracing::warn!(
                path = %script.path().display(),
                error = %e,
                "Failed to remove generated script"
            );
        }

        report
    }
}

async fn run_case<I: ToolInvoker>(
    case: &TestCase,
    synthesizer: &Synthesizer,
    script: &ScriptFile,
    invoker: &I,
    reference: &Path,
) -> CaseOutcome {
    let id = case.id();

    let prepared = std::fs::read_to_string(&case.expectation)
        .map_err(|e| crate::common::Error::file_read(&case.expectation, e))
        .and_then(|json| script.write(&synthesizer.render(&json)));
    if let Err(e) = prepared {
        return CaseOutcome::new(
            id,
            case.recording.clone(),
            CaseStatus::SynthesisFailed {
                message: e.to_string(),
            },
        );
    }

    let invocation = invoker
        .invoke(script.path(), &case.recording, reference)
        .await;
    CaseOutcome::from_invocation(id, case.recording.clone(), invocation)
}
