//! End-to-end tests for the replay harness binary
//!
//! These tests build a small corpus in a temporary directory, stand in
//! for the replay tool with a shell script, and check the exit status,
//! printed report and cleanup of the generated script.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Test context with paths and cleanup
struct TestContext {
    /// Temporary directory for this test, removed on drop
    temp: tempfile::TempDir,
    /// Corpus root
    corpus: PathBuf,
    /// Working directory of the harness process
    work_dir: PathBuf,
    /// Isolated config home
    config_dir: PathBuf,
}

struct HarnessOutput {
    stdout: String,
    stderr: String,
    code: Option<i32>,
}

impl TestContext {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let corpus = temp.path().join("corpus");
        let work_dir = temp.path().join("work");
        let config_dir = temp.path().join("config");
        for dir in [&corpus, &work_dir, &config_dir] {
            fs::create_dir_all(dir).expect("Failed to create dir");
        }

        Self {
            temp,
            corpus,
            work_dir,
            config_dir,
        }
    }

    /// Add a recording and, optionally, its expectation document
    fn add_case(&self, rel: &str, expectation: Option<&str>) {
        let recording = self.corpus.join(format!("{rel}.log"));
        fs::create_dir_all(recording.parent().unwrap()).unwrap();
        fs::write(&recording, b"\x00\x01recording").unwrap();
        if let Some(json) = expectation {
            fs::write(self.corpus.join(format!("{rel}.json")), json).unwrap();
        }
    }

    /// Write an executable shell script standing in for the replay tool
    fn fake_tool(&self, body: &str) -> PathBuf {
        let path = self.temp.path().join("fake-replaycli");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> HarnessOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_replay-harness"))
            .args(args)
            .current_dir(&self.work_dir)
            .env("XDG_CONFIG_HOME", &self.config_dir)
            .env("HOME", &self.config_dir)
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run replay-harness");

        HarnessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        }
    }

    fn run_with_tool(&self, tool: &Path, extra: &[&str]) -> HarnessOutput {
        let mut args = vec![
            self.corpus.to_str().unwrap(),
            "reference-data",
            tool.to_str().unwrap(),
        ];
        args.extend_from_slice(extra);
        self.run(&args)
    }

    fn script_left_behind(&self) -> bool {
        self.work_dir.join("init.lua").exists()
    }
}

#[test]
fn wrong_argument_count_prints_usage_and_exits_1() {
    let ctx = TestContext::new();
    let out = ctx.run(&[ctx.corpus.to_str().unwrap(), "reference-data"]);

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("Usage"), "stdout: {}", out.stdout);
    assert!(!out.stdout.contains("testcase"));
    assert!(out.stderr.contains("<TOOL>"), "stderr: {}", out.stderr);
    assert!(!ctx.script_left_behind());
}

#[test]
fn all_passing_run_exits_0_and_cleans_up() {
    let ctx = TestContext::new();
    ctx.add_case("goal", Some("{\n  \"Event Type\": \"GOAL\"\n}"));
    ctx.add_case("nested/dir/foul", Some("{\n  \"foulType\": 2\n}"));
    let tool = ctx.fake_tool("exit 0");

    let out = ctx.run_with_tool(&tool, &[]);

    assert_eq!(out.code, Some(0), "stdout: {}\nstderr: {}", out.stdout, out.stderr);
    assert!(out.stdout.contains("All tests successful!"));
    assert!(!out.stdout.contains("failed"));
    assert!(!ctx.script_left_behind());
}

#[test]
fn every_failing_case_gets_a_block_and_is_counted() {
    let ctx = TestContext::new();
    ctx.add_case("one", Some("{}"));
    ctx.add_case("two", Some("{}"));
    ctx.add_case("sub/three", Some("{}"));
    let tool = ctx.fake_tool("echo \"replaying $3\"\necho \"mismatch\" >&2\nexit 1");

    let out = ctx.run_with_tool(&tool, &[]);

    assert_eq!(out.code, Some(1));
    assert_eq!(out.stdout.matches("failed with exit code 1").count(), 3);
    assert_eq!(out.stdout.matches("mismatch").count(), 3);
    assert!(out.stdout.contains("replaying"));
    assert!(out
        .stdout
        .contains(&format!("Test \"{}/one.log\" failed", ctx.corpus.display())));
    assert!(out.stdout.contains("3 testcase(s) failed!"));
    assert!(!ctx.script_left_behind());
}

#[test]
fn missing_expectation_fails_without_stopping_the_walk() {
    let ctx = TestContext::new();
    ctx.add_case("a", Some("{}"));
    ctx.add_case("b", None);
    ctx.add_case("c", Some("{}"));
    let tool = ctx.fake_tool("echo \"$3\" >> ../ran.txt\nexit 0");

    let out = ctx.run_with_tool(&tool, &[]);

    assert_eq!(out.code, Some(1));
    assert!(out
        .stdout
        .contains("No matching .json file found for log file b.log"));
    assert!(out.stdout.contains("1 testcase(s) failed!"));

    let ran = fs::read_to_string(ctx.work_dir.join("../ran.txt")).unwrap();
    assert_eq!(ran.lines().count(), 2);
}

#[test]
fn tool_receives_rendered_script_and_arguments() {
    let ctx = TestContext::new();
    ctx.add_case("kick", Some("{\n  \"Player Name:\": \"x\",\n  \"roundStartTime\": 3\n}"));
    let tool = ctx.fake_tool("echo \"$@\" > ../args.txt\ncat \"$2\" > ../script.txt\nexit 0");

    let out = ctx.run_with_tool(&tool, &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);

    let args = fs::read_to_string(ctx.work_dir.join("../args.txt")).unwrap();
    assert_eq!(
        args.trim_end(),
        format!(
            "-t init.lua {} reference-data",
            ctx.corpus.join("kick.log").display()
        )
    );

    let script = fs::read_to_string(ctx.work_dir.join("../script.txt")).unwrap();
    assert_eq!(
        script,
        "local Helper = require \"autoreftesthelper\"\nreturn Helper.testEvent({\n  [\"player_name\"] = \"x\",\n  [\"round_start_time\"] = 3\n})"
    );
}

#[test]
fn json_report_is_printed_on_request() {
    let ctx = TestContext::new();
    ctx.add_case("a", Some("{}"));
    let tool = ctx.fake_tool("exit 7");

    let out = ctx.run_with_tool(&tool, &["--json"]);
    assert_eq!(out.code, Some(1));

    let json_start = out.stdout.find('{').expect("no JSON in output");
    let report: serde_json::Value = serde_json::from_str(&out.stdout[json_start..]).unwrap();
    assert_eq!(report["outcomes"][0]["status"], "failed");
    assert_eq!(report["outcomes"][0]["exit_code"], 7);
    assert_eq!(report["passed"], 0);
    assert_eq!(report["failed"], 1);
}

#[test]
fn bare_tool_name_in_working_dir_is_run() {
    let ctx = TestContext::new();
    ctx.add_case("a", Some("{}"));
    let tool = ctx.fake_tool("exit 0");
    fs::copy(&tool, ctx.work_dir.join("replaycli")).unwrap();

    let out = ctx.run(&[ctx.corpus.to_str().unwrap(), "reference-data", "replaycli"]);

    assert_eq!(out.code, Some(0), "stdout: {}\nstderr: {}", out.stdout, out.stderr);
    assert!(out.stdout.contains("All tests successful!"));
}

#[test]
fn signalled_tool_is_reported_as_terminated() {
    let ctx = TestContext::new();
    ctx.add_case("a", Some("{}"));
    let tool = ctx.fake_tool("kill -9 $$");

    let out = ctx.run_with_tool(&tool, &[]);

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains(&format!(
        "Test \"{}/a.log\" was terminated by a signal",
        ctx.corpus.display()
    )));
    assert!(out.stdout.contains("1 testcase(s) failed!"));
}

#[test]
fn timeout_flag_fails_hung_case() {
    let ctx = TestContext::new();
    ctx.add_case("slow", Some("{}"));
    let tool = ctx.fake_tool("exec sleep 30");

    let out = ctx.run_with_tool(&tool, &["--timeout", "1"]);

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("timed out after 1 seconds"));
    assert!(!ctx.script_left_behind());
}

#[test]
fn unknown_tool_is_fatal() {
    let ctx = TestContext::new();
    ctx.add_case("a", Some("{}"));

    let out = ctx.run(&[
        ctx.corpus.to_str().unwrap(),
        "reference-data",
        "/nonexistent/replaycli",
    ]);

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("not found"), "stderr: {}", out.stderr);
}
