//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Run every recording in a test corpus through the replay validator
#[derive(Parser, Debug)]
#[command(name = "replay-harness", version, long_about = None)]
pub struct Cli {
    /// Directory searched recursively for recording/expectation pairs
    pub tests_dir: PathBuf,

    /// Reference data passed through to the replay tool
    pub reference: PathBuf,

    /// Replay tool binary (path, or name looked up on PATH)
    pub tool: PathBuf,

    /// Configuration file (defaults to the platform config location)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Kill a replay that runs longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Where the generated script is written
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Print the full run report as JSON after the summary
    #[arg(long)]
    pub json: bool,

    /// Verbose diagnostics on stderr
    #[arg(long, short)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_three_positionals_parse() {
        let cli = Cli::try_parse_from(["replay-harness", "tests", "ref", "replaycli"]).unwrap();
        assert_eq!(cli.tests_dir, PathBuf::from("tests"));
        assert_eq!(cli.reference, PathBuf::from("ref"));
        assert_eq!(cli.tool, PathBuf::from("replaycli"));
        assert!(cli.timeout.is_none());
    }

    #[test]
    fn test_missing_positional_is_rejected() {
        let err = Cli::try_parse_from(["replay-harness", "tests", "ref"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_extra_positional_is_rejected() {
        assert!(Cli::try_parse_from(["replay-harness", "a", "b", "c", "d"]).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "replay-harness",
            "tests",
            "ref",
            "tool",
            "--timeout",
            "30",
            "--script",
            "gen.lua",
            "--json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.script, Some(PathBuf::from("gen.lua")));
        assert!(cli.json);
        assert!(cli.verbose);
    }
}
