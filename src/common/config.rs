//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Test corpus naming conventions
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Generated script settings
    #[serde(default)]
    pub script: ScriptConfig,

    /// Replay tool settings
    #[serde(default)]
    pub tool: ToolConfig,
}

/// How test cases are recognised in the corpus
#[derive(Debug, Deserialize, Clone)]
pub struct DiscoveryConfig {
    /// Extension of recording files, without the dot
    #[serde(default = "default_recording_extension")]
    pub recording_extension: String,

    /// Extension of expectation files, without the dot
    #[serde(default = "default_expectation_extension")]
    pub expectation_extension: String,

    /// Visit directory entries in file-name order
    #[serde(default = "default_sort")]
    pub sort: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            recording_extension: default_recording_extension(),
            expectation_extension: default_expectation_extension(),
            sort: default_sort(),
        }
    }
}

fn default_recording_extension() -> String {
    "log".to_string()
}
fn default_expectation_extension() -> String {
    "json".to_string()
}
fn default_sort() -> bool {
    true
}

/// Settings for the generated configuration script
#[derive(Debug, Deserialize, Clone)]
pub struct ScriptConfig {
    /// Where the script is written, relative to the working directory
    #[serde(default = "default_script_path")]
    pub path: PathBuf,

    /// Module required at the top of the script
    #[serde(default = "default_helper_module")]
    pub helper_module: String,

    /// Local name the helper module is bound to
    #[serde(default = "default_helper_binding")]
    pub helper_binding: String,

    /// Helper function receiving the expectation table
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            path: default_script_path(),
            helper_module: default_helper_module(),
            helper_binding: default_helper_binding(),
            entry_point: default_entry_point(),
        }
    }
}

fn default_script_path() -> PathBuf {
    PathBuf::from("init.lua")
}
fn default_helper_module() -> String {
    "autoreftesthelper".to_string()
}
fn default_helper_binding() -> String {
    "Helper".to_string()
}
fn default_entry_point() -> String {
    "testEvent".to_string()
}

/// Replay tool settings
#[derive(Debug, Deserialize, Clone)]
pub struct ToolConfig {
    /// Per-case timeout in seconds, 0 waits forever
    #[serde(default)]
    pub timeout_secs: u64,

    /// Flag that precedes the script path
    #[serde(default = "default_script_flag")]
    pub script_flag: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 0,
            script_flag: default_script_flag(),
        }
    }
}

fn default_script_flag() -> String {
    "-t".to_string()
}

impl ToolConfig {
    /// The per-case timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file '{}' does not exist",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}
