//! Test case discovery
//!
//! Walks a corpus directory and pairs every recording file with the
//! expectation file of the same base name in the same directory. A
//! recording without its sibling is reported, not treated as fatal.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::common::config::DiscoveryConfig;

/// File naming conventions of the test corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conventions {
    /// Recording extension, without the dot
    pub recording_extension: String,
    /// Expectation extension, without the dot
    pub expectation_extension: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self::from(&DiscoveryConfig::default())
    }
}

impl From<&DiscoveryConfig> for Conventions {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            recording_extension: config.recording_extension.clone(),
            expectation_extension: config.expectation_extension.clone(),
        }
    }
}

impl Conventions {
    fn recording_suffix(&self) -> String {
        format!(".{}", self.recording_extension)
    }

    /// Whether a file name denotes a recording
    pub fn is_recording(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.recording_suffix())
    }

    /// Sibling expectation path for a recording, or `None` if the path is
    /// not a recording
    pub fn expectation_for(&self, recording: &Path) -> Option<PathBuf> {
        let file_name = recording.file_name()?.to_str()?;
        let base = file_name.strip_suffix(&self.recording_suffix())?;
        Some(recording.with_file_name(format!("{}.{}", base, self.expectation_extension)))
    }
}

/// A recording paired with its expectation document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Directory holding both files
    pub dir: PathBuf,
    /// File name of the recording
    pub name: String,
    /// Full path of the recording
    pub recording: PathBuf,
    /// Full path of the expectation document
    pub expectation: PathBuf,
}

impl TestCase {
    /// Identifier used in failure lines: `<dir>/<recording file name>`
    pub fn id(&self) -> String {
        case_id(&self.dir, &self.name)
    }
}

pub(crate) fn case_id(dir: &Path, name: &str) -> String {
    format!("{}/{}", dir.display(), name)
}

/// One item produced by the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// A complete test case
    Pair(TestCase),
    /// A recording whose expectation sibling does not exist
    MissingExpectation {
        /// The recording that was found
        recording: PathBuf,
        /// The expectation path that was looked for
        expected: PathBuf,
    },
}

/// Recursive corpus walker
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    conventions: Conventions,
    sorted: bool,
}

impl Walker {
    /// Create a walker over `root`, visiting entries in file-name order
    pub fn new(root: impl Into<PathBuf>, conventions: Conventions) -> Self {
        Self {
            root: root.into(),
            conventions,
            sorted: true,
        }
    }

    /// Visit entries in file-name order (`true`) or in whatever order the
    /// platform enumerates them (`false`)
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Root directory being walked
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl IntoIterator for Walker {
    type Item = Discovery;
    type IntoIter = Discoveries;

    fn into_iter(self) -> Self::IntoIter {
        let mut walk = WalkDir::new(&self.root);
        if self.sorted {
            walk = walk.sort_by_file_name();
        }
        Discoveries {
            entries: walk.into_iter(),
            conventions: self.conventions,
        }
    }
}

/// Lazy sequence of discoveries
pub struct Discoveries {
    entries: walkdir::IntoIter,
    conventions: Conventions,
}

impl Iterator for Discoveries {
    type Item = Discovery;

    fn next(&mut self) -> Option<Discovery> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable corpus entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !self.conventions.is_recording(name) {
                continue;
            }
            let Some(expected) = self.conventions.expectation_for(entry.path()) else {
                continue;
            };

            let recording = entry.path().to_path_buf();
            if !expected.is_file() {
                tracing::warn!(
                    recording = %recording.display(),
                    expected = %expected.display(),
                    "Recording has no expectation document"
                );
                return Some(Discovery::MissingExpectation {
                    recording,
                    expected,
                });
            }

            let dir = recording
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            tracing::debug!(recording = %recording.display(), "Discovered test case");
            return Some(Discovery::Pair(TestCase {
                dir,
                name: name.to_string(),
                recording,
                expectation: expected,
            }));
        }
    }
}
