//! Configuration script synthesis
//!
//! Turns an expectation document into a script for the replay tool's
//! embedded interpreter. The rewrite is lexical: every `"<key>":` on a
//! line becomes `["<normalized key>"] =`, the rest of the text passes
//! through untouched. Because the pattern is greedy and knows nothing
//! about JSON structure, a string value that looks like `"text":` is
//! rewritten as well.

mod script;

pub use script::ScriptFile;

use regex::{Captures, Regex};

use crate::common::config::ScriptConfig;
use crate::common::Result;

/// Lexical key pattern: a quoted run, spaces, tabs, then a colon
const KEY_PATTERN: &str = r#""(.*)" *\t*:"#;

/// Normalize a raw key label into a snake_case identifier
///
/// Spaces, tabs and colons are dropped, an underscore is inserted before
/// every uppercase letter except a leading one, and the result is
/// lower-cased: `"Player Name:"` becomes `player_name`.
pub fn normalize_key(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | ':'))
        .collect();

    let mut out = String::with_capacity(stripped.len() + 4);
    for (i, c) in stripped.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c);
    }
    out.to_lowercase()
}

/// Renders expectation documents into configuration scripts
#[derive(Debug, Clone)]
pub struct Synthesizer {
    pattern: Regex,
    config: ScriptConfig,
}

impl Synthesizer {
    /// Create a synthesizer for the given script framing
    pub fn new(config: ScriptConfig) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(KEY_PATTERN)?,
            config,
        })
    }

    /// Rewrite every key-like token of `json` into table-key syntax
    pub fn render_body(&self, json: &str) -> String {
        self.pattern
            .replace_all(json, |caps: &Captures| {
                format!("[\"{}\"] =", normalize_key(&caps[1]))
            })
            .into_owned()
    }

    /// Render a complete script: helper import plus the entry-point call
    pub fn render(&self, json: &str) -> String {
        let binding = &self.config.helper_binding;
        format!(
            "local {binding} = require \"{module}\"\nreturn {binding}.{entry}({body})",
            module = self.config.helper_module,
            entry = self.config.entry_point,
            body = self.render_body(json),
        )
    }
}
