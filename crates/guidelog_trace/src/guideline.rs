//! Guideline text indexed by clause id.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use guidelog_foundation::{ClauseId, Error, Result};
use regex::Regex;

static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)*)\b").expect("heading pattern is valid"));

/// Maps dotted clause ids to their guideline text.
///
/// A line starting with a dotted number opens a clause; the rest of that line
/// and every following non-empty line up to the next heading form its text,
/// joined with single spaces. Headings with no text are not recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuidelineLookup {
    entries: HashMap<String, String>,
}

impl GuidelineLookup {
    /// Parses guideline text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        let mut current: Option<String> = None;
        let mut buffer: Vec<String> = Vec::new();

        let mut flush = |current: &Option<String>, buffer: &mut Vec<String>| {
            if let (Some(id), false) = (current, buffer.is_empty()) {
                entries.insert(id.clone(), buffer.join(" ").trim().to_string());
            }
            buffer.clear();
        };

        for line in text.lines() {
            let line = line.trim();
            if let Some(captures) = HEADING_PATTERN.captures(line) {
                flush(&current, &mut buffer);
                let id = captures[1].to_string();
                let content = line[id.len()..].trim_matches(|c| matches!(c, ' ' | '.' | '-'));
                if !content.is_empty() {
                    buffer.push(content.to_string());
                }
                current = Some(id);
            } else if current.is_some() && !line.is_empty() {
                buffer.push(line.to_string());
            }
        }
        flush(&current, &mut buffer);

        Self { entries }
    }

    /// Reads and parses a guideline file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the path if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        Ok(Self::parse(&text))
    }

    /// Returns the text of one clause.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Number of clauses with text.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no clause has text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the leaf clauses (`1.2.3` and deeper) in numeric order.
    #[must_use]
    pub fn leaf_clauses(&self) -> Vec<ClauseId> {
        let mut leaves: Vec<ClauseId> = self
            .entries
            .keys()
            .filter_map(|id| ClauseId::parse(id))
            .filter(ClauseId::is_leaf)
            .collect();
        leaves.sort();
        leaves
    }
}
