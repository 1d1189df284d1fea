//! Parsing of recorded solver output.
//!
//! The runtime writes one section per case:
//!
//! ```text
//! === Case 1 ===
//! clingo version 5.6.2
//! Answer: 1
//! fired("1.1.14") constraint_ok("1.1.20")
//! SATISFIABLE
//! ...
//! ```
//!
//! Older files use `=== Patient N ===` headers; both are accepted.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use guidelog_foundation::{Error, Result, RuleId};
use regex::Regex;

static CASE_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"=== (?:Case|Patient) (\d+) ===").expect("case header pattern is valid")
});

static ANSWER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Answer: (\d+)\r?\n([^\n]*)").expect("answer pattern is valid"));

static FIRED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"fired\("([^"]+)"\)"#).expect("fired pattern is valid"));

/// Prefix marking a case whose solver run failed.
pub const ERROR_PREFIX: &str = "ERROR:";

/// One answer set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnswerSet {
    /// Solver-assigned answer number.
    pub number: u32,
    /// `fired("id")` atoms in the order they appear.
    pub fired: Vec<RuleId>,
}

/// What the solver produced for one case.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseResult {
    /// The solver could not be run.
    Error(String),
    /// The solver ran; zero or more answer sets.
    Answers(Vec<AnswerSet>),
}

/// One case section.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseOutput {
    /// Case number from the header.
    pub case: u32,
    /// Parsed result.
    pub result: CaseResult,
}

/// All case sections of one solver output file, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverOutput {
    /// Cases in file order.
    pub cases: Vec<CaseOutput>,
}

impl SolverOutput {
    /// Parses recorded solver output. Text before the first header is ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let headers: Vec<_> = CASE_HEADER_PATTERN.captures_iter(text).collect();
        let mut cases = Vec::with_capacity(headers.len());

        for (i, captures) in headers.iter().enumerate() {
            let (Some(whole), Ok(case)) = (captures.get(0), captures[1].parse::<u32>()) else {
                continue;
            };
            let end = headers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());
            let section = &text[whole.end()..end];
            cases.push(CaseOutput {
                case,
                result: parse_section(section),
            });
        }

        Self { cases }
    }

    /// Reads and parses a solver output file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the path if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        Ok(Self::parse(&text))
    }

    /// Returns true if no case sections were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

fn parse_section(section: &str) -> CaseResult {
    let trimmed = section.trim_start();
    if let Some(message) = trimmed.strip_prefix(ERROR_PREFIX) {
        let message = message.lines().next().unwrap_or_default().trim();
        return CaseResult::Error(message.to_string());
    }

    let answers = ANSWER_PATTERN
        .captures_iter(section)
        .filter_map(|captures| {
            let number = captures[1].parse().ok()?;
            let fired = FIRED_PATTERN
                .captures_iter(&captures[2])
                .map(|fired| RuleId::new(&fired[1]))
                .collect();
            Some(AnswerSet { number, fired })
        })
        .collect();
    CaseResult::Answers(answers)
}
