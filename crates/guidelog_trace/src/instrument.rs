//! Adds firing-trace atoms to a rule program.
//!
//! Input is rule text as produced by the rule generator: `[1.2.3]` markers
//! naming the guideline clause, followed by the rules formalizing it.
//!
//! ```text
//! [1.1.14]                      % [1.1.14]
//! refer :- suspected.      ─▶   refer :- suspected.
//! :- refer, declined.           fired("1.1.14") :- suspected.
//!                               :- refer, declined.
//!                               fired("1.1.14_B").
//!                               constraint_ok("1.1.14_B").
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use guidelog_foundation::{Error, Result, RuleId};
use guidelog_syntax::{LineKind, RuleParts, classify_line, parse_rule, strip_terminator};

use crate::registry::RuleRegistry;
use crate::{CONSTRAINT_OK_PREDICATE, FIRED_PREDICATE};

/// Show directives appended to every instrumented program.
pub const SHOW_DIRECTIVES: [&str; 2] = ["#show fired/1.", "#show constraint_ok/1."];

/// An instrumented program and the registry built while producing it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Instrumented {
    /// Program text with tracking atoms and show directives.
    pub program: String,
    /// Every instrumented rule, keyed by its assigned id.
    pub registry: RuleRegistry,
}

/// Assigns rule ids and emits tracking atoms.
#[derive(Debug, Default)]
pub struct RuleInstrumenter {
    current_number: Option<String>,
    counters: HashMap<String, usize>,
    unnamed: usize,
    registry: RuleRegistry,
    output: Vec<String>,
}

impl RuleInstrumenter {
    /// Creates an instrumenter with no marker in effect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instruments a whole rule file's text.
    #[must_use]
    pub fn instrument(text: &str) -> Instrumented {
        let mut instrumenter = Self::new();
        let lines: Vec<&str> = text.split('\n').collect();
        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            instrumenter.push_line(line, i == last);
        }
        instrumenter.finish()
    }

    /// Reads and instruments a rule file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the path if the file cannot be read.
    pub fn instrument_file(path: &Path) -> Result<Instrumented> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        Ok(Self::instrument(&text))
    }

    fn push_line(&mut self, raw: &str, is_last: bool) {
        let line = raw.trim();
        match classify_line(line) {
            LineKind::Marker(number) => {
                self.counters.insert(number.clone(), 0);
                self.current_number = Some(number);
                self.output.push(format!("% {line}"));
            }
            LineKind::Blank => {
                if !is_last {
                    self.output.push(String::new());
                }
            }
            kind if kind.is_rule_like() => self.push_rule(line),
            _ => self.output.push(line.to_string()),
        }
    }

    fn next_id(&mut self) -> RuleId {
        match &self.current_number {
            Some(number) => {
                let counter = self.counters.entry(number.clone()).or_insert(0);
                *counter += 1;
                RuleId::numbered(number, *counter)
            }
            None => {
                self.unnamed += 1;
                RuleId::unnamed(self.unnamed)
            }
        }
    }

    fn push_rule(&mut self, line: &str) {
        let id = self.next_id();
        self.output.push(line.to_string());

        match parse_rule(line) {
            RuleParts { head: None, body } => {
                self.registry.insert_constraint(
                    id.clone(),
                    strip_terminator(line),
                    body.unwrap_or_default(),
                );
                self.output.push(format!("{FIRED_PREDICATE}(\"{id}\")."));
                self.output
                    .push(format!("{CONSTRAINT_OK_PREDICATE}(\"{id}\")."));
            }
            RuleParts {
                head: Some(_),
                body: Some(body),
            } if !body.is_empty() => {
                self.registry.insert(id.clone(), strip_terminator(line));
                self.output
                    .push(format!("{FIRED_PREDICATE}(\"{id}\") :- {body}."));
            }
            RuleParts { .. } => {
                self.registry.insert(id.clone(), strip_terminator(line));
                self.output.push(format!("{FIRED_PREDICATE}(\"{id}\")."));
            }
        }
    }

    /// Appends the show directives and returns the result.
    #[must_use]
    pub fn finish(mut self) -> Instrumented {
        self.output.push(String::new());
        self.output
            .extend(SHOW_DIRECTIVES.iter().map(ToString::to_string));

        tracing::info!(
            rules = self.registry.len(),
            constraints = self.registry.constraint_count(),
            "instrumented rules"
        );
        Instrumented {
            program: self.output.join("\n"),
            registry: self.registry,
        }
    }
}
