//! Natural-language reports of fired rules.

use std::fmt;

use guidelog_foundation::RuleId;
use guidelog_syntax::{explain_constraint_satisfied, explain_rule};

use crate::BANNER_WIDTH;
use crate::guideline::GuidelineLookup;
use crate::registry::RuleRegistry;
use crate::solver_output::{AnswerSet, CaseResult, SolverOutput};

/// Placeholder shown when a rule or guideline clause cannot be found.
pub const NOT_FOUND: &str = "[not found]";

// =============================================================================
// Report Types
// =============================================================================

/// One fired rule with its rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiredEntry {
    /// Id from the `fired/1` atom.
    pub rule_id: RuleId,
    /// Rendered rule, or `None` if the id is not in the registry.
    pub explanation: Option<String>,
    /// Guideline clause the rule formalizes, or `None` if not in the lookup.
    pub guideline: Option<String>,
}

/// Fired rules of one answer set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnswerReport {
    /// Solver-assigned answer number.
    pub number: u32,
    /// Fired rules in answer-set order.
    pub entries: Vec<FiredEntry>,
}

/// Outcome of one case.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseOutcome {
    /// The solver run failed.
    SolverError(String),
    /// The solver produced no answer sets.
    NoAnswers,
    /// One report per answer set.
    Answers(Vec<AnswerReport>),
}

/// Report for one case.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseReport {
    /// Case number.
    pub case: u32,
    /// What happened.
    pub outcome: CaseOutcome,
}

/// Fired-rule explanations for every case of a solver run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiringReport {
    /// Cases in solver output order.
    pub cases: Vec<CaseReport>,
}

impl FiringReport {
    /// Total number of fired rules across cases and answer sets.
    #[must_use]
    pub fn fired_count(&self) -> usize {
        self.cases
            .iter()
            .filter_map(|case| match &case.outcome {
                CaseOutcome::Answers(answers) => Some(answers),
                _ => None,
            })
            .flatten()
            .map(|answer| answer.entries.len())
            .sum()
    }
}

// =============================================================================
// Explainer
// =============================================================================

/// Turns parsed solver output into a [`FiringReport`].
#[derive(Clone, Copy, Debug)]
pub struct FiringExplainer<'a> {
    registry: &'a RuleRegistry,
    guidelines: &'a GuidelineLookup,
}

impl<'a> FiringExplainer<'a> {
    /// Creates an explainer over a registry and guideline lookup.
    #[must_use]
    pub fn new(registry: &'a RuleRegistry, guidelines: &'a GuidelineLookup) -> Self {
        Self {
            registry,
            guidelines,
        }
    }

    /// Explains every case.
    #[must_use]
    pub fn explain(&self, output: &SolverOutput) -> FiringReport {
        let cases = output
            .cases
            .iter()
            .map(|case| CaseReport {
                case: case.case,
                outcome: match &case.result {
                    CaseResult::Error(message) => {
                        tracing::warn!(case = case.case, error = %message, "solver failed for case");
                        CaseOutcome::SolverError(message.clone())
                    }
                    CaseResult::Answers(answers) if answers.is_empty() => CaseOutcome::NoAnswers,
                    CaseResult::Answers(answers) => {
                        CaseOutcome::Answers(answers.iter().map(|a| self.explain_answer(a)).collect())
                    }
                },
            })
            .collect();

        let report = FiringReport { cases };
        tracing::info!(
            cases = report.cases.len(),
            fired = report.fired_count(),
            "explained fired rules"
        );
        report
    }

    fn explain_answer(&self, answer: &AnswerSet) -> AnswerReport {
        AnswerReport {
            number: answer.number,
            entries: answer.fired.iter().map(|id| self.explain_fired(id)).collect(),
        }
    }

    /// Renders one fired id. Constraints use their satisfied form.
    #[must_use]
    pub fn explain_fired(&self, id: &RuleId) -> FiredEntry {
        let explanation = match self.registry.constraint_body(id) {
            Some(body) => Some(explain_constraint_satisfied(body, Some(id))),
            None => self.registry.get(id).map(|text| explain_rule(text, Some(id))),
        };
        if explanation.is_none() {
            tracing::warn!(rule = %id, "fired rule missing from registry");
        }
        FiredEntry {
            rule_id: id.clone(),
            explanation,
            guideline: self.guidelines.get(id.base()).map(ToString::to_string),
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let line = "=".repeat(BANNER_WIDTH);
    writeln!(f, "{line}")?;
    writeln!(f, "{title}")?;
    writeln!(f, "{line}")?;
    writeln!(f)
}

impl fmt::Display for FiredEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(explanation) = &self.explanation else {
            return write!(f, "Rule {}: [Rule not found]\n\n", self.rule_id);
        };
        writeln!(f, "{explanation}")?;
        write!(
            f,
            "Guideline {} Natural Language:\n{}\n\n",
            self.rule_id.base(),
            self.guideline.as_deref().unwrap_or(NOT_FOUND)
        )
    }
}

impl fmt::Display for AnswerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Answer Set {}: ({} rules fired)",
            self.number,
            self.entries.len()
        )?;
        writeln!(f, "{}", "-".repeat(BANNER_WIDTH))?;
        writeln!(f)?;
        if self.entries.is_empty() {
            writeln!(f, "No rules fired in this answer set.")?;
        }
        for entry in &self.entries {
            write!(f, "{entry}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, &format!("CASE {}", self.case))?;
        match &self.outcome {
            CaseOutcome::SolverError(message) => writeln!(f, "Solver error: {message}\n"),
            CaseOutcome::NoAnswers => writeln!(f, "No rules fired for this case.\n"),
            CaseOutcome::Answers(answers) => {
                for answer in answers {
                    write!(f, "{answer}")?;
                }
                writeln!(f)
            }
        }
    }
}

impl fmt::Display for FiringReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cases.is_empty() {
            return writeln!(f, "No case results found.");
        }
        banner(f, "FIRED RULES EXPLANATIONS BY CASE")?;
        for case in &self.cases {
            write!(f, "{case}")?;
        }
        Ok(())
    }
}
