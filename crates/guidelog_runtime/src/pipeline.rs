//! File-to-file operations behind each CLI subcommand.
//!
//! Every input path is read up front, so an unreadable input fails the
//! command before any output is written.

use std::fs;
use std::path::{Path, PathBuf};

use guidelog_foundation::{Error, ErrorKind, Result};
use guidelog_graph::{EdgeKind, ProgramGraph, ProgramGraphBuilder};
use guidelog_similarity::{GraphSimilarityScorer, SimilarityScore};
use guidelog_trace::{
    FiringExplainer, FiringReport, GuidelineLookup, RuleInstrumenter, RuleRegistry, SolverOutput,
};

use crate::config::AnalysisConfig;
use crate::report::{SimilarityReport, SimilarityRow};
use crate::solver::{CaseFacts, CaseRun, CaseRunner, Clingo, write_solver_output};

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, &e))
}

fn write(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| Error::io(path, &e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

// =============================================================================
// Graph
// =============================================================================

/// Human-readable node and edge counts.
#[must_use]
pub fn graph_summary(graph: &ProgramGraph) -> String {
    let counts = graph.edge_kind_counts();
    let mut text = format!(
        "nodes: {}\nedges: {}\n",
        graph.node_count(),
        graph.edge_count()
    );
    for kind in EdgeKind::ALL {
        text.push_str(&format!("  {kind}: {}\n", counts.get(kind)));
    }
    text.push_str(&format!(
        "isolated nodes: {}\n",
        graph.isolated_nodes().count()
    ));
    text
}

/// Builds a graph from a rule file and renders it as text or JSON.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or a serialization error.
pub fn describe_graph(path: &Path, config: &AnalysisConfig) -> Result<String> {
    let graph = ProgramGraphBuilder::from_file(path)?;
    if config.json_output {
        to_json(&graph.export())
    } else {
        Ok(graph_summary(&graph))
    }
}

// =============================================================================
// Comparison
// =============================================================================

/// Scores each generated rule file against the ground truth.
///
/// All files are read before scoring. A comparison that fails is logged and
/// yields `None`.
///
/// # Errors
///
/// Returns an I/O error if any file cannot be read, or an invalid argument
/// error if the embedder cannot be built.
pub fn compare_files(
    config: &AnalysisConfig,
    ground_truth: &Path,
    generated: &[PathBuf],
) -> Result<Vec<Option<SimilarityScore>>> {
    let gt = ProgramGraphBuilder::from_file(ground_truth)?;
    let graphs = generated
        .iter()
        .map(|path| ProgramGraphBuilder::from_file(path))
        .collect::<Result<Vec<_>>>()?;

    let scorer =
        GraphSimilarityScorer::new(config.embedder()?).with_config(config.scorer_config());
    let scores = scorer.compare_all(&gt, &graphs);

    for (path, score) in generated.iter().zip(&scores) {
        if let Some(score) = score {
            tracing::info!(
                generated = %path.display(),
                adjusted = score.adjusted,
                raw = score.raw,
                penalty = score.structure_penalty,
                "compared graphs"
            );
        }
    }
    Ok(scores)
}

/// Turns successful scores into report rows labeled with the experiment.
#[must_use]
pub fn report_rows(
    config: &AnalysisConfig,
    scores: &[Option<SimilarityScore>],
) -> Vec<SimilarityRow> {
    scores
        .iter()
        .flatten()
        .map(|score| SimilarityRow::new(config.experiment.clone(), score.adjusted))
        .collect()
}

/// Compares files and appends the results to a CSV report.
///
/// # Errors
///
/// Propagates input and report I/O errors.
pub fn compare_and_report(
    config: &AnalysisConfig,
    ground_truth: &Path,
    generated: &[PathBuf],
    output: &Path,
) -> Result<Vec<Option<SimilarityScore>>> {
    let scores = compare_files(config, ground_truth, generated)?;
    let rows = report_rows(config, &scores);
    if !rows.is_empty() {
        SimilarityReport::new(output).append(&rows)?;
    }
    Ok(scores)
}

// =============================================================================
// Tracing
// =============================================================================

/// Instruments a rule file and writes the program.
///
/// # Errors
///
/// Returns an I/O error naming whichever path failed.
pub fn instrument_file(input: &Path, output: &Path) -> Result<RuleRegistry> {
    let instrumented = RuleInstrumenter::instrument(&read(input)?);
    write(output, &instrumented.program)?;
    Ok(instrumented.registry)
}

/// Solves every case of an atoms file against an instrumented program and
/// writes the recorded output.
///
/// # Errors
///
/// Returns an I/O error for unreadable inputs or an unwritable output.
/// Per-case solver failures are recorded in the output instead.
pub fn solve_cases(
    config: &AnalysisConfig,
    program: &Path,
    cases: &Path,
    output: &Path,
    debug_case: Option<u32>,
) -> Result<Vec<CaseRun>> {
    let program_text = read(program)?;
    let cases = CaseFacts::from_file(cases)?;

    let mut runner = CaseRunner::new(Clingo::from_config(config));
    if let Some(case) = debug_case {
        let dir = program
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        runner = runner.with_debug_case(case, dir);
    }

    let runs = runner.run_cases(&program_text, &cases);
    write_solver_output(output, &runs)?;
    Ok(runs)
}

/// Explains recorded solver output and writes the report.
///
/// The rule registry is rebuilt from the instrumented program. Without a
/// guideline file every guideline reference shows a placeholder.
///
/// # Errors
///
/// Returns an I/O error naming whichever path failed.
pub fn explain_files(
    config: &AnalysisConfig,
    program: &Path,
    solver_output: &Path,
    guideline: Option<&Path>,
    output: &Path,
) -> Result<FiringReport> {
    let registry = RuleRegistry::from_instrumented(&read(program)?);
    let solver_output = SolverOutput::parse(&read(solver_output)?);
    let guidelines = match guideline {
        Some(path) => GuidelineLookup::from_file(path)?,
        None => GuidelineLookup::default(),
    };

    let report = FiringExplainer::new(&registry, &guidelines).explain(&solver_output);
    let text = if config.json_output {
        to_json(&report)?
    } else {
        report.to_string()
    };
    write(output, &text)?;
    Ok(report)
}
