//! Running an answer-set solver once per case.
//!
//! Each case's facts are appended to the instrumented program in a temporary
//! file and the solver's stdout is recorded. A case that cannot be solved is
//! recorded as an `ERROR: ...` string and the batch continues.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use guidelog_foundation::{Error, Result};
use guidelog_trace::BANNER_WIDTH;
use guidelog_trace::solver_output::ERROR_PREFIX;
use regex::Regex;

use crate::config::AnalysisConfig;

static CASE_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(?:Case|Patient) (\d+):\*\*").expect("case header pattern is valid")
});

// =============================================================================
// Case Facts
// =============================================================================

/// Facts describing one case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseFacts {
    /// Case number from the `**Case N:**` header.
    pub case: u32,
    /// Fact lines, in file order.
    pub facts: Vec<String>,
}

impl CaseFacts {
    /// Splits an atoms file into cases.
    ///
    /// Text before the first header is ignored. Within a case, a line is kept
    /// if it is non-empty, is not a `%` comment or `**` heading, and contains
    /// `(`.
    #[must_use]
    pub fn parse(text: &str) -> Vec<Self> {
        let headers: Vec<_> = CASE_HEADER_PATTERN.captures_iter(text).collect();
        headers
            .iter()
            .enumerate()
            .filter_map(|(i, captures)| {
                let whole = captures.get(0)?;
                let case = captures[1].parse().ok()?;
                let end = headers
                    .get(i + 1)
                    .and_then(|next| next.get(0))
                    .map_or(text.len(), |m| m.start());
                let facts = text[whole.end()..end]
                    .lines()
                    .map(str::trim)
                    .filter(|line| {
                        !line.is_empty()
                            && !line.starts_with('%')
                            && !line.starts_with("**")
                            && line.contains('(')
                    })
                    .map(ToString::to_string)
                    .collect();
                Some(Self { case, facts })
            })
            .collect()
    }

    /// Reads and splits an atoms file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the path if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Vec<Self>> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        Ok(Self::parse(&text))
    }
}

/// Builds the solver input for one case.
#[must_use]
pub fn case_program(program: &str, case: &CaseFacts) -> String {
    let mut text = String::with_capacity(program.len() + 64);
    text.push_str(program);
    if !program.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&format!("\n% Case {} facts\n", case.case));
    for fact in &case.facts {
        text.push_str(fact);
        text.push('\n');
    }
    text
}

// =============================================================================
// Solver
// =============================================================================

/// An answer-set solver that enumerates all models of a program file.
pub trait Solver {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Solves `program` and returns the solver's stdout.
    ///
    /// # Errors
    ///
    /// Returns a solver error if the solver cannot be run.
    fn solve(&self, program: &Path) -> Result<String>;
}

/// clingo exit codes that report a search result (unknown, satisfiable,
/// unsatisfiable, exhausted). Anything else is an error.
const SATISFIABILITY_CODES: [i32; 4] = [0, 10, 20, 30];

/// The clingo solver, run as a subprocess.
#[derive(Clone, Debug)]
pub struct Clingo {
    executable: String,
    args: Vec<String>,
}

impl Clingo {
    /// Creates a solver from an executable and the arguments placed before
    /// the program path.
    #[must_use]
    pub fn new(executable: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            args,
        }
    }

    /// Creates a solver from the run configuration.
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.solver_executable.clone(), config.solver_args.clone())
    }
}

impl Default for Clingo {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl Solver for Clingo {
    fn name(&self) -> &str {
        &self.executable
    }

    fn solve(&self, program: &Path) -> Result<String> {
        let output = Command::new(&self.executable)
            .args(&self.args)
            .arg(program)
            .arg("0")
            .output()
            .map_err(|e| Error::solver(format!("{}: {e}", self.executable)))?;

        match output.status.code() {
            Some(code) if SATISFIABILITY_CODES.contains(&code) => {
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let status = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                Err(Error::solver(format!(
                    "{} exited with {status}: {}",
                    self.executable,
                    stderr.trim()
                )))
            }
        }
    }
}

// =============================================================================
// Batch Runs
// =============================================================================

/// Recorded output of one case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseRun {
    /// Case number.
    pub case: u32,
    /// Solver stdout, or `ERROR: ...`.
    pub output: String,
}

impl CaseRun {
    /// Returns true if the solver could not be run for this case.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.output.starts_with(ERROR_PREFIX)
    }
}

/// Runs a solver over many cases.
pub struct CaseRunner<S> {
    solver: S,
    debug_case: Option<(u32, PathBuf)>,
}

impl<S: Solver> CaseRunner<S> {
    /// Creates a runner.
    #[must_use]
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            debug_case: None,
        }
    }

    /// Keeps a copy of one case's combined program as
    /// `debug_case_{N}.lp` in `dir`.
    #[must_use]
    pub fn with_debug_case(mut self, case: u32, dir: impl Into<PathBuf>) -> Self {
        self.debug_case = Some((case, dir.into()));
        self
    }

    /// Solves every case against `program`.
    #[must_use]
    pub fn run_cases(&self, program: &str, cases: &[CaseFacts]) -> Vec<CaseRun> {
        let runs: Vec<CaseRun> = cases
            .iter()
            .map(|case| {
                let output = match self.run_case(program, case) {
                    Ok(stdout) => {
                        tracing::info!(
                            case = case.case,
                            fired = stdout.matches("fired(").count(),
                            "solved case"
                        );
                        stdout
                    }
                    Err(err) => {
                        tracing::warn!(case = case.case, error = %err, "case failed");
                        format!("{ERROR_PREFIX} {err}")
                    }
                };
                CaseRun {
                    case: case.case,
                    output,
                }
            })
            .collect();

        tracing::info!(
            solver = self.solver.name(),
            cases = runs.len(),
            failed = runs.iter().filter(|r| r.is_error()).count(),
            "solver batch finished"
        );
        runs
    }

    fn run_case(&self, program: &str, case: &CaseFacts) -> Result<String> {
        let text = case_program(program, case);
        let mut file = tempfile::Builder::new()
            .prefix("guidelog-case-")
            .suffix(".lp")
            .tempfile()
            .map_err(|e| Error::solver(format!("cannot create temporary file: {e}")))?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| Error::io(file.path(), &e))?;

        let debug_dir = self
            .debug_case
            .as_ref()
            .filter(|(debug_case, _)| *debug_case == case.case);
        if let Some((_, dir)) = debug_dir {
            let path = dir.join(format!("debug_case_{}.lp", case.case));
            fs::write(&path, &text).map_err(|e| Error::io(&path, &e))?;
            tracing::info!(path = %path.display(), "saved debug program");
        }

        self.solver.solve(file.path())
    }
}

/// Writes recorded runs as `=== Case N ===` sections, sorted by case number.
///
/// # Errors
///
/// Returns an I/O error naming the path if the file cannot be written.
pub fn write_solver_output(path: &Path, runs: &[CaseRun]) -> Result<()> {
    fs::write(path, render_solver_output(runs)).map_err(|e| Error::io(path, &e))
}

/// Renders recorded runs in the solver output file format.
#[must_use]
pub fn render_solver_output(runs: &[CaseRun]) -> String {
    let mut sorted: Vec<&CaseRun> = runs.iter().collect();
    sorted.sort_by_key(|run| run.case);

    let separator = "=".repeat(BANNER_WIDTH);
    let mut text = String::new();
    for run in sorted {
        text.push_str(&format!(
            "=== Case {} ===\n{}\n{separator}\n\n",
            run.case, run.output
        ));
    }
    text
}
