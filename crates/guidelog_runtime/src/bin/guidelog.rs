//! guidelog CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use guidelog_runtime::{AnalysisConfig, pipeline};
use tracing_subscriber::EnvFilter;

/// Compare and explain ASP formalizations of clinical guidelines
#[derive(Parser, Debug)]
#[command(name = "guidelog")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text where supported
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the dependency graph of a rule file and summarize it
    Graph {
        /// ASP rule file
        rules: PathBuf,
    },

    /// Score generated rule files against a ground truth
    Compare {
        /// Ground-truth rule file
        #[arg(long)]
        ground_truth: PathBuf,

        /// Generated rule files
        #[arg(long, required = true, num_args = 1..)]
        generated: Vec<PathBuf>,

        /// Experiment label for the report
        #[arg(long)]
        experiment: Option<String>,

        /// CSV report to append to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Embedding dimension
        #[arg(long)]
        dimension: Option<usize>,

        /// Weight of the size-mismatch penalty
        #[arg(long)]
        penalty: Option<f64>,
    },

    /// Add fired/1 tracking atoms to a rule file
    Instrument {
        /// Rule file with [clause] markers
        input: PathBuf,

        /// Instrumented program to write
        output: PathBuf,
    },

    /// Run the solver once per case
    Solve {
        /// Instrumented program
        #[arg(long)]
        program: PathBuf,

        /// Case facts file
        #[arg(long)]
        cases: PathBuf,

        /// Solver output to write
        #[arg(long)]
        output: PathBuf,

        /// Keep the combined program of this case next to the input
        #[arg(long)]
        debug_case: Option<u32>,

        /// Solver executable
        #[arg(long)]
        solver: Option<String>,
    },

    /// Explain fired rules in recorded solver output
    Explain {
        /// Instrumented program
        #[arg(long)]
        program: PathBuf,

        /// Recorded solver output
        #[arg(long)]
        solver_output: PathBuf,

        /// Guideline text with numbered clauses
        #[arg(long)]
        guideline: Option<PathBuf>,

        /// Report to write
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> guidelog_foundation::Result<()> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };
    if cli.json {
        config = config.with_json_output(true);
    }

    match cli.command {
        Command::Graph { rules } => {
            print!("{}", pipeline::describe_graph(&rules, &config)?);
        }
        Command::Compare {
            ground_truth,
            generated,
            experiment,
            output,
            dimension,
            penalty,
        } => {
            if let Some(label) = experiment {
                config = config.with_experiment(label);
            }
            if let Some(dimension) = dimension {
                config = config.with_embedding_dimension(dimension);
            }
            if let Some(penalty) = penalty {
                config = config.with_structure_penalty_factor(penalty);
            }
            let scores = match &output {
                Some(path) => pipeline::compare_and_report(&config, &ground_truth, &generated, path)?,
                None => pipeline::compare_files(&config, &ground_truth, &generated)?,
            };
            for (path, score) in generated.iter().zip(&scores) {
                match score {
                    Some(score) => println!("{}: {:.5}", path.display(), score.adjusted),
                    None => println!("{}: failed", path.display()),
                }
            }
        }
        Command::Instrument { input, output } => {
            let registry = pipeline::instrument_file(&input, &output)?;
            println!(
                "Instrumented {} rules ({} constraints) into {}",
                registry.len(),
                registry.constraint_count(),
                output.display()
            );
        }
        Command::Solve {
            program,
            cases,
            output,
            debug_case,
            solver,
        } => {
            if let Some(executable) = solver {
                config = config.with_solver_executable(executable);
            }
            let runs = pipeline::solve_cases(&config, &program, &cases, &output, debug_case)?;
            let failed = runs.iter().filter(|run| run.is_error()).count();
            println!(
                "Solved {} cases ({failed} failed) into {}",
                runs.len(),
                output.display()
            );
        }
        Command::Explain {
            program,
            solver_output,
            guideline,
            output,
        } => {
            let report = pipeline::explain_files(
                &config,
                &program,
                &solver_output,
                guideline.as_deref(),
                &output,
            )?;
            println!(
                "Explained {} fired rules across {} cases into {}",
                report.fired_count(),
                report.cases.len(),
                output.display()
            );
        }
    }
    Ok(())
}
