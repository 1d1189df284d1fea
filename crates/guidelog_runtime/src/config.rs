//! Configuration for an analysis run.

use std::path::Path;

use guidelog_foundation::{Error, ErrorKind, Result};
use guidelog_similarity::{HashedNgramEmbedder, ScorerConfig};

/// Settings shared by the CLI subcommands.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Label written to the `experiment` column of the similarity report.
    pub experiment: String,

    /// Length of node description embeddings.
    pub embedding_dimension: usize,

    /// Seed for the built-in embedder.
    pub embedding_seed: u64,

    /// Weight of the size-mismatch penalty.
    pub structure_penalty_factor: f64,

    /// Answer-set solver executable.
    pub solver_executable: String,

    /// Arguments passed to the solver before the program path.
    pub solver_args: Vec<String>,

    /// Print JSON instead of text where a command supports it.
    pub json_output: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            experiment: "Unknown".to_string(),
            embedding_dimension: HashedNgramEmbedder::DEFAULT_DIMENSION,
            embedding_seed: 0,
            structure_penalty_factor: ScorerConfig::DEFAULT_PENALTY_FACTOR,
            solver_executable: "clingo".to_string(),
            solver_args: vec!["--warn=no-atom-undefined".to_string()],
            json_output: false,
        }
    }
}

impl AnalysisConfig {
    /// Creates a configuration for a named experiment.
    #[must_use]
    pub fn experiment(label: impl Into<String>) -> Self {
        Self {
            experiment: label.into(),
            ..Self::default()
        }
    }

    /// Small embeddings for quick local runs and tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            embedding_dimension: 64,
            ..Self::default()
        }
    }

    /// Scores on edge content alone, without the size-mismatch penalty.
    #[must_use]
    pub fn unpenalized() -> Self {
        Self {
            structure_penalty_factor: 0.0,
            ..Self::default()
        }
    }

    /// Loads a configuration from a JSON file. Missing fields take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a serialization
    /// error if it is not a valid configuration.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        serde_json::from_str(&text).map_err(|e| {
            Error::new(ErrorKind::Serialization(format!("{}: {e}", path.display())))
        })
    }

    /// Builder method to set the experiment label.
    #[must_use]
    pub fn with_experiment(mut self, label: impl Into<String>) -> Self {
        self.experiment = label.into();
        self
    }

    /// Builder method to set the embedding dimension.
    #[must_use]
    pub fn with_embedding_dimension(mut self, dimension: usize) -> Self {
        self.embedding_dimension = dimension;
        self
    }

    /// Builder method to set the embedding seed.
    #[must_use]
    pub fn with_embedding_seed(mut self, seed: u64) -> Self {
        self.embedding_seed = seed;
        self
    }

    /// Builder method to set the penalty weight.
    #[must_use]
    pub fn with_structure_penalty_factor(mut self, factor: f64) -> Self {
        self.structure_penalty_factor = factor;
        self
    }

    /// Builder method to set the solver executable.
    #[must_use]
    pub fn with_solver_executable(mut self, executable: impl Into<String>) -> Self {
        self.solver_executable = executable.into();
        self
    }

    /// Builder method to replace the solver arguments.
    #[must_use]
    pub fn with_solver_args(mut self, args: Vec<String>) -> Self {
        self.solver_args = args;
        self
    }

    /// Builder method to enable/disable JSON output.
    #[must_use]
    pub fn with_json_output(mut self, json: bool) -> Self {
        self.json_output = json;
        self
    }

    /// Returns the scorer settings.
    #[must_use]
    pub fn scorer_config(&self) -> ScorerConfig {
        ScorerConfig::default().with_structure_penalty_factor(self.structure_penalty_factor)
    }

    /// Builds the embedder.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if the dimension is zero.
    pub fn embedder(&self) -> Result<HashedNgramEmbedder> {
        HashedNgramEmbedder::new(self.embedding_dimension, self.embedding_seed)
    }
}
