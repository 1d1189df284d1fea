//! Appendable CSV report of similarity scores.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use guidelog_foundation::{Error, Result};

/// Header line of a new report.
pub const REPORT_HEADER: &str = "experiment,adjacency_similarity";

/// One report row.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimilarityRow {
    /// Experiment label.
    pub experiment: String,
    /// Adjusted similarity, rounded to five decimal places.
    pub adjacency_similarity: f64,
}

impl SimilarityRow {
    /// Creates a row, rounding the similarity.
    #[must_use]
    pub fn new(experiment: impl Into<String>, similarity: f64) -> Self {
        Self {
            experiment: experiment.into(),
            adjacency_similarity: round5(similarity),
        }
    }

    /// Renders the row as one CSV line without a newline.
    #[must_use]
    pub fn to_csv(&self) -> String {
        format!("{},{}", csv_field(&self.experiment), self.adjacency_similarity)
    }
}

fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

/// Quotes a field containing a comma, quote, or newline.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// A report file that rows are appended to.
#[derive(Clone, Debug)]
pub struct SimilarityReport {
    path: PathBuf,
}

impl SimilarityReport {
    /// Creates a handle; nothing is written until [`append`](Self::append).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the report path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends rows, creating the file (with header) and its parent
    /// directory when missing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the path if the file cannot be written.
    pub fn append(&self, rows: &[SimilarityRow]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, &e))?;
        }

        let exists = self.path.is_file();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, &e))?;

        let mut text = String::new();
        if !exists {
            text.push_str(REPORT_HEADER);
            text.push('\n');
        }
        for row in rows {
            text.push_str(&row.to_csv());
            text.push('\n');
        }
        file.write_all(text.as_bytes())
            .map_err(|e| Error::io(&self.path, &e))?;

        tracing::info!(
            path = %self.path.display(),
            rows = rows.len(),
            created = !exists,
            "appended similarity rows"
        );
        Ok(())
    }
}
