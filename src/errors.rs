//! errors raised by the analysis.
//!
//! Per-row anomalies (blank family id, hypothetical proteins, unresolved subsystem rows)
//! are never errors, they are counted. The variants here abort a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FigsetError {
    /// two files claim the same genome
    #[error("genome id {genome_id} derived from both {first_source} and {second_source}")]
    DuplicateGenome {
        genome_id: String,
        first_source: String,
        second_source: String,
    },

    #[error("expected at least one genome for {context}, got none")]
    NoGenomes { context: String },

    /// a similarity denominator would be zero
    #[error("genome {genome_id} has an empty protein family set, similarity is undefined")]
    EmptyProteinSet { genome_id: String },

    #[error("no data row in {source_name}, cannot derive a genome id")]
    MissingGenomeId { source_name: String },

    /// csv readers need a single ascii byte
    #[error("delimiter {0:?} is not an ascii character")]
    InvalidDelimiter(char),

    #[error("output path {0} exists but is not a directory")]
    NotADirectory(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FigsetError>;
