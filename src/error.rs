use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Which of the three fitted artifacts an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Stopwords,
    Vocabulary,
    Model,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Stopwords => write!(f, "stopword list"),
            ArtifactKind::Vocabulary => write!(f, "vocabulary"),
            ArtifactKind::Model => write!(f, "model"),
        }
    }
}

/// Failures of the classification core.
///
/// Every variant is fatal for the pipeline: artifact errors mean nothing can be
/// classified, and a contract violation means the vocabulary and the model were
/// not fitted together.
///
/// Cloneable so the artifact store can hand the same load failure to every caller.
#[derive(Error, Debug, Clone)]
pub enum SentimentError {
    #[error("failed to read {kind} artifact {path}: {source}")]
    ArtifactIo {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("failed to decode {kind} artifact {path}: {source}")]
    ArtifactDecode {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("invalid {kind} artifact: {reason}")]
    ArtifactInvalid { kind: ArtifactKind, reason: String },

    #[error("contract violation: feature vector has dimension {actual}, classifier expects {expected}")]
    ContractViolation { expected: usize, actual: usize },
}

impl SentimentError {
    pub fn invalid(kind: ArtifactKind, reason: impl Into<String>) -> Self {
        SentimentError::ArtifactInvalid {
            kind,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SentimentError>;
