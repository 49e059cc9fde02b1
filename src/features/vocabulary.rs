use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ArtifactKind, Result, SentimentError};

/// Vector normalization applied after TF-IDF weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// How raw term counts become feature values. Must match the scheme the model's
/// weights were fitted against; a mismatch changes predictions silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum Weighting {
    /// Raw counts, or presence (1.0) when `binary` is set.
    Count {
        #[serde(default)]
        binary: bool,
    },
    /// `tf * idf[i]`, then normalized over the whole vector.
    Tfidf {
        idf: Vec<f64>,
        #[serde(default = "default_norm")]
        norm: Option<Norm>,
        #[serde(default)]
        sublinear_tf: bool,
    },
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl Default for Weighting {
    fn default() -> Self {
        Weighting::Count { binary: false }
    }
}

/// On-disk shape of the vocabulary artifact.
#[derive(Debug, Serialize, Deserialize)]
struct VocabularyFile {
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    weighting: Weighting,
}

/// Fitted token → feature-index mapping. Indices are exactly `0..dimension()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    weighting: Weighting,
}

impl Vocabulary {
    /// Build a vocabulary, checking that indices form a dense `0..N` range and that
    /// the weighting scheme fits that dimension.
    pub fn new(index: HashMap<String, usize>, weighting: Weighting) -> Result<Self> {
        let dim = index.len();
        let mut seen = vec![false; dim];

        for (token, &i) in &index {
            if i >= dim {
                return Err(SentimentError::invalid(
                    ArtifactKind::Vocabulary,
                    format!("token {:?} has index {} outside 0..{}", token, i, dim),
                ));
            }
            if std::mem::replace(&mut seen[i], true) {
                return Err(SentimentError::invalid(
                    ArtifactKind::Vocabulary,
                    format!("index {} is assigned to more than one token", i),
                ));
            }
        }

        if let Weighting::Tfidf { idf, .. } = &weighting {
            if idf.len() != dim {
                return Err(SentimentError::invalid(
                    ArtifactKind::Vocabulary,
                    format!("idf has {} entries for {} tokens", idf.len(), dim),
                ));
            }
            if let Some(pos) = idf.iter().position(|v| !v.is_finite()) {
                return Err(SentimentError::invalid(
                    ArtifactKind::Vocabulary,
                    format!("idf[{}] is not a finite number", pos),
                ));
            }
        }

        // Tokens the normalizer can never produce are dead weight, not an error.
        let unreachable = index
            .keys()
            .filter(|t| t.is_empty() || !t.bytes().all(|b| b.is_ascii_lowercase()))
            .count();
        if unreachable > 0 {
            warn!(
                unreachable,
                "vocabulary contains tokens that normalized text can never match"
            );
        }

        Ok(Self { index, weighting })
    }

    /// Read and validate a JSON vocabulary artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SentimentError::ArtifactIo {
            kind: ArtifactKind::Vocabulary,
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        let file: VocabularyFile =
            serde_json::from_str(&content).map_err(|source| SentimentError::ArtifactDecode {
                kind: ArtifactKind::Vocabulary,
                path: path.to_path_buf(),
                source: Arc::new(source),
            })?;
        Self::new(file.vocabulary, file.weighting)
    }

    pub fn dimension(&self) -> usize {
        self.index.len()
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn weighting(&self) -> &Weighting {
        &self.weighting
    }
}
