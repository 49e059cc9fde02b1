use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{ArtifactKind, Result, SentimentError};
use crate::features::vectorizer::FeatureVector;
use crate::models::SentimentLabel;

/// On-disk shape of the model artifact.
#[derive(Debug, Deserialize)]
struct ModelFile {
    coef: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_classes")]
    classes: [i64; 2],
    #[serde(default = "default_positive_class")]
    positive_class: i64,
    #[serde(default)]
    threshold: f64,
}

/// Fitted linear decision boundary. Only constructed through validation.
///
/// `score = coef · x + intercept`. A score strictly above `threshold` selects
/// `classes[1]`, anything else `classes[0]`; the selected class maps to
/// [`SentimentLabel::Positive`] when it equals `positive_class`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierParameters {
    coef: Vec<f64>,
    intercept: f64,
    classes: [i64; 2],
    positive_class: i64,
    threshold: f64,
}

fn default_classes() -> [i64; 2] {
    [0, 1]
}

fn default_positive_class() -> i64 {
    1
}

/// Label plus the raw decision score it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: SentimentLabel,
    pub score: f64,
}

impl ClassifierParameters {
    /// Parameters with the conventional `[0, 1]` classes, `1` = positive, threshold 0.
    pub fn new(coef: Vec<f64>, intercept: f64) -> Result<Self> {
        Self {
            coef,
            intercept,
            classes: default_classes(),
            positive_class: default_positive_class(),
            threshold: 0.0,
        }
        .validated()
    }

    /// Read and validate a JSON model artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SentimentError::ArtifactIo {
            kind: ArtifactKind::Model,
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        let file: ModelFile =
            serde_json::from_str(&content).map_err(|source| SentimentError::ArtifactDecode {
                kind: ArtifactKind::Model,
                path: path.to_path_buf(),
                source: Arc::new(source),
            })?;
        Self {
            coef: file.coef,
            intercept: file.intercept,
            classes: file.classes,
            positive_class: file.positive_class,
            threshold: file.threshold,
        }
        .validated()
    }

    fn validated(self) -> Result<Self> {
        if let Some(pos) = self.coef.iter().position(|w| !w.is_finite()) {
            return Err(SentimentError::invalid(
                ArtifactKind::Model,
                format!("coef[{}] is not a finite number", pos),
            ));
        }
        if !self.intercept.is_finite() || !self.threshold.is_finite() {
            return Err(SentimentError::invalid(
                ArtifactKind::Model,
                "intercept and threshold must be finite numbers",
            ));
        }
        if self.classes[0] == self.classes[1] {
            return Err(SentimentError::invalid(
                ArtifactKind::Model,
                format!("both classes are {}", self.classes[0]),
            ));
        }
        if !self.classes.contains(&self.positive_class) {
            return Err(SentimentError::invalid(
                ArtifactKind::Model,
                format!(
                    "positive class {} is not one of {:?}",
                    self.positive_class, self.classes
                ),
            ));
        }
        Ok(self)
    }

    /// Number of features the weights were fitted over.
    pub fn dimension(&self) -> usize {
        self.coef.len()
    }

    /// Label produced for the all-zero vector, i.e. for empty or fully unknown text.
    pub fn default_label(&self) -> SentimentLabel {
        self.label_for(self.intercept)
    }

    fn label_for(&self, score: f64) -> SentimentLabel {
        let class = if score > self.threshold {
            self.classes[1]
        } else {
            self.classes[0]
        };
        if class == self.positive_class {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        }
    }
}

/// Raw linear score of `vector` under `params`.
///
/// A dimension mismatch means the vocabulary and the weights were not fitted
/// together; it is reported as a [`SentimentError::ContractViolation`].
pub fn decision_function(vector: &FeatureVector, params: &ClassifierParameters) -> Result<f64> {
    if vector.dim() != params.dimension() {
        return Err(SentimentError::ContractViolation {
            expected: params.dimension(),
            actual: vector.dim(),
        });
    }
    let dot: f64 = vector.iter().map(|(i, v)| v * params.coef[i]).sum();
    Ok(dot + params.intercept)
}

pub fn predict(vector: &FeatureVector, params: &ClassifierParameters) -> Result<SentimentLabel> {
    decision_function(vector, params).map(|score| params.label_for(score))
}

pub fn predict_with_score(
    vector: &FeatureVector,
    params: &ClassifierParameters,
) -> Result<Prediction> {
    let score = decision_function(vector, params)?;
    Ok(Prediction {
        label: params.label_for(score),
        score,
    })
}
