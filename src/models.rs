use serde::{Deserialize, Serialize};

use crate::classifier::Prediction;

/// Binary sentiment decided by the classifier. There is no neutral class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Negative => write!(f, "Negative"),
        }
    }
}

/// A post handed over by a source. Only `text` is read by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl Post {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: None,
            id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedPost {
    #[serde(flatten)]
    pub post: Post,
    pub sentiment: SentimentLabel,
    pub score: f64,
}

impl ClassifiedPost {
    pub fn new(post: Post, prediction: Prediction) -> Self {
        Self {
            post,
            sentiment: prediction.label,
            score: prediction.score,
        }
    }
}
