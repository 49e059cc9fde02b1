use std::sync::Arc;

use tracing::{debug, info};

use crate::artifacts::ArtifactStore;
use crate::classifier::{self, Prediction};
use crate::error::Result;
use crate::features::vectorizer::{vectorize, FeatureVector};
use crate::models::{ClassifiedPost, Post, SentimentLabel};
use crate::text::normalize::normalize;

/// `text → normalize → vectorize → predict`, over artifacts from one [`ArtifactStore`].
///
/// Holds no per-call state: calls are independent and may run concurrently.
#[derive(Debug, Clone)]
pub struct SentimentPipeline {
    store: Arc<ArtifactStore>,
}

impl SentimentPipeline {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self { store }
    }

    pub fn classify(&self, text: &str) -> Result<SentimentLabel> {
        let vector = self.features(text)?;
        classifier::predict(&vector, self.store.classifier_parameters()?)
    }

    /// Like [`classify`](Self::classify), also returning the decision score.
    pub fn classify_detailed(&self, text: &str) -> Result<Prediction> {
        let vector = self.features(text)?;
        classifier::predict_with_score(&vector, self.store.classifier_parameters()?)
    }

    /// Classify every post, returning results in input order.
    pub fn classify_posts(&self, posts: Vec<Post>) -> Result<Vec<ClassifiedPost>> {
        info!(posts = posts.len(), "classifying batch");
        posts
            .into_iter()
            .map(|post| -> Result<ClassifiedPost> {
                let prediction = self.classify_detailed(&post.text)?;
                Ok(ClassifiedPost::new(post, prediction))
            })
            .collect()
    }

    fn features(&self, text: &str) -> Result<FeatureVector> {
        let normalized = normalize(text, self.store.stopwords()?);
        let vector = vectorize(&normalized, self.store.vocabulary()?);
        if vector.is_zero() {
            debug!(normalized = %normalized, "no known tokens, falling back to intercept");
        } else {
            debug!(normalized = %normalized, features = vector.nnz(), "vectorized");
        }
        Ok(vector)
    }
}
