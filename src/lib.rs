//! # tweet-sentiment
//!
//! Binary sentiment classification of short posts with a pre-fitted bag-of-words
//! linear model.
//!
//! ```text
//! raw text → text::normalize → features::vectorize → classifier::predict → SentimentLabel
//!                 ↑                     ↑                       ↑
//!             stopwords             vocabulary             model weights
//!                 └──────────── ArtifactStore (loaded once) ────┘
//! ```
//!
//! [`pipeline::SentimentPipeline::classify`] is the entry point for collaborators;
//! post sources ([`source`]) and presenters ([`report`]) sit around it.

/// Load-once cache of the stopword list, vocabulary and model weights.
pub mod artifacts;
/// Linear decision function over feature vectors.
pub mod classifier;
/// TOML configuration: artifact locations and post source settings.
pub mod config;
/// Typed errors of the classification core.
pub mod error;
pub mod features;
/// Posts, labels and classified results.
pub mod models;
/// Composition of normalizer, vectorizer and classifier.
pub mod pipeline;
pub mod report;
pub mod source;
pub mod text;
