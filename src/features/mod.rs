//! Bag-of-words features over a fitted vocabulary.
//!
//! - [`vocabulary`] — the token → index mapping plus the weighting scheme it was
//!   fitted with, deserialized from the vocabulary artifact.
//! - [`vectorizer`] — turns a normalized token string into a sparse
//!   [`FeatureVector`](vectorizer::FeatureVector) of the vocabulary's dimension.

pub mod vectorizer;
pub mod vocabulary;
