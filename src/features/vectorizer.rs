use std::collections::BTreeMap;

use crate::features::vocabulary::{Norm, Vocabulary, Weighting};

/// Sparse feature vector of a fixed dimension.
///
/// Entries are sorted by index and hold only non-zero values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }
}

/// Map a normalized token string onto the vocabulary's feature space.
///
/// Out-of-vocabulary tokens are dropped. The result always has dimension
/// `vocabulary.dimension()`, including the all-zero vector for empty input.
pub fn vectorize(normalized: &str, vocabulary: &Vocabulary) -> FeatureVector {
    let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
    for token in normalized.split_whitespace() {
        if let Some(i) = vocabulary.index_of(token) {
            *counts.entry(i).or_insert(0.0) += 1.0;
        }
    }

    let mut entries: Vec<(usize, f64)> = match vocabulary.weighting() {
        Weighting::Count { binary: false } => counts.into_iter().collect(),
        Weighting::Count { binary: true } => counts.into_keys().map(|i| (i, 1.0)).collect(),
        Weighting::Tfidf {
            idf,
            norm,
            sublinear_tf,
        } => {
            let mut weighted: Vec<(usize, f64)> = counts
                .into_iter()
                .map(|(i, count)| {
                    let tf = if *sublinear_tf { 1.0 + count.ln() } else { count };
                    (i, tf * idf[i])
                })
                .collect();
            if let Some(norm) = norm {
                apply_norm(&mut weighted, *norm);
            }
            weighted
        }
    };
    entries.retain(|&(_, v)| v != 0.0);

    FeatureVector {
        dim: vocabulary.dimension(),
        entries,
    }
}

fn apply_norm(entries: &mut [(usize, f64)], norm: Norm) {
    let total = match norm {
        Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
        Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
    };
    // A zero vector stays zero
    if total > 0.0 {
        for (_, v) in entries.iter_mut() {
            *v /= total;
        }
    }
}
