//! Lexical normalization of raw post text.
//!
//! - [`stopwords`] — the immutable [`StopwordSet`](stopwords::StopwordSet), either the
//!   built-in English list or one loaded from a word-per-line file.
//! - [`normalize`] — reduces text to lowercase ASCII-letter tokens with stopwords removed.

pub mod normalize;
pub mod stopwords;
