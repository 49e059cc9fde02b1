use crate::text::stopwords::StopwordSet;

/// Reduce raw text to the token string the vocabulary was fitted on.
///
/// Only `[a-zA-Z]` survives: digits, punctuation, emoji and non-ASCII letters all act
/// as separators. Tokens are lowercased, stopwords dropped, and the survivors joined
/// with single spaces in their original order. Never fails; degenerate input yields
/// an empty string.
pub fn normalize(text: &str, stopwords: &StopwordSet) -> String {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| !t.is_empty())
        .map(str::to_ascii_lowercase)
        .filter(|t| !stopwords.contains(t))
        .collect::<Vec<_>>()
        .join(" ")
}
