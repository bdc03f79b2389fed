//! Text tokenization utilities.

/// Split already lower-cased text into whitespace-separated words.
///
/// No punctuation stripping, stemming or stop-word handling is done.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
  text.split_whitespace()
}

/// Lower-case `text` and split it into words.
pub fn tokenize(text: &str) -> Vec<String> {
  words(&text.to_lowercase()).map(str::to_string).collect()
}
