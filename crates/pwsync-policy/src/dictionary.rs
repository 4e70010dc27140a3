//! Dictionary word list.

use std::fs;
use std::path::Path;

use crate::error::{PolicyError, PolicyResult};

/// Load a newline-delimited word list.
///
/// Blank and whitespace-only lines are skipped, trailing whitespace is
/// stripped and words are case-folded.
pub fn load_dictionary(path: &Path) -> PolicyResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|source| PolicyError::DictionaryUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_words(&content))
}

fn parse_words(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_end().to_lowercase())
        .collect()
}

/// First dictionary word contained in `password`, ignoring case.
#[must_use]
pub fn find_dictionary_word<'a>(password: &str, words: &'a [String]) -> Option<&'a str> {
    let folded = password.to_lowercase();
    words
        .iter()
        .map(String::as_str)
        .find(|word| folded.contains(word))
}
