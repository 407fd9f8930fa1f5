use std::fs;
use std::path::Path;

use crate::error::HunterError;

/// Split newline-delimited text into candidates. Lines are trimmed, blank lines
/// dropped; order and duplicates are kept.
pub fn parse_wordlist(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a wordlist from disk. Unreadable or non-UTF-8 files are input errors.
pub fn load_wordlist(path: &Path) -> Result<Vec<String>, HunterError> {
    let content = fs::read_to_string(path).map_err(|source| HunterError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    let words = parse_wordlist(&content);
    tracing::debug!(path = %path.display(), count = words.len(), "loaded wordlist");
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_blank_lines() {
        let words = parse_wordlist("users\n  orders \r\n\n   \nghost\n");
        assert_eq!(words, vec!["users", "orders", "ghost"]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let words = parse_wordlist("a\nb\na\n");
        assert_eq!(words, vec!["a", "b", "a"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_wordlist("").is_empty());
        assert!(parse_wordlist("\n\n  \n").is_empty());
    }
}
