//! Prompt and username sanitization.

use regex::Regex;
use std::sync::LazyLock;

const MAX_USERNAME_LEN: usize = 64;

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("prompt regex must compile"));

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]").expect("username regex must compile"));

/// Strip punctuation and symbols from a prompt, keeping word characters and
/// whitespace.
pub fn sanitize_prompt(input: &str) -> String {
    NON_WORD_RE.replace_all(input, "").into_owned()
}

/// Normalize a display name for use on the completion wire: lowercase,
/// alphanumeric and underscores only, capped in length.
pub fn sanitize_username(name: &str) -> String {
    let lowered = name.to_lowercase();
    let cleaned = NON_ALNUM_RE.replace_all(&lowered, "").into_owned();
    cleaned.chars().take(MAX_USERNAME_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_prompt_strips_symbols() {
        assert_eq!(
            sanitize_prompt("a cat, wearing (sunglasses)! [hd]"),
            "a cat wearing sunglasses hd"
        );
    }

    #[test]
    fn test_sanitize_prompt_keeps_whitespace_and_words() {
        assert_eq!(sanitize_prompt("plain words stay"), "plain words stay");
    }

    #[test]
    fn test_sanitize_username_lowercases_and_strips() {
        assert_eq!(sanitize_username("Muse Fan #1!"), "musefan1");
    }

    #[test]
    fn test_sanitize_username_caps_length() {
        let long = "a".repeat(100);
        assert_eq!(sanitize_username(&long).len(), MAX_USERNAME_LEN);
    }
}
