//! Tokenising and counting helpers shared by the text-based strategies.

/// Separators between query and text words.
const WORD_SEPARATORS: &[char] = &[',', '.', ';', ':', '!', '?'];

/// Separators between words of an attachment query (file names use `_`).
const ATTACHMENT_SEPARATORS: &[char] = &[',', '.', ';', ':', '!', '?', '_'];

/// Separators inside names and email addresses.
const IDENTITY_SEPARATORS: &[char] = &['@', '.', '_', '+', '-'];

fn split_on<'a>(text: &'a str, separators: &'a [char]) -> impl Iterator<Item = &'a str> + 'a {
    text.split(move |c: char| c.is_whitespace() || separators.contains(&c))
        .filter(|word| !word.is_empty())
}

/// Words of a subject, body or text query.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    split_on(text, WORD_SEPARATORS)
}

/// Words of an attachment query.
pub fn attachment_terms(text: &str) -> impl Iterator<Item = &str> {
    split_on(text, ATTACHMENT_SEPARATORS)
}

/// Tokens of a name or email address.
pub fn identity_tokens(text: &str) -> impl Iterator<Item = &str> {
    split_on(text, IDENTITY_SEPARATORS)
}

/// Non-overlapping occurrences of `needle` in `haystack`. An empty needle
/// occurs zero times.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Lower-cases and trims a query.
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}
