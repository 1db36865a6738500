//! Bandcamp URL extraction from description text

use super::is_bandcamp_host;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// Characters stripped from the end of a candidate URL
///
/// Descriptions routinely put links at the end of a sentence or inside
/// parentheses, so these never belong to the link itself.
const TRAILING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"', '*', '>',
];

fn url_candidate_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| {
        Regex::new(r#"(?i)https?://[^\s<>"]+"#).expect("URL candidate pattern is valid")
    })
}

/// Extracts every distinct Bandcamp URL from a block of free text
///
/// # Matching Rules
///
/// - A candidate starts at `http://` or `https://` and runs until whitespace,
///   `<`, `>` or `"`
/// - Trailing punctuation (`.,;:!?)]}'"*>`) is trimmed
/// - The candidate must parse as a URL whose host is `bandcamp.com` or one of
///   its subdomains
/// - Duplicates collapse to one entry; results keep first-seen order
///
/// Empty text yields an empty vector.
///
/// # Arguments
///
/// * `text` - Free text, typically a video description
///
/// # Returns
///
/// The distinct Bandcamp URLs in the order they first appear
///
/// # Example
///
/// ```
/// use bandcamp_extractor::links::extract_bandcamp_links;
///
/// let text = "check out https://artist.bandcamp.com/album/x and also https://artist.bandcamp.com/album/x";
/// assert_eq!(
///     extract_bandcamp_links(text),
///     vec!["https://artist.bandcamp.com/album/x".to_string()]
/// );
/// assert!(extract_bandcamp_links("no links here").is_empty());
/// ```
pub fn extract_bandcamp_links(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for candidate in url_candidate_regex().find_iter(text) {
        let trimmed = candidate.as_str().trim_end_matches(TRAILING_PUNCTUATION);

        if !is_bandcamp_url(trimmed) {
            continue;
        }

        if seen.insert(trimmed.to_string()) {
            links.push(trimmed.to_string());
        }
    }

    links
}

/// Returns true if the string parses as a URL on a Bandcamp host
fn is_bandcamp_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .ok()
        .and_then(|url| url.host_str().map(is_bandcamp_host))
        .unwrap_or(false)
}
