/// Checks if a host matches a wildcard domain pattern
///
/// This function supports two types of patterns:
/// 1. Exact match: "bandcamp.com" matches only "bandcamp.com"
/// 2. Wildcard match: "*.bandcamp.com" matches:
///    - "bandcamp.com" (the bare domain)
///    - "artist.bandcamp.com" (single subdomain)
///    - "a.b.bandcamp.com" (nested subdomains)
///
/// # Arguments
///
/// * `pattern` - The host pattern, optionally starting with "*."
/// * `candidate` - The lowercase host to check against the pattern
///
/// # Returns
///
/// * `true` - If the candidate matches the pattern
/// * `false` - Otherwise, including look-alikes such as "mybandcamp.com"
///
/// # Examples
///
/// ```
/// use bandcamp_extractor::links::matches_wildcard;
///
/// assert!(matches_wildcard("bandcamp.com", "bandcamp.com"));
/// assert!(!matches_wildcard("bandcamp.com", "artist.bandcamp.com"));
///
/// assert!(matches_wildcard("*.bandcamp.com", "bandcamp.com"));
/// assert!(matches_wildcard("*.bandcamp.com", "artist.bandcamp.com"));
/// assert!(!matches_wildcard("*.bandcamp.com", "bandcamp.com.example.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}
