//! Link matching module
//!
//! This module finds Bandcamp URLs in free text. Everything here is pure:
//! no I/O, no shared state, identical input always yields identical output.

mod extract;
mod matcher;

pub use extract::extract_bandcamp_links;
pub use matcher::matches_wildcard;

/// Domain pattern covering bandcamp.com and every artist/label subdomain
pub const BANDCAMP_DOMAIN_PATTERN: &str = "*.bandcamp.com";

/// Returns true if the host belongs to Bandcamp
///
/// The host should already be lowercase (as produced by `url::Url`).
///
/// # Examples
///
/// ```
/// use bandcamp_extractor::links::is_bandcamp_host;
///
/// assert!(is_bandcamp_host("bandcamp.com"));
/// assert!(is_bandcamp_host("artist.bandcamp.com"));
/// assert!(!is_bandcamp_host("notbandcamp.com"));
/// ```
pub fn is_bandcamp_host(host: &str) -> bool {
    matches_wildcard(BANDCAMP_DOMAIN_PATTERN, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bandcamp_hosts() {
        assert!(is_bandcamp_host("bandcamp.com"));
        assert!(is_bandcamp_host("label.bandcamp.com"));
        assert!(is_bandcamp_host("daily.bandcamp.com"));
    }

    #[test]
    fn test_lookalike_hosts() {
        assert!(!is_bandcamp_host("bandcamp.com.evil.org"));
        assert!(!is_bandcamp_host("fakebandcamp.com"));
        assert!(!is_bandcamp_host("bandcamp.co"));
    }
}
