//! Playlist URL parsing

use crate::links::matches_wildcard;
use crate::PlaylistResolutionError;
use url::Url;

/// Hosts that serve YouTube playlists
const YOUTUBE_HOSTS: &[&str] = &["*.youtube.com", "youtu.be"];

/// Extracts the playlist identifier from a YouTube playlist URL
///
/// Accepts `http`/`https` URLs on youtube.com (any subdomain, e.g. `www`,
/// `m`, `music`) or youtu.be that carry a non-empty `list` query parameter.
///
/// # Arguments
///
/// * `playlist_url` - The URL given on the command line
///
/// # Returns
///
/// * `Ok(String)` - The playlist identifier
/// * `Err(PlaylistResolutionError::InvalidUrl)` - Not an http(s) YouTube URL
/// * `Err(PlaylistResolutionError::MissingPlaylistId)` - No usable `list` parameter
///
/// # Examples
///
/// ```
/// use bandcamp_extractor::platform::parse_playlist_id;
///
/// let id = parse_playlist_id("https://www.youtube.com/playlist?list=PL123abc").unwrap();
/// assert_eq!(id, "PL123abc");
///
/// assert!(parse_playlist_id("https://example.com/playlist?list=PL123").is_err());
/// ```
pub fn parse_playlist_id(playlist_url: &str) -> Result<String, PlaylistResolutionError> {
    let url = Url::parse(playlist_url.trim())
        .map_err(|e| PlaylistResolutionError::InvalidUrl(format!("{}: {}", playlist_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(PlaylistResolutionError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            playlist_url,
            url.scheme()
        )));
    }

    let host = url.host_str().unwrap_or_default();
    if !YOUTUBE_HOSTS
        .iter()
        .any(|pattern| matches_wildcard(pattern, host))
    {
        return Err(PlaylistResolutionError::InvalidUrl(format!(
            "{}: not a YouTube URL",
            playlist_url
        )));
    }

    url.query_pairs()
        .find(|(key, _)| key == "list")
        .map(|(_, value)| value.trim().to_string())
        .filter(|id| !id.is_empty() && id.chars().all(is_playlist_id_char))
        .ok_or_else(|| PlaylistResolutionError::MissingPlaylistId(playlist_url.to_string()))
}

fn is_playlist_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Watch URL for a video identifier
pub fn video_url(identifier: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_playlist_url() {
        assert_eq!(
            parse_playlist_id("https://www.youtube.com/playlist?list=PLabc_DEF-123").unwrap(),
            "PLabc_DEF-123"
        );
    }

    #[test]
    fn test_watch_url_with_list() {
        assert_eq!(
            parse_playlist_id("https://www.youtube.com/watch?v=xyz&list=PL42&index=3").unwrap(),
            "PL42"
        );
    }

    #[test]
    fn test_other_youtube_hosts() {
        assert!(parse_playlist_id("https://music.youtube.com/playlist?list=OLAK5uy").is_ok());
        assert!(parse_playlist_id("https://m.youtube.com/playlist?list=PL1").is_ok());
        assert!(parse_playlist_id("https://youtube.com/playlist?list=PL1").is_ok());
        assert!(parse_playlist_id("https://youtu.be/xyz?list=PL1").is_ok());
    }

    #[test]
    fn test_malformed_url() {
        assert!(matches!(
            parse_playlist_id("not a url"),
            Err(PlaylistResolutionError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_playlist_id("ftp://www.youtube.com/playlist?list=PL1"),
            Err(PlaylistResolutionError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_foreign_host() {
        assert!(matches!(
            parse_playlist_id("https://vimeo.com/playlist?list=PL1"),
            Err(PlaylistResolutionError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_playlist_id("https://youtube.com.evil.net/playlist?list=PL1"),
            Err(PlaylistResolutionError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_missing_list_parameter() {
        assert!(matches!(
            parse_playlist_id("https://www.youtube.com/watch?v=xyz"),
            Err(PlaylistResolutionError::MissingPlaylistId(_))
        ));
        assert!(matches!(
            parse_playlist_id("https://www.youtube.com/playlist?list="),
            Err(PlaylistResolutionError::MissingPlaylistId(_))
        ));
        assert!(matches!(
            parse_playlist_id("https://www.youtube.com/playlist?list=PL1;drop"),
            Err(PlaylistResolutionError::MissingPlaylistId(_))
        ));
    }

    #[test]
    fn test_video_url() {
        assert_eq!(video_url("abc123"), "https://www.youtube.com/watch?v=abc123");
    }
}
