// Platform error diagnostics
//
// Maps the free-text error messages yt-dlp (and YouTube) produce onto the
// crate's typed fetch and playlist errors.

use super::UnavailableReason;
use crate::{FetchError, PlaylistResolutionError};

/// Classifies a failed video fetch from its error output
///
/// Restricted-access conditions become [`FetchError::Unavailable`];
/// everything else is treated as a transient network/platform failure.
///
/// # Arguments
///
/// * `message` - stderr from yt-dlp, or an API error message
///
/// # Returns
///
/// The matching [`FetchError`]; the message is shortened to its last `ERROR:` line
pub fn classify_fetch_error(message: &str) -> FetchError {
    let lower = message.to_lowercase();

    if lower.contains("private video") || lower.contains("this video is private") {
        return FetchError::Unavailable(UnavailableReason::Private);
    }

    if lower.contains("confirm your age")
        || lower.contains("age-restricted")
        || lower.contains("age restricted")
        || lower.contains("inappropriate for some users")
    {
        return FetchError::Unavailable(UnavailableReason::AgeRestricted);
    }

    if lower.contains("copyright") {
        return FetchError::Unavailable(UnavailableReason::CopyrightBlocked);
    }

    if lower.contains("removed by the uploader")
        || lower.contains("has been removed")
        || lower.contains("account associated with this video has been terminated")
        || lower.contains("no longer available")
        || lower.contains("does not exist")
    {
        return FetchError::Unavailable(UnavailableReason::Deleted);
    }

    if lower.contains("members-only")
        || lower.contains("join this channel")
        || lower.contains("not made this video available in your country")
        || lower.contains("video unavailable")
    {
        return FetchError::Unavailable(UnavailableReason::Other(summarize(message)));
    }

    FetchError::Network(summarize(message))
}

/// Classifies a failed playlist resolution from its error output
pub fn classify_playlist_error(message: &str) -> PlaylistResolutionError {
    let lower = message.to_lowercase();

    if lower.contains("does not exist") || lower.contains("not found") || lower.contains("404") {
        return PlaylistResolutionError::NotFound(summarize(message));
    }

    if lower.contains("private")
        || lower.contains("sign in")
        || lower.contains("unavailable")
        || lower.contains("403")
    {
        return PlaylistResolutionError::Inaccessible(summarize(message));
    }

    PlaylistResolutionError::Backend(summarize(message))
}

/// Picks the most informative line of a multi-line error output
///
/// yt-dlp prints warnings before the final `ERROR:` line; the last error
/// line (or, failing that, the last non-empty line) is kept.
fn summarize(message: &str) -> String {
    let lines: Vec<&str> = message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let chosen = lines
        .iter()
        .rev()
        .find(|line| line.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .copied()
        .unwrap_or("unknown error");

    chosen.trim_start_matches("ERROR:").trim().to_string()
}
