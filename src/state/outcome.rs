/// Outcome definitions for processed videos
use crate::platform::UnavailableReason;
use std::fmt;

/// Represents how processing one video ended
///
/// Exactly one outcome is produced per video. Downstream consumers
/// (the result sink and the run log) match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VideoOutcome {
    /// The description contained at least one Bandcamp link
    Found,

    /// The description was read but held no Bandcamp link
    NoneFound,

    /// The video is restricted (age, private, copyright, deleted) and was skipped
    Skipped(UnavailableReason),

    /// The video could not be read because of a network or platform error
    Failed(String),
}

impl VideoOutcome {
    /// Returns true if the description was read successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Found | Self::NoneFound)
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Short label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NoneFound => "none_found",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for VideoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found => write!(f, "link(s) found"),
            Self::NoneFound => write!(f, "no links"),
            Self::Skipped(reason) => write!(f, "skipped: {}", reason),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}
