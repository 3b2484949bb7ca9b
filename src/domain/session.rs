//! Preset reflection sessions

use std::fmt;

/// Guided session openers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Premeditatio Malorum: rehearse the day's difficulties in advance
    Morning,
    /// Review of the day's actions
    Evening,
}

impl SessionKind {
    /// The user message that opens the session
    pub fn opener(&self) -> &'static str {
        match self {
            SessionKind::Morning => {
                "Let's begin the morning preparation. Guide me through Premeditatio Malorum."
            }
            SessionKind::Evening => {
                "It is time for the evening review. Let's reflect on today's actions."
            }
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Morning => write!(f, "morning preparation"),
            SessionKind::Evening => write!(f, "evening review"),
        }
    }
}
