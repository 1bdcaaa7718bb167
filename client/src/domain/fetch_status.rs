//! Fetch lifecycle status published to the view layer.

/// Status of the most recent fetch.
///
/// Transitions: `Idle → Loading` on fetch start, `Loading → Success` or
/// `Loading → Error` on completion, `Success | Error → Loading` on the next
/// start. Changing the resource kind mid-flight moves `Loading → Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// No fetch has been issued, or the last one was cancelled.
    #[default]
    Idle,
    /// A request is outstanding.
    Loading,
    /// The last fetch replaced the collection.
    Success,
    /// The last fetch failed; the message is the transport's, unmodified.
    Error(String),
}

impl FetchStatus {
    /// Whether a request is outstanding.
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether the status is terminal for the current fetch.
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Success | Self::Error(_))
    }

    /// Failure reason, when the last fetch failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
