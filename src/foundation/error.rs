/// Result alias for every fallible scrollreel API.
pub type ReelResult<T> = Result<T, ReelError>;

/// Failures of setup and asset IO.
///
/// A scroll tick never produces one of these; bad frames degrade to a skipped draw and missing
/// markers to default signal values.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Engine config, marker layout, frame pattern or surface size is unusable.
    #[error("invalid config: {0}")]
    Config(String),

    /// A config or layout document did not match its JSON schema.
    #[error("parse {what}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Frame `number` (1-based) could not be read or decoded.
    #[error("frame {number}: {reason}")]
    Frame { number: usize, reason: String },

    /// The surface refused a frame.
    #[error("surface: {0}")]
    Surface(String),

    #[error("preload thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// IO and other lower-level failures, carrying their `anyhow` context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn parse(what: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { what, source }
    }

    pub fn frame(number: usize, reason: impl Into<String>) -> Self {
        Self::Frame {
            number,
            reason: reason.into(),
        }
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// 1-based frame number this error is about, if any.
    pub fn frame_number(&self) -> Option<usize> {
        match self {
            Self::Frame { number, .. } => Some(*number),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
