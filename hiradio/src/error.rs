//! Error types for the Hichannel client

/// Result type alias for Hichannel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using the Hichannel client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network or connection failure (includes timeouts)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The catalog answered with a non-2xx status
    #[error("{method} {url}: {status} {body}")]
    Upstream {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// Response body is not valid JSON for the expected shape
    #[error("JSON parsing failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid endpoint URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// `play.do` answered with an empty `playRadio`
    #[error("playlist not found, channel id: {0}")]
    PlaylistNotFound(u32),

    /// `getProgramList.do` answered with an empty `channel_title`
    #[error("channel not found, channel id: {0}")]
    ChannelNotFound(u32),

    /// A page fetch task ended without reporting (it panicked)
    #[error("channel list page {0} was lost")]
    PageLost(u32),

    /// IO error (proxy bind/serve)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the catalog answered correctly but has no such entity
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PlaylistNotFound(_) | Self::ChannelNotFound(_))
    }

    /// HTTP status of an upstream error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display() {
        let err = Error::Upstream {
            method: "GET".to_string(),
            url: "http://localhost/radio/play.do?id=1".to_string(),
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GET http://localhost/radio/play.do?id=1: 503 maintenance"
        );
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_page_lost_display() {
        let err = Error::PageLost(3);
        assert_eq!(err.to_string(), "channel list page 3 was lost");
        assert!(!err.is_not_found());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_not_found_kinds() {
        assert!(Error::PlaylistNotFound(232).is_not_found());
        assert!(Error::ChannelNotFound(232).is_not_found());
        assert_eq!(
            Error::PlaylistNotFound(232).to_string(),
            "playlist not found, channel id: 232"
        );
    }
}
