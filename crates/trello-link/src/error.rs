//! Error types for the Trello link service.

use thiserror::Error;

/// Errors returned by task-board operations.
///
/// Every remote operation returns this type; a lookup miss and a transport
/// failure are both `Err`, callers skip the card either way.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The request never produced a response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with an unexpected status
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body could not be decoded
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// No open list with the requested name exists on the board
    #[error("no open list named '{name}' on board {board}")]
    ListNotFound { board: String, name: String },
}

impl BoardError {
    /// HTTP status carried by the error, if the service answered at all.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } | Self::Decode { source, .. } => source.status(),
            Self::ListNotFound { .. } => None,
        }
    }
}

/// Errors raised while building the [`Config`](crate::Config).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Card action is neither `attachment` nor `comment`
    #[error("unsupported card action '{0}', expected 'attachment' or 'comment'")]
    UnknownCardAction(String),

    /// A required value was blank
    #[error("{0} must not be empty")]
    MissingValue(&'static str),

    /// Concurrency cap of zero
    #[error("max concurrency must be at least 1")]
    InvalidConcurrency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_not_found_mentions_board_and_name() {
        let err = BoardError::ListNotFound {
            board: "b1".to_string(),
            name: "Done".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("b1"));
        assert!(message.contains("'Done'"));
        assert!(err.status().is_none());
    }

    #[test]
    fn test_status_error_exposes_status() {
        let err = BoardError::Status {
            url: "https://api.trello.com/1/cards/c1".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::UnknownCardAction("label".to_string()).to_string(),
            "unsupported card action 'label', expected 'attachment' or 'comment'"
        );
        assert_eq!(
            ConfigError::MissingValue("board id").to_string(),
            "board id must not be empty"
        );
    }
}
