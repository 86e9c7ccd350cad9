//! Event routing.
//!
//! Classifies the payload and hands it to the matching handler.

use tracing::{debug, info_span, Instrument};

use crate::client::TaskBoard;
use crate::config::Config;
use crate::events::{EventPayload, TriggeringEvent};
use crate::handlers::{handle_head_commit, handle_pull_request, EventReport};

/// Route one classified event to its handler.
pub async fn dispatch(
    config: &Config,
    board: &dyn TaskBoard,
    event: &TriggeringEvent,
) -> EventReport {
    let span = info_span!("event", kind = event.kind(), board = %config.board_id);

    async {
        match event {
            TriggeringEvent::Commit(commit) => handle_head_commit(config, board, commit).await,
            TriggeringEvent::PullRequest(pr) => handle_pull_request(config, board, pr).await,
        }
    }
    .instrument(span)
    .await
}

/// Classify a raw payload and dispatch it.
///
/// Payloads carrying neither a head commit nor a pull request are a no-op.
pub async fn route_payload(
    config: &Config,
    board: &dyn TaskBoard,
    payload: EventPayload,
) -> EventReport {
    match TriggeringEvent::from_payload(payload) {
        Some(event) => dispatch(config, board, &event).await,
        None => {
            debug!("Payload has no head commit or pull request, nothing to do");
            EventReport::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CardAction, ListNames};
    use crate::handlers::fake::{Call, RecordingBoard};
    use serde_json::json;

    fn config() -> Config {
        Config::new("key", "token", "board-1", CardAction::Attachment).with_lists(ListNames::new(
            Some("Doing".to_string()),
            Some("In Review".to_string()),
            Some("Done".to_string()),
        ))
    }

    fn payload(value: serde_json::Value) -> EventPayload {
        EventPayload::from_json(&value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_routes_to_commit_handler() {
        let board = RecordingBoard::new();
        let report = route_payload(
            &config(),
            &board,
            payload(json!({
                "head_commit": {
                    "url": "https://github.com/o/r/commit/abc",
                    "message": "Fix #4",
                    "author": { "name": "Ada" }
                }
            })),
        )
        .await;

        assert_eq!(report.moved(), 1);
        assert!(board.calls().contains(&Call::Attach {
            card: "card-4".to_string(),
            link: "https://github.com/o/r/commit/abc".to_string()
        }));
    }

    #[tokio::test]
    async fn test_pull_request_routes_to_pr_handler() {
        let board = RecordingBoard::new();
        route_payload(
            &config(),
            &board,
            payload(json!({
                "pull_request": {
                    "html_url": "https://github.com/o/r/pull/3",
                    "title": "Parser #8",
                    "state": "open",
                    "user": { "login": "octocat" }
                }
            })),
        )
        .await;

        assert!(board.calls().contains(&Call::Move {
            board: "board-1".to_string(),
            card: "card-8".to_string(),
            list: "In Review".to_string()
        }));
    }

    #[tokio::test]
    async fn test_unrelated_payload_is_noop() {
        let board = RecordingBoard::new();
        let report = route_payload(
            &config(),
            &board,
            payload(json!({ "action": "created", "issue": { "number": 1 } })),
        )
        .await;

        assert_eq!(report, EventReport::default());
        assert!(board.calls().is_empty());
    }
}
