//! Push (head commit) handler.

use tracing::{debug, info};

use super::{process_cards, CardPlan, EventReport, PlannedAction};
use crate::client::TaskBoard;
use crate::config::{CardAction, Config};
use crate::events::HeadCommit;
use crate::extract;

/// Decide what every card referenced by `commit` receives.
///
/// A merge commit moves cards to the PR-closed list when one is configured;
/// any other commit (or a merge with no PR-closed list) moves them to the
/// commit list.
#[must_use]
pub fn plan<'a>(config: &'a Config, commit: &'a HeadCommit) -> CardPlan<'a> {
    let action = match config.card_action {
        CardAction::Attachment => PlannedAction::Attach { link: &commit.url },
        CardAction::Comment => PlannedAction::Comment {
            author: &commit.author.name,
            text: commit.message.clone(),
            link: &commit.url,
        },
    };

    let transition = match config.lists.pr_closed() {
        Some(list) if extract::announces_merge(&commit.message) => Some(list),
        _ => config.lists.commit(),
    };

    CardPlan { action, transition }
}

/// Apply the configured action and transition to every card the commit references.
pub async fn handle_head_commit(
    config: &Config,
    board: &dyn TaskBoard,
    commit: &HeadCommit,
) -> EventReport {
    let numbers = extract::card_numbers(&commit.message);
    info!(
        url = %commit.url,
        author = %commit.author.name,
        card_numbers = ?numbers,
        "Handling head commit"
    );

    if numbers.is_empty() {
        debug!("Commit references no cards");
        return EventReport::default();
    }

    let card_plan = plan(config, commit);
    process_cards(config, board, numbers, &card_plan).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListNames;
    use crate::handlers::fake::{Call, RecordingBoard};

    fn commit(message: &str) -> HeadCommit {
        HeadCommit {
            url: "https://github.com/o/r/commit/abc".to_string(),
            message: message.to_string(),
            author: crate::events::CommitAuthor {
                name: "Ada".to_string(),
            },
        }
    }

    fn config(action: CardAction, commit_list: Option<&str>, closed_list: Option<&str>) -> Config {
        Config::new("key", "token", "board-1", action).with_lists(ListNames::new(
            commit_list.map(String::from),
            Some("In Review".to_string()),
            closed_list.map(String::from),
        ))
    }

    fn moves(board: &RecordingBoard) -> Vec<(String, String)> {
        board
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Move { card, list, .. } => Some((card, list)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_plan_attachment_uses_commit_url() {
        let config = config(CardAction::Attachment, Some("Doing"), None);
        let commit = commit("Fix #1");
        let card_plan = plan(&config, &commit);
        assert_eq!(
            card_plan.action,
            PlannedAction::Attach {
                link: "https://github.com/o/r/commit/abc"
            }
        );
        assert_eq!(card_plan.transition, Some("Doing"));
    }

    #[test]
    fn test_plan_comment_carries_author_and_message() {
        let config = config(CardAction::Comment, Some("Doing"), None);
        let commit = commit("Fix #1");
        let card_plan = plan(&config, &commit);
        assert_eq!(
            card_plan.action,
            PlannedAction::Comment {
                author: "Ada",
                text: "Fix #1".to_string(),
                link: "https://github.com/o/r/commit/abc"
            }
        );
    }

    #[test]
    fn test_plan_merge_without_closed_list_uses_commit_list() {
        let config = config(CardAction::Attachment, Some("Doing"), None);
        let commit = commit("Merge pull request #9 from x/y closes #5");
        assert_eq!(plan(&config, &commit).transition, Some("Doing"));
    }

    #[test]
    fn test_plan_without_any_list() {
        let config = config(CardAction::Attachment, None, Some("Done"));
        let commit = commit("Fix #1");
        assert_eq!(plan(&config, &commit).transition, None);
    }

    #[tokio::test]
    async fn test_merge_commit_moves_to_closed_list() {
        let config = config(CardAction::Attachment, Some("Doing"), Some("Done"));
        let board = RecordingBoard::new();

        let report = handle_head_commit(
            &config,
            &board,
            &commit("Merge pull request #9 from x/y closes #5"),
        )
        .await;

        assert_eq!(report.referenced(), 1);
        assert_eq!(
            moves(&board),
            vec![("card-5".to_string(), "Done".to_string())]
        );
        assert!(!board.calls().contains(&Call::FindCard {
            board: "board-1".to_string(),
            number: "9".to_string()
        }));
    }

    #[tokio::test]
    async fn test_plain_commit_moves_to_commit_list() {
        let config = config(CardAction::Comment, Some("Doing"), Some("Done"));
        let board = RecordingBoard::new();

        handle_head_commit(&config, &board, &commit("Fixes #12 and also #7, see #12")).await;

        assert_eq!(
            moves(&board),
            vec![
                ("card-12".to_string(), "Doing".to_string()),
                ("card-7".to_string(), "Doing".to_string()),
            ]
        );
        assert!(board.calls().contains(&Call::Comment {
            card: "card-7".to_string(),
            text: "Ada: Fixes #12 and also #7, see #12 https://github.com/o/r/commit/abc"
                .to_string()
        }));
    }

    #[tokio::test]
    async fn test_commit_without_references_makes_no_calls() {
        let config = config(CardAction::Attachment, Some("Doing"), None);
        let board = RecordingBoard::new();

        let report = handle_head_commit(&config, &board, &commit("Tidy up")).await;

        assert_eq!(report.referenced(), 0);
        assert!(board.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_does_not_stop_siblings() {
        let config = config(CardAction::Attachment, Some("Doing"), None);
        let board = RecordingBoard::new().without_card("1");

        let report = handle_head_commit(&config, &board, &commit("#1 #2")).await;

        assert_eq!(report.resolved(), 1);
        assert_eq!(
            moves(&board),
            vec![("card-2".to_string(), "Doing".to_string())]
        );
    }
}
