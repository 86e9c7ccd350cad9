//! Pull request handler.

use tracing::{debug, info};

use super::{process_cards, CardPlan, EventReport, PlannedAction};
use crate::client::TaskBoard;
use crate::config::{CardAction, Config};
use crate::events::{PullRequest, PullRequestState};
use crate::extract;

/// Comment prefix for a pull request in `state`.
///
/// The prefix carries its own trailing space, so `"Opened PR: <title>"` has
/// exactly one space before the title.
fn comment_prefix(state: PullRequestState) -> &'static str {
    match state {
        PullRequestState::Open => "Opened PR: ",
        PullRequestState::Closed => "Closed PR: ",
        PullRequestState::Other => "",
    }
}

/// Decide what every card referenced by `pr` receives.
///
/// Open PRs move cards to the PR-open list, closed PRs to the PR-closed list.
/// Any other state leaves cards where they are.
#[must_use]
pub fn plan<'a>(config: &'a Config, pr: &'a PullRequest) -> CardPlan<'a> {
    let action = match config.card_action {
        CardAction::Attachment => PlannedAction::Attach { link: pr.link() },
        CardAction::Comment => PlannedAction::Comment {
            author: pr.author(),
            text: format!("{}{}", comment_prefix(pr.state), pr.title),
            link: pr.link(),
        },
    };

    let transition = match pr.state {
        PullRequestState::Open => config.lists.pr_open(),
        PullRequestState::Closed => config.lists.pr_closed(),
        PullRequestState::Other => None,
    };

    CardPlan { action, transition }
}

/// Apply the configured action and transition to every card the PR title references.
pub async fn handle_pull_request(
    config: &Config,
    board: &dyn TaskBoard,
    pr: &PullRequest,
) -> EventReport {
    let numbers = extract::card_numbers(&pr.title);
    info!(
        url = %pr.link(),
        author = %pr.author(),
        state = ?pr.state,
        card_numbers = ?numbers,
        "Handling pull request"
    );

    if numbers.is_empty() {
        debug!("Pull request title references no cards");
        return EventReport::default();
    }

    let card_plan = plan(config, pr);
    process_cards(config, board, numbers, &card_plan).await
}
