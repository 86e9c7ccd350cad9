//! Event handlers.
//!
//! Each handler turns its event into a [`CardPlan`] (the action and list
//! transition every referenced card receives), then runs the same per-card
//! pipeline: resolve the card, apply the action, apply the transition.

pub mod commit;
pub mod pull_request;

pub use commit::handle_head_commit;
pub use pull_request::handle_pull_request;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::client::TaskBoard;
use crate::config::Config;
use crate::models::{CardId, ListId};

/// Action applied to each resolved card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction<'a> {
    /// Attach `link` to the card
    Attach { link: &'a str },
    /// Post `"<author>: <text> <link>"` on the card
    Comment {
        author: &'a str,
        text: String,
        link: &'a str,
    },
}

/// What every card referenced by one event receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPlan<'a> {
    pub action: PlannedAction<'a>,
    /// Target list name, `None` when no transition applies
    pub transition: Option<&'a str>,
}

/// What happened to one referenced card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardOutcome {
    /// Card number as written in the message
    pub number: String,
    /// Resolved card, `None` when the lookup failed
    pub card: Option<CardId>,
    /// Whether the attachment or comment succeeded
    pub action_applied: bool,
    /// List the card was moved to
    pub moved_to: Option<ListId>,
}

impl CardOutcome {
    fn unresolved(number: String) -> Self {
        Self {
            number,
            card: None,
            action_applied: false,
            moved_to: None,
        }
    }
}

/// Per-event summary, used for logging only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventReport {
    pub outcomes: Vec<CardOutcome>,
}

impl EventReport {
    /// Number of distinct card references in the event.
    #[must_use]
    pub fn referenced(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of references that resolved to a card.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.card.is_some()).count()
    }

    /// Number of cards moved to a new list.
    #[must_use]
    pub fn moved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.moved_to.is_some()).count()
    }
}

/// Run the plan against every referenced card.
///
/// At most `config.max_concurrency` card pipelines are in flight; outcomes
/// keep the order of `numbers`.
pub(crate) async fn process_cards(
    config: &Config,
    board: &dyn TaskBoard,
    numbers: Vec<String>,
    plan: &CardPlan<'_>,
) -> EventReport {
    let outcomes: Vec<CardOutcome> = stream::iter(numbers)
        .map(|number| process_card(config, board, number, plan))
        .buffered(config.max_concurrency.max(1))
        .collect()
        .await;

    let report = EventReport { outcomes };
    info!(
        referenced = report.referenced(),
        resolved = report.resolved(),
        moved = report.moved(),
        "Finished processing card references"
    );
    report
}

async fn process_card(
    config: &Config,
    board: &dyn TaskBoard,
    number: String,
    plan: &CardPlan<'_>,
) -> CardOutcome {
    let card = match board.find_card_by_number(&config.board_id, &number).await {
        Ok(card) => card,
        Err(e) => {
            warn!(
                card_number = %number,
                error = %e,
                "Skipping unresolved card reference"
            );
            return CardOutcome::unresolved(number);
        }
    };

    let action_result = match &plan.action {
        PlannedAction::Attach { link } => board.attach_link(&card, link).await,
        PlannedAction::Comment { author, text, link } => {
            board.add_comment(&card, author, text, link).await
        }
    };
    let action_applied = match action_result {
        Ok(()) => {
            info!(
                card_number = %number,
                card_id = %card,
                action = config.card_action.as_str(),
                "Updated card"
            );
            true
        }
        Err(e) => {
            warn!(
                card_number = %number,
                card_id = %card,
                error = %e,
                "Card action failed"
            );
            false
        }
    };

    let moved_to = match plan.transition {
        Some(list_name) => match board.move_card(&config.board_id, &card, list_name).await {
            Ok(list_id) => {
                info!(
                    card_number = %number,
                    card_id = %card,
                    list = %list_name,
                    "Moved card"
                );
                Some(list_id)
            }
            Err(e) => {
                warn!(
                    card_number = %number,
                    card_id = %card,
                    list = %list_name,
                    error = %e,
                    "Card move failed"
                );
                None
            }
        },
        None => {
            debug!(card_number = %number, "No list transition configured");
            None
        }
    };

    CardOutcome {
        number,
        card: Some(card),
        action_applied,
        moved_to,
    }
}
