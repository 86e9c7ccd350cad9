//! Trello card linking for GitHub Actions.
//!
//! This crate provides:
//! - Card number extraction from commit messages and PR titles
//! - REST client for the Trello API behind the [`TaskBoard`] trait
//! - GitHub event payload parsing and classification
//! - Handlers that attach links or comments and move cards between lists

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every board operation can fail

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod router;

pub use client::{TaskBoard, TrelloClient};
pub use config::{CardAction, Config, ListNames};
pub use error::{BoardError, ConfigError};
pub use events::{EventPayload, TriggeringEvent};
pub use handlers::{CardOutcome, EventReport};
pub use models::{CardId, ListId};
pub use router::{dispatch, route_payload};
