//! REST client for the Trello API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::{Config, DEFAULT_API_URL};
use crate::error::BoardError;
use crate::extract;
use crate::models::{
    comment_text, find_open_list, AttachmentCreateInput, BoardList, Card, CardId, CardMoveInput,
    CommentCreateInput, Credentials, ListId,
};

/// Operations the event handlers need from a task board.
///
/// Every operation settles to a `Result`; none of them panic or let a
/// transport failure escape, so one bad card never aborts its siblings.
#[async_trait]
pub trait TaskBoard: Send + Sync {
    /// Resolve a board-scoped card number to the card id.
    async fn find_card_by_number(&self, board: &str, number: &str) -> Result<CardId, BoardError>;

    /// Resolve an open list by exact, case-sensitive name.
    async fn find_list_by_name(&self, board: &str, name: &str) -> Result<ListId, BoardError>;

    /// Attach a link to a card.
    async fn attach_link(&self, card: &CardId, link: &str) -> Result<(), BoardError>;

    /// Post `"<author>: <text> <link>"` as a comment on a card.
    async fn add_comment(
        &self,
        card: &CardId,
        author: &str,
        text: &str,
        link: &str,
    ) -> Result<(), BoardError>;

    /// Move a card to the named list, resolving the list first.
    ///
    /// Returns the id of the list the card now belongs to.
    async fn move_card(
        &self,
        board: &str,
        card: &CardId,
        list_name: &str,
    ) -> Result<ListId, BoardError>;

    /// Resolve the card for the last number referenced in free text.
    ///
    /// `Ok(None)` when the text references no card at all.
    async fn find_card_in_text(
        &self,
        board: &str,
        text: &str,
    ) -> Result<Option<CardId>, BoardError> {
        match extract::card_number(text) {
            Some(number) => self.find_card_by_number(board, &number).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Trello REST client
#[derive(Clone)]
pub struct TrelloClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    token: String,
}

impl std::fmt::Debug for TrelloClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl TrelloClient {
    /// Create a client against the public Trello API.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(api_key: &str, token: &str) -> Result<Self> {
        Self::with_url(api_key, token, DEFAULT_API_URL)
    }

    /// Create a client against a custom API root (mock servers, proxies).
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn with_url(api_key: &str, token: &str, api_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("trello-link/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            token: token.to_string(),
        })
    }

    /// Create a client from the process configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_url(&config.api_key, &config.auth_token, &config.api_url)
    }

    fn credentials(&self) -> Credentials<'_> {
        Credentials {
            key: &self.api_key,
            token: &self.token,
        }
    }

    /// GET a JSON resource with credentials as query parameters.
    ///
    /// Errors carry `url` without the query; the reqwest error's own URL is dropped.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, BoardError> {
        let response = self
            .client
            .get(url)
            .query(&[("key", &self.api_key), ("token", &self.token)])
            .send()
            .await
            .map_err(|source| BoardError::Transport {
                url: url.to_string(),
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoardError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| BoardError::Decode {
            url: url.to_string(),
            source: source.without_url(),
        })
    }

    /// Send a write request; anything but 200 counts as failure.
    async fn send_expect_ok(&self, request: RequestBuilder, url: &str) -> Result<(), BoardError> {
        let response = request.send().await.map_err(|source| BoardError::Transport {
            url: url.to_string(),
            source: source.without_url(),
        })?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(BoardError::Status {
                url: url.to_string(),
                status,
            })
        }
    }
}

#[async_trait]
impl TaskBoard for TrelloClient {
    #[instrument(skip(self))]
    async fn find_card_by_number(&self, board: &str, number: &str) -> Result<CardId, BoardError> {
        let url = format!("{}/boards/{board}/cards/{number}", self.api_url);

        match self.get_json::<Card>(&url).await {
            Ok(card) => {
                debug!(card_id = %card.id, "Resolved card");
                Ok(card.id)
            }
            Err(e) => {
                warn!(
                    url = %url,
                    status = e.status().map(|s| s.as_u16()),
                    error = %e,
                    "Failed to look up card"
                );
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn find_list_by_name(&self, board: &str, name: &str) -> Result<ListId, BoardError> {
        let url = format!("{}/boards/{board}/lists", self.api_url);

        let lists = match self.get_json::<Vec<BoardList>>(&url).await {
            Ok(lists) => lists,
            Err(e) => {
                warn!(
                    url = %url,
                    status = e.status().map(|s| s.as_u16()),
                    error = %e,
                    "Failed to fetch board lists"
                );
                return Err(e);
            }
        };

        if let Some(list) = find_open_list(&lists, name) {
            debug!(list_id = %list.id, "Resolved list");
            return Ok(list.id.clone());
        }

        warn!(list_count = lists.len(), "No open list with that name");
        Err(BoardError::ListNotFound {
            board: board.to_string(),
            name: name.to_string(),
        })
    }

    #[instrument(skip(self), fields(card_id = %card))]
    async fn attach_link(&self, card: &CardId, link: &str) -> Result<(), BoardError> {
        let url = format!("{}/cards/{card}/attachments", self.api_url);
        let body = AttachmentCreateInput {
            credentials: self.credentials(),
            url: link,
        };

        let result = self
            .send_expect_ok(self.client.post(&url).json(&body), &url)
            .await;
        if let Err(e) = &result {
            warn!(
                url = %url,
                status = e.status().map(|s| s.as_u16()),
                error = %e,
                "Failed to attach link"
            );
        }
        result
    }

    #[instrument(skip(self, text), fields(card_id = %card))]
    async fn add_comment(
        &self,
        card: &CardId,
        author: &str,
        text: &str,
        link: &str,
    ) -> Result<(), BoardError> {
        let url = format!("{}/cards/{card}/actions/comments", self.api_url);
        let body = CommentCreateInput {
            credentials: self.credentials(),
            text: comment_text(author, text, link),
        };

        let result = self
            .send_expect_ok(self.client.post(&url).json(&body), &url)
            .await;
        if let Err(e) = &result {
            warn!(
                url = %url,
                status = e.status().map(|s| s.as_u16()),
                error = %e,
                "Failed to add comment"
            );
        }
        result
    }

    #[instrument(skip(self), fields(card_id = %card))]
    async fn move_card(
        &self,
        board: &str,
        card: &CardId,
        list_name: &str,
    ) -> Result<ListId, BoardError> {
        let list_id = self.find_list_by_name(board, list_name).await?;

        let url = format!("{}/cards/{card}", self.api_url);
        let body = CardMoveInput {
            credentials: self.credentials(),
            id_list: list_id.as_str(),
        };

        match self
            .send_expect_ok(self.client.put(&url).json(&body), &url)
            .await
        {
            Ok(()) => {
                debug!(list_id = %list_id, "Moved card");
                Ok(list_id)
            }
            Err(e) => {
                warn!(
                    url = %url,
                    status = e.status().map(|s| s.as_u16()),
                    error = %e,
                    "Failed to move card"
                );
                Err(e)
            }
        }
    }
}
