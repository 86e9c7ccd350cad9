//! Trello entity and request type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque Trello card id, only meaningful on the board that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

/// Opaque Trello list id, only meaningful for the board/name pair that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(pub String);

impl CardId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ListId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trello card (subset of fields we care about)
#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    /// Card id
    pub id: CardId,
}

/// Trello list (subset of fields we care about)
#[derive(Debug, Clone, Deserialize)]
pub struct BoardList {
    /// List id
    pub id: ListId,
    /// Display name
    pub name: String,
    /// Whether the list is archived
    #[serde(default)]
    pub closed: bool,
}

/// Credentials sent in every write request body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Credentials<'a> {
    pub key: &'a str,
    pub token: &'a str,
}

/// Body of `POST /cards/{card}/attachments`
#[derive(Debug, Serialize)]
pub struct AttachmentCreateInput<'a> {
    #[serde(flatten)]
    pub credentials: Credentials<'a>,
    pub url: &'a str,
}

/// Body of `POST /cards/{card}/actions/comments`
#[derive(Debug, Serialize)]
pub struct CommentCreateInput<'a> {
    #[serde(flatten)]
    pub credentials: Credentials<'a>,
    pub text: String,
}

/// Body of `PUT /cards/{card}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMoveInput<'a> {
    #[serde(flatten)]
    pub credentials: Credentials<'a>,
    pub id_list: &'a str,
}

/// Comment text in the `"<author>: <text> <link>"` shape.
#[must_use]
pub fn comment_text(author: &str, text: &str, link: &str) -> String {
    format!("{author}: {text} {link}")
}

/// First open list whose name matches exactly (case-sensitive).
#[must_use]
pub fn find_open_list<'a>(lists: &'a [BoardList], name: &str) -> Option<&'a BoardList> {
    lists.iter().find(|list| !list.closed && list.name == name)
}
