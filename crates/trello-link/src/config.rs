//! Configuration for the Trello link service.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default Trello REST API root.
pub const DEFAULT_API_URL: &str = "https://api.trello.com/1";

/// Action applied to every card referenced by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Attach the commit or pull request URL to the card.
    Attachment,
    /// Post a comment carrying the author, message and URL.
    Comment,
}

impl CardAction {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Comment => "comment",
        }
    }
}

impl FromStr for CardAction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attachment" => Ok(Self::Attachment),
            "comment" => Ok(Self::Comment),
            _ => Err(ConfigError::UnknownCardAction(s.to_string())),
        }
    }
}

impl fmt::Display for CardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target list names for each kind of transition.
///
/// Blank names are stored as `None` so "configured" always means non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListNames {
    commit: Option<String>,
    pr_open: Option<String>,
    pr_closed: Option<String>,
}

impl ListNames {
    #[must_use]
    pub fn new(
        commit: Option<String>,
        pr_open: Option<String>,
        pr_closed: Option<String>,
    ) -> Self {
        Self {
            commit: non_blank(commit),
            pr_open: non_blank(pr_open),
            pr_closed: non_blank(pr_closed),
        }
    }

    /// List a card moves to when a commit references it.
    #[must_use]
    pub fn commit(&self) -> Option<&str> {
        self.commit.as_deref()
    }

    /// List a card moves to when a pull request referencing it is opened.
    #[must_use]
    pub fn pr_open(&self) -> Option<&str> {
        self.pr_open.as_deref()
    }

    /// List a card moves to when a pull request referencing it is closed
    /// or a merge commit lands.
    #[must_use]
    pub fn pr_closed(&self) -> Option<&str> {
        self.pr_closed.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Process-wide settings, resolved once at start-up and passed by reference.
#[derive(Clone)]
pub struct Config {
    /// Trello API key.
    pub api_key: String,
    /// Trello auth token.
    pub auth_token: String,
    /// Board whose cards are looked up and moved.
    pub board_id: String,
    /// Action applied to referenced cards.
    pub card_action: CardAction,
    /// Transition targets.
    pub lists: ListNames,
    /// Trello REST API root.
    pub api_url: String,
    /// Number of card pipelines allowed in flight at once.
    pub max_concurrency: usize,
}

impl Config {
    /// Create a configuration with no list transitions and default API URL.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        auth_token: impl Into<String>,
        board_id: impl Into<String>,
        card_action: CardAction,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            auth_token: auth_token.into(),
            board_id: board_id.into(),
            card_action,
            lists: ListNames::default(),
            api_url: DEFAULT_API_URL.to_string(),
            max_concurrency: 1,
        }
    }

    #[must_use]
    pub fn with_lists(mut self, lists: ListNames) -> Self {
        self.lists = lists;
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Check that every required value is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingValue("trello api key"));
        }
        if self.auth_token.trim().is_empty() {
            return Err(ConfigError::MissingValue("trello auth token"));
        }
        if self.board_id.trim().is_empty() {
            return Err(ConfigError::MissingValue("trello board id"));
        }
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("trello api url"));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        Ok(())
    }
}

// Credentials stay out of Debug output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("auth_token", &"<redacted>")
            .field("board_id", &self.board_id)
            .field("card_action", &self.card_action)
            .field("lists", &self.lists)
            .field("api_url", &self.api_url)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_action_is_case_insensitive() {
        assert_eq!("attachment".parse(), Ok(CardAction::Attachment));
        assert_eq!("Attachment".parse(), Ok(CardAction::Attachment));
        assert_eq!("COMMENT".parse(), Ok(CardAction::Comment));
        assert_eq!(" comment ".parse(), Ok(CardAction::Comment));
    }

    #[test]
    fn test_card_action_rejects_unknown() {
        assert_eq!(
            "label".parse::<CardAction>(),
            Err(ConfigError::UnknownCardAction("label".to_string()))
        );
        assert!("".parse::<CardAction>().is_err());
    }

    #[test]
    fn test_blank_list_names_are_unset() {
        let lists = ListNames::new(
            Some("Doing".to_string()),
            Some(String::new()),
            Some("   ".to_string()),
        );
        assert_eq!(lists.commit(), Some("Doing"));
        assert_eq!(lists.pr_open(), None);
        assert_eq!(lists.pr_closed(), None);
    }

    #[test]
    fn test_validate_requires_credentials() {
        let config = Config::new("", "token", "board", CardAction::Comment);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingValue("trello api key"))
        );

        let config = Config::new("key", "token", " ", CardAction::Comment);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingValue("trello board id"))
        );

        let config = Config::new("key", "token", "board", CardAction::Comment);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config =
            Config::new("key", "token", "board", CardAction::Comment).with_max_concurrency(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidConcurrency));
    }

    #[test]
    fn test_api_url_trailing_slash_is_trimmed() {
        let config = Config::new("key", "token", "board", CardAction::Attachment)
            .with_api_url("http://127.0.0.1:9999/1/");
        assert_eq!(config.api_url, "http://127.0.0.1:9999/1");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = Config::new("secret-key", "secret-token", "board", CardAction::Comment);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("board"));
    }
}
