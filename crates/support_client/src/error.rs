use thiserror::Error;

use crate::dialog::ChatAction;

#[derive(Debug, Error)]
pub enum SupportClientError {
    #[error("invalid support server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("support request failed before a response arrived: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("support reply declared JSON but could not be parsed: {0}")]
    MalformedReply(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("support chat is closed")]
    Closed,
    #[error("a support request is already in flight")]
    Busy,
    #[error("no support request is in flight")]
    Idle,
    #[error("action {0:?} is not offered on the current screen")]
    UnavailableAction(ChatAction),
}
