//! Error taxonomy shared across the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No API token stored; raised before any network call is attempted.
    #[error("no Todoist API token is configured")]
    MissingToken,

    /// Non-200/204 response. The message is the HTTP status text.
    #[error("{0}")]
    Api(String),

    /// A 200 body that does not decode into the expected type.
    #[error("unexpected response shape: {0}")]
    ResponseShape(#[source] serde_json::Error),

    #[error("failed to reach Todoist API: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not determine the user config directory")]
    NoConfigDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode settings")]
    SettingsEncode(#[from] toml::ser::Error),
}
