use crate::framework::{config, secrets};

#[derive(Debug, thiserror::Error, thisslime::TracingError)]
pub enum Error {
    #[error("error loading secrets: {0}")]
    #[event(level = ERROR)]
    Secrets(#[from] secrets::MissingSecretError),

    #[error("error reading game settings: {0}")]
    #[event(level = ERROR)]
    Config(#[from] config::Error),
}
