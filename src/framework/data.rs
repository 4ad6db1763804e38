use std::sync::Arc;

use chrono::Utc;
use poise::serenity_prelude::Http;
use tracing::info;

use super::{
    config::{Config, WordsConfig},
    secrets::Secrets,
};
use crate::commands::hangman::{
    core::{Hangman, SpotifyWords, StaticWords, Words},
    DiscordPresenter,
};

pub mod error;
pub use error::Error as DataError;

pub type Result<T, E = DataError> = std::result::Result<T, E>;

pub(crate) type UtcDateTime = chrono::DateTime<Utc>;

#[derive(Debug)]
pub struct PoiseData {
    pub(crate) config: Config,
    hangman: Hangman<Words, DiscordPresenter>,
}

impl PoiseData {
    pub(crate) fn new(config: Config, secrets: &Secrets, http: Arc<Http>) -> Result<Self> {
        let words = match &config.words {
            WordsConfig::Static { words } => Words::Static(StaticWords::new(
                [(WordsConfig::STATIC_POOL.to_owned(), words.clone())].into(),
            )),
            WordsConfig::Spotify { max_pages, .. } => Words::Spotify(SpotifyWords::new(
                secrets.spotify()?.clone(),
                *max_pages,
            )),
        };

        let presenter = DiscordPresenter::new(http, &config.game);
        let hangman = Hangman::new(words, presenter, config.settings()?);

        info!(pool = config.words.pool(), "game data ready");

        Ok(Self { config, hangman })
    }

    pub(crate) const fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) const fn hangman(&self) -> &Hangman<Words, DiscordPresenter> {
        &self.hangman
    }
}
