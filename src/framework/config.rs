use std::num::NonZeroU32;

use chrono::TimeDelta;
use poise::serenity_prelude::{ActivityData, ChannelId, GuildId};
use rand::seq::IteratorRandom;
use serde::Deserialize;
use thisslime::TracingError;
use tracing::{debug, error, info, warn};

use crate::commands::hangman::core::{GameSettings, GuessAlphabet};

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub game: GameConfig,
    pub words: WordsConfig,
}

impl Config {
    const DEFAULT_PATH: &'static str = "./hangbot.toml";

    pub fn path() -> String {
        if let Ok(path) = std::env::var("HANGBOT_TOML") {
            info!(path, "looking for config file with HANGBOT_TOML...");
            path
        } else {
            warn!(
                path = Self::DEFAULT_PATH,
                "HANGBOT_TOML env unset, using default path"
            );
            Self::DEFAULT_PATH.to_owned()
        }
    }

    pub fn load(path: &str) -> Result<Self, Error> {
        let source = ::config::File::new(path, ::config::FileFormat::Toml);
        let config = Self::from_source(source)?;

        info!("config loaded");
        Ok(config)
    }

    fn from_source(
        source: impl ::config::Source + Send + Sync + 'static,
    ) -> Result<Self, Error> {
        let config: Self = ::config::Config::builder()
            .add_source(source)
            .build()
            .map_err(Error::Read)?
            .try_deserialize()
            .map_err(Error::Parse)?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        self.settings()?;

        if let WordsConfig::Static { words } = &self.words {
            if words.is_empty() {
                return Err(Error::Invalid("words.words must not be empty"));
            }
        }

        Ok(())
    }

    pub fn settings(&self) -> Result<GameSettings, Error> {
        let max_tries = NonZeroU32::new(self.game.max_tries)
            .ok_or(Error::Invalid("game.max_tries must be at least 1"))?;

        let invitation_ttl = i64::try_from(self.game.invitation_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or(Error::Invalid("game.invitation_ttl_secs is too large"))?;

        Ok(GameSettings {
            max_tries,
            alphabet: self.game.alphabet,
            invitation_ttl,
            pool: self.words.pool().to_owned(),
        })
    }
}

#[derive(Debug, thiserror::Error, TracingError)]
pub enum Error {
    #[error("config file could not be read: {0}")]
    #[event(level = ERROR)]
    Read(#[source] ::config::ConfigError),

    #[error("config file could not be parsed: {0}")]
    #[event(level = ERROR)]
    Parse(#[source] ::config::ConfigError),

    #[error("invalid config: {0}")]
    #[event(level = ERROR)]
    Invalid(&'static str),
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BotConfig {
    testing_server: Option<GuildId>,
    activity: Option<String>,
    status_channel: Option<ChannelId>,
}

impl BotConfig {
    pub fn testing_server(&self) -> Option<GuildId> {
        if self.testing_server.is_none() {
            debug!("no testing server set in config, registering commands globally");
        }

        self.testing_server
    }

    pub fn activity(&self) -> Option<ActivityData> {
        let Some(activity) = &self.activity else {
            warn!("no bot.activity provided in config, defaulting to none");
            return None;
        };

        if activity.is_empty() {
            warn!("bot.activity provided in config as empty string, defaulting to none");
            return None;
        }

        let Some(parsed_activity) = parse_activity(activity) else {
            error!("bot.activity in config could not be parsed - must start with `playing`, `listening to`, `watching` or `competing in`");
            warn!("disabling bot activity");
            return None;
        };

        debug!(
            "bot.activity parsed as {:?}: {}",
            parsed_activity.kind, parsed_activity.name
        );
        info!("successfully parsed bot activity from config");

        Some(parsed_activity)
    }

    pub const fn status_channel(&self) -> Option<ChannelId> {
        self.status_channel
    }
}

fn parse_activity(activity: &str) -> Option<ActivityData> {
    if let Some(name) = activity.strip_prefix("playing ") {
        Some(ActivityData::playing(name))
    } else if let Some(name) = activity.strip_prefix("listening to ") {
        Some(ActivityData::listening(name))
    } else if let Some(name) = activity.strip_prefix("watching ") {
        Some(ActivityData::watching(name))
    } else {
        activity
            .strip_prefix("competing in ")
            .map(ActivityData::competing)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LogsConfig {
    #[serde(default)]
    flavor_texts: Vec<String>,
}

impl LogsConfig {
    pub fn flavor_text(&self) -> Option<&str> {
        let flavor_text = self
            .flavor_texts
            .iter()
            .choose(&mut rand::thread_rng())
            .map(String::as_str);

        if flavor_text.is_none() {
            warn!("no flavor texts provided in config :(");
        }

        flavor_text
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub max_tries: u32,
    pub alphabet: GuessAlphabet,
    pub invitation_ttl_secs: u64,
    pub category: Option<String>,
    pub start_images: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_tries: 7,
            alphabet: GuessAlphabet::default(),
            invitation_ttl_secs: 15 * 60,
            category: None,
            start_images: Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum WordsConfig {
    Static {
        words: Vec<String>,
    },
    Spotify {
        playlist: String,
        #[serde(default = "WordsConfig::default_max_pages")]
        max_pages: u32,
    },
}

impl WordsConfig {
    /// Pool name used for the word list written in the config file.
    pub const STATIC_POOL: &'static str = "static";

    const fn default_max_pages() -> u32 {
        5
    }

    pub fn pool(&self) -> &str {
        match self {
            Self::Static { .. } => Self::STATIC_POOL,
            Self::Spotify { playlist, .. } => playlist,
        }
    }
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::ActivityType;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::*;

    fn parse(toml: &str) -> Result<Config, Error> {
        Config::from_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
    }

    #[test]
    #[traced_test]
    fn full_config() {
        let config = parse(
            r#"
            [bot]
            testing_server = "1234"
            activity = "listening to the top 50"

            [logs]
            flavor_texts = ["hello"]

            [game]
            max_tries = 5
            alphabet = "letters"
            invitation_ttl_secs = 60
            category = "top 50 songs in PH"

            [words]
            source = "spotify"
            playlist = "0gAVMCYREjceFfjG5phYxl"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.bot.testing_server(), Some(GuildId::new(1234)));
        assert_eq!(config.logs.flavor_text(), Some("hello"));

        let settings = config.settings().expect("valid settings");
        assert_eq!(settings.max_tries.get(), 5);
        assert_eq!(settings.alphabet, GuessAlphabet::Letters);
        assert_eq!(settings.invitation_ttl, TimeDelta::seconds(60));
        assert_eq!(settings.pool, "0gAVMCYREjceFfjG5phYxl");

        assert!(matches!(
            config.words,
            WordsConfig::Spotify { max_pages: 5, .. }
        ));
    }

    #[test]
    #[traced_test]
    fn game_defaults() {
        let config = parse(
            r#"
            [words]
            source = "static"
            words = ["pork steak"]
            "#,
        )
        .expect("valid config");

        let settings = config.settings().expect("valid settings");
        assert_eq!(settings.max_tries.get(), 7);
        assert_eq!(settings.alphabet, GuessAlphabet::Extended);
        assert_eq!(settings.invitation_ttl, TimeDelta::minutes(15));
        assert_eq!(settings.pool, WordsConfig::STATIC_POOL);
    }

    #[test]
    #[traced_test]
    fn zero_tries_is_invalid() {
        let result = parse(
            r#"
            [game]
            max_tries = 0

            [words]
            source = "static"
            words = ["pork steak"]
            "#,
        );

        assert!(matches!(result, Err(Error::Invalid(_))));
    }

    #[test]
    #[traced_test]
    fn empty_static_list_is_invalid() {
        let result = parse(
            r#"
            [words]
            source = "static"
            words = []
            "#,
        );

        assert!(matches!(result, Err(Error::Invalid(_))));
    }

    #[test]
    #[traced_test]
    fn missing_words_section() {
        assert!(matches!(parse(""), Err(Error::Parse(_))));
    }

    #[test]
    fn activities() {
        let parsed = |text| parse_activity(text).map(|activity| (activity.kind, activity.name));

        assert_eq!(
            parsed("listening to spotify"),
            Some((ActivityType::Listening, "spotify".to_owned()))
        );
        assert_eq!(
            parsed("watching the chat"),
            Some((ActivityType::Watching, "the chat".to_owned()))
        );
        assert_eq!(
            parsed("competing in hangman"),
            Some((ActivityType::Competing, "hangman".to_owned()))
        );
        assert_eq!(
            parsed("playing hangman"),
            Some((ActivityType::Playing, "hangman".to_owned()))
        );
        assert_eq!(parsed("singing karaoke"), None);
    }
}
