use std::fmt::Display;

use thisslime::TracingError;
use tracing::trace;

use super::config::{Config, WordsConfig};
use crate::commands::hangman::core::SpotifyCredentials;

/// Credentials read from the environment. None of these belong in the
/// config file.
#[derive(Clone)]
pub struct Secrets {
    bot_token: String,
    spotify: Option<SpotifyCredentials>,
}

impl Secrets {
    pub fn from_env(config: &Config) -> Result<Self, MissingSecretError> {
        Self::from_store(&EnvVars, config)
    }

    fn from_store(store: &impl SecretStore, config: &Config) -> Result<Self, MissingSecretError> {
        let bot_token = store.require(SecretKey::BotToken)?;

        let spotify = match config.words {
            WordsConfig::Spotify { .. } => Some(SpotifyCredentials {
                client_id: store.require(SecretKey::SpotifyClientId)?,
                client_secret: store.require(SecretKey::SpotifyClientSecret)?,
            }),
            WordsConfig::Static { .. } => None,
        };

        Ok(Self { bot_token, spotify })
    }

    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    pub fn spotify(&self) -> Result<&SpotifyCredentials, MissingSecretError> {
        self.spotify.as_ref().ok_or(MissingSecretError {
            secret: SecretKey::SpotifyClientId,
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("spotify", &self.spotify)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecretKey {
    BotToken,
    SpotifyClientId,
    SpotifyClientSecret,
}

impl Display for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::BotToken => "DISCORD_TOKEN",
            Self::SpotifyClientId => "SPOTIFY_CLIENT_ID",
            Self::SpotifyClientSecret => "SPOTIFY_CLIENT_SECRET",
        })
    }
}

#[derive(Debug, thiserror::Error, TracingError)]
#[error("missing secret `{secret}`")]
#[event(level = ERROR)]
pub struct MissingSecretError {
    #[field(print = Display)]
    secret: SecretKey,
}

trait SecretStore {
    fn get(&self, secret: SecretKey) -> Option<String>;

    fn require(&self, secret: SecretKey) -> Result<String, MissingSecretError> {
        self.get(secret)
            .filter(|value| !value.is_empty())
            .ok_or(MissingSecretError { secret })
    }
}

struct EnvVars;

impl SecretStore for EnvVars {
    fn get(&self, secret: SecretKey) -> Option<String> {
        trace!(%secret, "reading secret from environment");
        std::env::var(secret.to_string()).ok()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixed(HashMap<SecretKey, &'static str>);

    impl SecretStore for Fixed {
        fn get(&self, secret: SecretKey) -> Option<String> {
            self.0.get(&secret).map(|&value| value.to_owned())
        }
    }

    fn config(words: WordsConfig) -> Config {
        Config {
            bot: Default::default(),
            logs: Default::default(),
            game: Default::default(),
            words,
        }
    }

    fn spotify() -> Config {
        config(WordsConfig::Spotify {
            playlist: "playlist".to_owned(),
            max_pages: 1,
        })
    }

    #[test]
    fn static_words_only_need_the_token() {
        let store = Fixed(HashMap::from([(SecretKey::BotToken, "token")]));
        let secrets = Secrets::from_store(
            &store,
            &config(WordsConfig::Static {
                words: vec!["word".to_owned()],
            }),
        )
        .expect("token is set");

        assert_eq!(secrets.bot_token(), "token");
        assert!(secrets.spotify().is_err());
    }

    #[test]
    fn spotify_needs_credentials() {
        let store = Fixed(HashMap::from([
            (SecretKey::BotToken, "token"),
            (SecretKey::SpotifyClientId, "id"),
        ]));

        let err = Secrets::from_store(&store, &spotify()).expect_err("secret is missing");
        assert_eq!(err.secret, SecretKey::SpotifyClientSecret);
        assert_eq!(err.to_string(), "missing secret `SPOTIFY_CLIENT_SECRET`");
    }

    #[test]
    fn empty_values_are_missing() {
        let store = Fixed(HashMap::from([(SecretKey::BotToken, "")]));

        let err = Secrets::from_store(&store, &spotify()).expect_err("token is empty");
        assert_eq!(err.secret, SecretKey::BotToken);
    }

    #[test]
    fn debug_hides_token() {
        let store = Fixed(HashMap::from([
            (SecretKey::BotToken, "hunter2"),
            (SecretKey::SpotifyClientId, "id"),
            (SecretKey::SpotifyClientSecret, "shh"),
        ]));

        let secrets = Secrets::from_store(&store, &spotify()).expect("all set");
        let debug = format!("{secrets:?}");

        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("shh"));
    }
}
