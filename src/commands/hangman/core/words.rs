use std::{collections::HashMap, future::Future};

use rand::{seq::SliceRandom, Rng};
use thisslime::TracingError;

use super::{guess::GuessAlphabet, session::SecretWord, spotify::SpotifyWords};

/// Supplies candidate words for new games.
pub trait WordSource: Send + Sync {
    fn fetch_candidates(
        &self,
        pool: &str,
    ) -> impl Future<Output = Result<Vec<String>, WordSourceError>> + Send;
}

#[derive(Debug, thiserror::Error, TracingError)]
pub enum WordSourceError {
    #[error("couldn't reach the word list: {0}")]
    #[event(level = WARN)]
    UpstreamUnavailable(String),

    #[error("the word list `{0}` has no usable words")]
    #[event(level = WARN)]
    EmptyCatalog(String),
}

impl From<reqwest::Error> for WordSourceError {
    fn from(value: reqwest::Error) -> Self {
        Self::UpstreamUnavailable(value.to_string())
    }
}

/// Normalizes raw candidates, dropping any that can't be played.
pub fn playable(
    pool: &str,
    candidates: Vec<String>,
    alphabet: GuessAlphabet,
) -> Result<Vec<SecretWord>, WordSourceError> {
    let words: Vec<SecretWord> = candidates
        .iter()
        .filter_map(|candidate| SecretWord::normalize(candidate, alphabet))
        .collect();

    if words.is_empty() {
        Err(WordSourceError::EmptyCatalog(pool.to_owned()))
    } else {
        Ok(words)
    }
}

/// Picks one word uniformly at random.
pub fn choose(words: &[SecretWord], rng: &mut impl Rng) -> Option<SecretWord> {
    words.choose(rng).cloned()
}

/// Word lists written straight into the config file, keyed by pool name.
#[derive(Debug, Clone, Default)]
pub struct StaticWords {
    lists: HashMap<String, Vec<String>>,
}

impl StaticWords {
    pub fn new(lists: HashMap<String, Vec<String>>) -> Self {
        Self { lists }
    }
}

impl WordSource for StaticWords {
    async fn fetch_candidates(&self, pool: &str) -> Result<Vec<String>, WordSourceError> {
        self.lists
            .get(pool)
            .filter(|list| !list.is_empty())
            .cloned()
            .ok_or_else(|| WordSourceError::EmptyCatalog(pool.to_owned()))
    }
}

/// The word source picked in the config file.
#[derive(Debug, Clone)]
pub enum Words {
    Static(StaticWords),
    Spotify(SpotifyWords),
}

impl WordSource for Words {
    async fn fetch_candidates(&self, pool: &str) -> Result<Vec<String>, WordSourceError> {
        match self {
            Self::Static(words) => words.fetch_candidates(pool).await,
            Self::Spotify(words) => words.fetch_candidates(pool).await,
        }
    }
}
