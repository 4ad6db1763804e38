use std::{fmt, num::NonZeroU32};

use poise::serenity_prelude::{ChannelId, UserId};

use super::{
    guess::{GuessAlphabet, Letter},
    presenter::RenderToken,
};

/// The hidden word of a game, upper-cased with single spaces between words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretWord(String);

impl SecretWord {
    /// Normalizes a candidate from a word source.
    ///
    /// Returns `None` for candidates that could never be won with the given
    /// alphabet, or that have nothing to guess at all.
    pub fn normalize(raw: &str, alphabet: GuessAlphabet) -> Option<Self> {
        let word = raw
            .split_whitespace()
            .map(str::to_uppercase)
            .collect::<Vec<_>>()
            .join(" ");

        if word.is_empty() {
            return None;
        }

        word.chars()
            .all(|ch| ch == ' ' || alphabet.accepts(ch))
            .then_some(Self(word))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }

    pub fn contains(&self, letter: Letter) -> bool {
        self.0.contains(letter.as_char())
    }
}

impl fmt::Display for SecretWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The partially hidden rendering of a [`SecretWord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealMask(Vec<Option<char>>);

impl RevealMask {
    pub const PLACEHOLDER: char = '_';

    /// Depends only on the word and the guesses so far.
    pub fn compute(secret: &SecretWord, guessed: &[Letter]) -> Self {
        let cells = secret
            .chars()
            .map(|ch| {
                let shown = ch == ' ' || guessed.iter().any(|letter| letter.as_char() == ch);
                shown.then_some(ch)
            })
            .collect();

        Self(cells)
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    pub fn hidden(&self) -> usize {
        self.0.iter().filter(|cell| cell.is_none()).count()
    }
}

impl fmt::Display for RevealMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, cell) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }

            write!(f, "{}", cell.unwrap_or(Self::PLACEHOLDER))?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Won,
    Lost,
}

impl Status {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// One game bound to a channel.
#[derive(Debug, Clone)]
pub struct GameSession {
    channel_id: ChannelId,
    player: UserId,
    pub(super) secret: SecretWord,
    pub(super) mask: RevealMask,
    pub(super) guessed: Vec<Letter>,
    pub(super) wrong_guesses: u32,
    pub(super) max_tries: NonZeroU32,
    pub(super) status: Status,
    render_token: Option<RenderToken>,
}

impl GameSession {
    pub fn new(
        channel_id: ChannelId,
        player: UserId,
        secret: SecretWord,
        max_tries: NonZeroU32,
    ) -> Self {
        let mask = RevealMask::compute(&secret, &[]);

        Self {
            channel_id,
            player,
            secret,
            mask,
            guessed: Vec::new(),
            wrong_guesses: 0,
            max_tries,
            status: Status::InProgress,
            render_token: None,
        }
    }

    pub const fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    pub const fn player(&self) -> UserId {
        self.player
    }

    /// The secret word, but only once the game is over.
    pub fn revealed_word(&self) -> Option<&SecretWord> {
        (!self.status.is_in_progress()).then_some(&self.secret)
    }

    pub const fn mask(&self) -> &RevealMask {
        &self.mask
    }

    pub fn guessed(&self) -> &[Letter] {
        &self.guessed
    }

    pub const fn wrong_guesses(&self) -> u32 {
        self.wrong_guesses
    }

    pub const fn max_tries(&self) -> NonZeroU32 {
        self.max_tries
    }

    pub fn tries_left(&self) -> u32 {
        self.max_tries.get().saturating_sub(self.wrong_guesses)
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub const fn render_token(&self) -> Option<RenderToken> {
        self.render_token
    }

    pub fn set_render_token(&mut self, token: RenderToken) {
        self.render_token = Some(token);
    }
}
