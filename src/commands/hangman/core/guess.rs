use std::fmt;

use serde::Deserialize;

use super::session::{GameSession, RevealMask, Status};

/// Which characters a chat message may consist of to count as a guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessAlphabet {
    /// ASCII letters only.
    Letters,

    /// ASCII letters and digits, plus `'`, `(`, `)` and `-`.
    #[default]
    Extended,
}

impl GuessAlphabet {
    const PUNCTUATION: [char; 4] = ['\'', '(', ')', '-'];

    pub fn accepts(self, ch: char) -> bool {
        match self {
            Self::Letters => ch.is_ascii_alphabetic(),
            Self::Extended => ch.is_ascii_alphanumeric() || Self::PUNCTUATION.contains(&ch),
        }
    }
}

/// A single normalized (upper-case) guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Letter(char);

impl Letter {
    /// Parses a raw chat message. Anything other than exactly one accepted
    /// character is not a guess.
    pub fn parse(text: &str, alphabet: GuessAlphabet) -> Option<Self> {
        let mut chars = text.chars();

        match (chars.next(), chars.next()) {
            (Some(ch), None) if alphabet.accepts(ch) => Some(Self(ch.to_ascii_uppercase())),
            _ => None,
        }
    }

    pub const fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    AlreadyGuessed(Letter),
    Hit { letter: Letter, won: bool },
    Miss { letter: Letter, lost: bool },
}

impl Outcome {
    pub const fn letter(&self) -> Letter {
        match *self {
            Self::AlreadyGuessed(letter)
            | Self::Hit { letter, .. }
            | Self::Miss { letter, .. } => letter,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Hit { won: true, .. } | Self::Miss { lost: true, .. })
    }
}

impl GameSession {
    /// Evaluates one guess against the session.
    ///
    /// Callers must only pass guesses for an in-progress session from its
    /// authorized player. The whole transition is computed before anything is
    /// written back, so no partial update is ever visible.
    pub fn apply_guess(&mut self, letter: Letter) -> Outcome {
        debug_assert!(self.status().is_in_progress());

        if self.guessed.contains(&letter) {
            return Outcome::AlreadyGuessed(letter);
        }

        let mut guessed = self.guessed.clone();
        guessed.push(letter);
        let mask = RevealMask::compute(&self.secret, &guessed);

        let (outcome, wrong_guesses, status) = if self.secret.contains(letter) {
            let won = mask.is_complete();
            let status = if won { Status::Won } else { Status::InProgress };
            (Outcome::Hit { letter, won }, self.wrong_guesses, status)
        } else {
            let wrong_guesses = self.wrong_guesses + 1;
            let lost = wrong_guesses >= self.max_tries.get();
            let status = if lost { Status::Lost } else { Status::InProgress };
            (Outcome::Miss { letter, lost }, wrong_guesses, status)
        };

        self.guessed = guessed;
        self.mask = mask;
        self.wrong_guesses = wrong_guesses;
        self.status = status;

        outcome
    }
}
