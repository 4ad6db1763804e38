use std::future::Future;

use poise::serenity_prelude as serenity;
use thisslime::TracingError;

use super::{guess::Outcome, session::GameSession};

/// Opaque handle a [`Presenter`] hands back for a game's board, so it can
/// find the board again on later renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderToken(u64);

impl RenderToken {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Outbound rendering of game state. Every method gets a read-only view of
/// the session; the word itself is only available through
/// [`GameSession::revealed_word`] once the game is over.
pub trait Presenter: Send + Sync {
    fn render_game_started(
        &self,
        session: &GameSession,
    ) -> impl Future<Output = Result<RenderToken, PresentError>> + Send;

    fn render_guess_outcome(
        &self,
        session: &GameSession,
        outcome: &Outcome,
    ) -> impl Future<Output = Result<(), PresentError>> + Send;

    fn render_game_won(
        &self,
        session: &GameSession,
    ) -> impl Future<Output = Result<(), PresentError>> + Send;

    fn render_game_lost(
        &self,
        session: &GameSession,
    ) -> impl Future<Output = Result<(), PresentError>> + Send;
}

#[derive(Debug, thiserror::Error, TracingError)]
pub enum PresentError {
    #[error("failed to send game message: {0}")]
    #[event(level = ERROR)]
    Serenity(#[from] serenity::Error),

    #[error("game in channel {0} has no board message")]
    #[event(level = WARN)]
    NoBoard(serenity::ChannelId),
}

pub fn guesses_made(session: &GameSession) -> String {
    if session.guessed().is_empty() {
        "None Yet".to_owned()
    } else {
        session
            .guessed()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The one-line reaction to a guess.
pub fn outcome_line(session: &GameSession, outcome: &Outcome) -> String {
    match outcome {
        Outcome::AlreadyGuessed(letter) => format!("You already guessed **{letter}**!"),
        Outcome::Hit { .. } => format!("✅ Good guess!\n```\n{}\n```", session.mask()),
        Outcome::Miss { .. } => format!(
            "❌ Wrong! You have {tries} tries left.\n```\n{mask}\n```",
            tries = session.tries_left(),
            mask = session.mask()
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use poise::serenity_prelude::{ChannelId, UserId};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::hangman::core::{
        guess::{GuessAlphabet, Letter},
        session::SecretWord,
    };

    fn session() -> GameSession {
        GameSession::new(
            ChannelId::new(1),
            UserId::new(1),
            SecretWord::normalize("go", GuessAlphabet::Letters).expect("hard-coded"),
            NonZeroU32::new(3).expect("hard-coded"),
        )
    }

    #[test]
    fn no_guesses_yet() {
        assert_eq!(guesses_made(&session()), "None Yet");
    }

    #[test]
    fn miss_line_counts_tries() {
        let mut game = session();
        let x = Letter::parse("x", GuessAlphabet::Letters).expect("hard-coded");
        let outcome = game.apply_guess(x);

        assert_eq!(
            outcome_line(&game, &outcome),
            "❌ Wrong! You have 2 tries left.\n```\n_ _\n```"
        );
        assert_eq!(guesses_made(&game), "X");
    }
}
