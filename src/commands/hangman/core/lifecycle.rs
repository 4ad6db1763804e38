use std::num::NonZeroU32;

use chrono::TimeDelta;
use poise::serenity_prelude::{ChannelId, UserId};
use thisslime::TracingError;
use tracing::{debug, info, instrument, trace};

use super::{
    guess::{GuessAlphabet, Letter, Outcome},
    invitations::{InvitationError, InvitationId, Invitations},
    presenter::{PresentError, Presenter},
    session::{GameSession, SecretWord, Status},
    store::SessionStore,
    words::{self, WordSource, WordSourceError},
};

/// Game rules that stay fixed for the lifetime of the bot.
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub max_tries: NonZeroU32,
    pub alphabet: GuessAlphabet,
    pub invitation_ttl: TimeDelta,
    pub pool: String,
}

/// Everything the gateway can ask of the game.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Challenge {
        invitation: InvitationId,
        inviter: UserId,
    },
    Accept {
        invitation: InvitationId,
        channel_id: ChannelId,
        accepter: UserId,
    },
    Message {
        channel_id: ChannelId,
        author: UserId,
        content: String,
    },
}

#[derive(Debug)]
pub enum Dispatched {
    Offered(InvitationId),
    Started(GameSession),
    Guess(GuessReport),
}

/// What became of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessReport {
    Applied(Outcome),
    Ignored(GuessRejection),
}

/// Reasons a chat message is not treated as a guess. None of these are
/// shown to anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessRejection {
    NoGame,
    UnauthorizedGuess,
    MalformedGuess,
}

#[derive(Debug, thiserror::Error, TracingError)]
pub enum AcceptError {
    #[error(transparent)]
    Invitation(#[from] InvitationError),

    #[error(transparent)]
    WordSource(#[from] WordSourceError),

    #[error(transparent)]
    Present(#[from] PresentError),
}

/// Owns every piece of game state and is the only thing that mutates it.
#[derive(Debug)]
pub struct Hangman<W, P> {
    store: SessionStore,
    invitations: Invitations,
    words: W,
    presenter: P,
    settings: GameSettings,
}

impl<W: WordSource, P: Presenter> Hangman<W, P> {
    pub fn new(words: W, presenter: P, settings: GameSettings) -> Self {
        Self {
            store: SessionStore::new(),
            invitations: Invitations::new(),
            words,
            presenter,
            settings,
        }
    }

    /// The running game in a channel, if any.
    pub async fn game(&self, channel_id: ChannelId) -> Option<GameSession> {
        self.store.get(channel_id).await
    }

    pub async fn dispatch(&self, event: GameEvent) -> Result<Dispatched, AcceptError> {
        match event {
            GameEvent::Challenge {
                invitation,
                inviter,
            } => {
                self.issue_challenge(invitation, inviter).await;
                Ok(Dispatched::Offered(invitation))
            }
            GameEvent::Accept {
                invitation,
                channel_id,
                accepter,
            } => self
                .accept_challenge(invitation, channel_id, accepter)
                .await
                .map(Dispatched::Started),
            GameEvent::Message {
                channel_id,
                author,
                content,
            } => Ok(Dispatched::Guess(
                self.submit_guess(channel_id, author, &content).await,
            )),
        }
    }

    #[instrument(skip(self))]
    pub async fn issue_challenge(&self, invitation: InvitationId, inviter: UserId) {
        self.invitations
            .issue(invitation, inviter, self.settings.invitation_ttl)
            .await;
    }

    #[instrument(skip(self))]
    pub async fn accept_challenge(
        &self,
        invitation_id: InvitationId,
        channel_id: ChannelId,
        accepter: UserId,
    ) -> Result<GameSession, AcceptError> {
        let ttl = self.settings.invitation_ttl;
        let invitation = self.invitations.take(invitation_id, accepter, ttl).await?;

        let session = match self.start(channel_id, accepter).await {
            Ok(session) => session,
            Err(err) => {
                self.invitations.restore(invitation_id, invitation).await;
                return Err(err);
            }
        };

        if self.store.create(session.clone()).await {
            info!("superseded a running game");
        }

        info!("game started");
        Ok(session)
    }

    /// Picks a word and shows the new board. Nothing is stored yet.
    async fn start(
        &self,
        channel_id: ChannelId,
        player: UserId,
    ) -> Result<GameSession, AcceptError> {
        let secret = self.pick_word().await?;
        debug!(%secret, "picked word");

        let mut session = GameSession::new(channel_id, player, secret, self.settings.max_tries);
        let token = self.presenter.render_game_started(&session).await?;
        session.set_render_token(token);

        Ok(session)
    }

    async fn pick_word(&self) -> Result<SecretWord, WordSourceError> {
        let pool = &self.settings.pool;
        let candidates = self.words.fetch_candidates(pool).await?;
        let playable = words::playable(pool, candidates, self.settings.alphabet)?;

        words::choose(&playable, &mut rand::thread_rng())
            .ok_or_else(|| WordSourceError::EmptyCatalog(pool.clone()))
    }

    /// Handles any chat message in a channel. Messages that aren't a valid
    /// guess from the channel's player are ignored.
    #[instrument(skip(self, content))]
    pub async fn submit_guess(
        &self,
        channel_id: ChannelId,
        author: UserId,
        content: &str,
    ) -> GuessReport {
        let Some(mut session) = self.store.lock(channel_id).await else {
            return ignore(GuessRejection::NoGame);
        };

        if session.player() != author {
            return ignore(GuessRejection::UnauthorizedGuess);
        }

        let Some(letter) = Letter::parse(content, self.settings.alphabet) else {
            return ignore(GuessRejection::MalformedGuess);
        };

        let outcome = session.apply_guess(letter);
        debug!(
            letter = %outcome.letter(),
            tries_left = session.tries_left(),
            "applied guess"
        );

        if let Err(err) = self.render(&session, &outcome).await {
            err.trace();
        }

        if outcome.is_terminal() {
            info!(status = ?session.status(), "game over");
        }

        session.release().await;
        GuessReport::Applied(outcome)
    }

    async fn render(&self, session: &GameSession, outcome: &Outcome) -> Result<(), PresentError> {
        self.presenter.render_guess_outcome(session, outcome).await?;

        match session.status() {
            Status::InProgress => Ok(()),
            Status::Won => self.presenter.render_game_won(session).await,
            Status::Lost => self.presenter.render_game_lost(session).await,
        }
    }
}

fn ignore(reason: GuessRejection) -> GuessReport {
    trace!(?reason, "ignoring message");
    GuessReport::Ignored(reason)
}
