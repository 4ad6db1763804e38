use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use poise::serenity_prelude::ChannelId;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::trace;

use super::session::GameSession;

type Slot = Arc<Mutex<GameSession>>;

/// Active games, at most one per channel.
///
/// The outer map is only ever locked briefly to find or swap a channel's
/// slot. All reads and writes of a session go through that session's own
/// mutex, so guesses in one channel never wait on another channel.
#[derive(Clone, Debug, Default)]
pub struct SessionStore(Arc<RwLock<HashMap<ChannelId, Slot>>>);

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `session` for its channel, superseding whatever was there.
    /// Returns whether an older game was superseded.
    pub async fn create(&self, session: GameSession) -> bool {
        let channel_id = session.channel_id();
        let slot = Arc::new(Mutex::new(session));

        let previous = self.0.write().await.insert(channel_id, slot);
        previous.is_some()
    }

    /// A copy of the channel's running game, if there is one.
    pub async fn get(&self, channel_id: ChannelId) -> Option<GameSession> {
        self.lock(channel_id)
            .await
            .map(|guard| guard.session().clone())
    }

    #[allow(dead_code)]
    pub async fn remove(&self, channel_id: ChannelId) {
        if self.0.write().await.remove(&channel_id).is_some() {
            trace!(%channel_id, "removed game");
        }
    }

    /// Enters the channel's critical section.
    ///
    /// Returns `None` if there is no running game, including when the game
    /// this call waited on finished or was superseded in the meantime.
    pub async fn lock(&self, channel_id: ChannelId) -> Option<SessionGuard> {
        let slot = self.slot(channel_id).await?;
        let guard = slot.clone().lock_owned().await;

        if !guard.status().is_in_progress() || !self.is_current(channel_id, &slot).await {
            return None;
        }

        Some(SessionGuard {
            store: self.clone(),
            slot,
            guard,
        })
    }

    async fn slot(&self, channel_id: ChannelId) -> Option<Slot> {
        self.0.read().await.get(&channel_id).cloned()
    }

    async fn is_current(&self, channel_id: ChannelId, slot: &Slot) -> bool {
        self.0
            .read()
            .await
            .get(&channel_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    /// Evicts `slot` only if it is still the one stored for the channel.
    async fn evict(&self, channel_id: ChannelId, slot: &Slot) {
        let mut map = self.0.write().await;

        if map
            .get(&channel_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            map.remove(&channel_id);
            trace!(%channel_id, "evicted finished game");
        }
    }
}

/// Exclusive access to one channel's game.
pub struct SessionGuard {
    store: SessionStore,
    slot: Slot,
    guard: OwnedMutexGuard<GameSession>,
}

impl SessionGuard {
    pub fn session(&self) -> &GameSession {
        &self.guard
    }

    /// Leaves the critical section, evicting the game first if it is over.
    pub async fn release(self) {
        if !self.guard.status().is_in_progress() {
            let channel_id = self.guard.channel_id();
            self.store.evict(channel_id, &self.slot).await;
        }
    }
}

impl Deref for SessionGuard {
    type Target = GameSession;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use poise::serenity_prelude::UserId;

    use super::*;
    use crate::commands::hangman::core::{
        guess::{GuessAlphabet, Letter},
        session::SecretWord,
    };

    fn session(channel: u64, word: &str) -> GameSession {
        GameSession::new(
            ChannelId::new(channel),
            UserId::new(7),
            SecretWord::normalize(word, GuessAlphabet::Letters).expect("hard-coded"),
            NonZeroU32::new(3).expect("hard-coded"),
        )
    }

    fn letter(ch: char) -> Letter {
        Letter::parse(&ch.to_string(), GuessAlphabet::Letters).expect("hard-coded")
    }

    #[tokio::test]
    async fn create_replaces_existing_game() {
        let store = SessionStore::new();

        assert!(!store.create(session(1, "old")).await);
        assert!(store.create(session(1, "new")).await);

        let mut guard = store.lock(ChannelId::new(1)).await.expect("game was created");
        guard.apply_guess(letter('n'));
        assert_eq!(guard.mask().to_string(), "N _ _");
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = SessionStore::new();
        store.create(session(1, "go")).await;

        store.remove(ChannelId::new(1)).await;
        store.remove(ChannelId::new(1)).await;
        store.remove(ChannelId::new(2)).await;

        assert!(store.get(ChannelId::new(1)).await.is_none());
    }

    #[tokio::test]
    async fn finished_game_is_evicted_on_release() {
        let store = SessionStore::new();
        store.create(session(1, "go")).await;

        let mut guard = store.lock(ChannelId::new(1)).await.expect("game was created");
        guard.apply_guess(letter('g'));
        guard.apply_guess(letter('o'));
        guard.release().await;

        assert!(store.get(ChannelId::new(1)).await.is_none());
    }

    #[tokio::test]
    async fn finishing_a_superseded_game_keeps_its_replacement() {
        let store = SessionStore::new();
        store.create(session(1, "go")).await;

        let mut stale = store.lock(ChannelId::new(1)).await.expect("game was created");
        store.create(session(1, "pizza")).await;

        stale.apply_guess(letter('g'));
        stale.apply_guess(letter('o'));
        stale.release().await;

        let current = store.get(ChannelId::new(1)).await.expect("replacement is kept");
        assert_eq!(current.mask().to_string(), "_ _ _ _ _");
    }

    #[tokio::test]
    async fn channels_are_isolated() {
        let store = SessionStore::new();
        store.create(session(1, "go")).await;
        store.create(session(2, "go")).await;

        let mut first = store.lock(ChannelId::new(1)).await.expect("game was created");
        // the second channel is not blocked by the first one's guard
        let second = store.lock(ChannelId::new(2)).await.expect("game was created");
        first.apply_guess(letter('x'));
        drop(second);
        first.release().await;

        let untouched = store.get(ChannelId::new(2)).await.expect("game was created");
        assert_eq!(untouched.wrong_guesses(), 0);
        assert!(untouched.guessed().is_empty());
    }
}
