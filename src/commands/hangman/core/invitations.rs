use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use chrono::{TimeDelta, Utc};
use poise::serenity_prelude::UserId;
use thisslime::TracingError;
use tokio::sync::Mutex;
use tracing::trace;

use crate::framework::data::UtcDateTime;

/// Identifies a challenge offer. For slash commands this is the id of the
/// invoking interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvitationId(u64);

impl InvitationId {
    const BUTTON_PREFIX: &'static str = "accept_button_";

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Custom id of the button that accepts this invitation.
    pub fn button_id(self) -> String {
        format!("{}{}", Self::BUTTON_PREFIX, self.0)
    }

    pub fn from_button_id(custom_id: &str) -> Option<Self> {
        custom_id
            .strip_prefix(Self::BUTTON_PREFIX)
            .and_then(|id| id.parse().ok())
    }
}

impl fmt::Display for InvitationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvitationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A pending challenge, not yet a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invitation {
    pub inviter: UserId,
    issued: UtcDateTime,
}

impl Invitation {
    fn is_expired(&self, ttl: TimeDelta) -> bool {
        Utc::now() - self.issued >= ttl
    }
}

#[derive(Clone, Debug, Default)]
pub struct Invitations(Arc<Mutex<HashMap<InvitationId, Invitation>>>);

impl Invitations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new invitation, dropping any that have expired.
    pub async fn issue(&self, id: InvitationId, inviter: UserId, ttl: TimeDelta) {
        let mut map = self.0.lock().await;
        map.retain(|_, invitation| !invitation.is_expired(ttl));

        map.insert(
            id,
            Invitation {
                inviter,
                issued: Utc::now(),
            },
        );

        trace!(%id, %inviter, pending = map.len(), "issued invitation");
    }

    /// Claims an invitation for `accepter`. A claimed invitation cannot be
    /// claimed again unless it is [restored](Self::restore).
    pub async fn take(
        &self,
        id: InvitationId,
        accepter: UserId,
        ttl: TimeDelta,
    ) -> Result<Invitation, InvitationError> {
        let mut map = self.0.lock().await;

        let invitation = map
            .get(&id)
            .copied()
            .ok_or_else(|| InvitationError::duplicate(id))?;

        if invitation.is_expired(ttl) {
            map.remove(&id);
            return Err(InvitationError::duplicate(id));
        }

        if invitation.inviter != accepter {
            return Err(InvitationError::not_invitee(id, accepter));
        }

        map.remove(&id);
        Ok(invitation)
    }

    /// Puts a claimed invitation back, e.g. when the game could not start.
    pub async fn restore(&self, id: InvitationId, invitation: Invitation) {
        self.0.lock().await.insert(id, invitation);
    }
}

#[derive(Debug, thiserror::Error, TracingError)]
pub enum InvitationError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateAcceptanceError),

    #[error(transparent)]
    NotInvitee(#[from] NotInviteeError),
}

impl InvitationError {
    pub fn duplicate(invitation: InvitationId) -> Self {
        Self::Duplicate(DuplicateAcceptanceError { invitation })
    }

    pub fn not_invitee(invitation: InvitationId, user_id: UserId) -> Self {
        Self::NotInvitee(NotInviteeError {
            invitation,
            user_id,
        })
    }
}

#[derive(Clone, Debug, thiserror::Error, TracingError)]
#[error("that challenge was already accepted or has expired")]
#[event(level = INFO)]
pub struct DuplicateAcceptanceError {
    #[field(print = Display)]
    invitation: InvitationId,
}

#[derive(Clone, Debug, thiserror::Error, TracingError)]
#[error("that challenge isn't for you!")]
#[event(level = INFO)]
pub struct NotInviteeError {
    #[field(print = Display)]
    invitation: InvitationId,

    #[field(print = Display)]
    user_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ttl() -> TimeDelta {
        TimeDelta::minutes(15)
    }

    #[test]
    fn button_id_round_trip() {
        let id = InvitationId::new(1234);
        assert_eq!(id.button_id(), "accept_button_1234");
        assert_eq!(InvitationId::from_button_id(&id.button_id()), Some(id));
        assert_eq!(InvitationId::from_button_id("accept_button_"), None);
        assert_eq!(InvitationId::from_button_id("unused"), None);
    }

    #[tokio::test]
    async fn second_acceptance_is_rejected() {
        let invitations = Invitations::new();
        let id = InvitationId::new(1);
        invitations.issue(id, UserId::new(5), ttl()).await;

        assert!(invitations.take(id, UserId::new(5), ttl()).await.is_ok());
        assert!(matches!(
            invitations.take(id, UserId::new(5), ttl()).await,
            Err(InvitationError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn only_the_inviter_may_accept() {
        let invitations = Invitations::new();
        let id = InvitationId::new(1);
        invitations.issue(id, UserId::new(5), ttl()).await;

        assert!(matches!(
            invitations.take(id, UserId::new(6), ttl()).await,
            Err(InvitationError::NotInvitee(_))
        ));
        // still open for the right user
        assert!(invitations.take(id, UserId::new(5), ttl()).await.is_ok());
    }

    #[tokio::test]
    async fn expired_invitation_is_rejected() {
        let invitations = Invitations::new();
        let id = InvitationId::new(1);
        invitations.issue(id, UserId::new(5), ttl()).await;

        assert!(matches!(
            invitations.take(id, UserId::new(5), TimeDelta::zero()).await,
            Err(InvitationError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn restored_invitation_can_be_accepted() {
        let invitations = Invitations::new();
        let id = InvitationId::new(1);
        invitations.issue(id, UserId::new(5), ttl()).await;

        let invitation = invitations
            .take(id, UserId::new(5), ttl())
            .await
            .expect("just issued");
        invitations.restore(id, invitation).await;

        assert!(invitations.take(id, UserId::new(5), ttl()).await.is_ok());
    }
}
