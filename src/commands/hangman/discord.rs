use std::sync::Arc;

use poise::{
    serenity_prelude::{
        ButtonStyle, CreateButton, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage,
        Http, Mentionable, MessageId, UserId,
    },
    CreateReply,
};
use rand::seq::SliceRandom;

use super::core::{
    presenter::{guesses_made, outcome_line},
    GameSession, InvitationId, Outcome, PresentError, Presenter, RenderToken,
};
use crate::{framework::config::GameConfig, utils::serenity::buttons::AddButton};

/// Renders games as embeds and plain messages in the game's channel.
#[derive(Clone)]
pub struct DiscordPresenter {
    http: Arc<Http>,
    category: Option<String>,
    start_images: Vec<String>,
}

impl std::fmt::Debug for DiscordPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordPresenter")
            .field("category", &self.category)
            .field("start_images", &self.start_images.len())
            .finish_non_exhaustive()
    }
}

impl DiscordPresenter {
    const COLOR: u32 = 0x5865f2;
    const FOOTER: &'static str = "Type a single character in the chat to make a guess.";

    pub fn new(http: Arc<Http>, config: &GameConfig) -> Self {
        Self {
            http,
            category: config.category.clone(),
            start_images: config.start_images.clone(),
        }
    }

    /// The ephemeral reply to `/hangman`, with the button that accepts it.
    pub fn challenge_offer(invitation: InvitationId, inviter: UserId) -> CreateReply {
        let accept = CreateButton::new(invitation.button_id())
            .label("Accept")
            .style(ButtonStyle::Primary);

        CreateReply::default()
            .ephemeral(true)
            .content(format!("Go find the hidden word, {}!", inviter.mention()))
            .add_button(accept)
    }

    fn http(&self) -> &Http {
        &self.http
    }

    fn start_image(&self) -> Option<&str> {
        self.start_images
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }

    fn board(&self, session: &GameSession) -> CreateEmbed {
        let word = format!("```\nWord: {}\n```", session.mask());
        let description = match &self.category {
            Some(category) => format!("Category is {category}!\n\n{word}"),
            None => word,
        };

        CreateEmbed::new()
            .title("Guess the word!")
            .description(description)
            .colour(Self::COLOR)
            .field("Tries Left", session.tries_left().to_string(), true)
            .field("Guesses Made", guesses_made(session), false)
            .footer(CreateEmbedFooter::new(Self::FOOTER))
    }

    async fn update_board(&self, session: &GameSession) -> Result<(), PresentError> {
        let token = session
            .render_token()
            .ok_or(PresentError::NoBoard(session.channel_id()))?;

        session
            .channel_id()
            .edit_message(
                self.http(),
                MessageId::new(token.get()),
                EditMessage::new().embed(self.board(session)),
            )
            .await?;

        Ok(())
    }
}

impl Presenter for DiscordPresenter {
    async fn render_game_started(&self, session: &GameSession) -> Result<RenderToken, PresentError> {
        let mut board = self.board(session);

        if let Some(image) = self.start_image() {
            board = board.image(image);
        }

        let message = session
            .channel_id()
            .send_message(
                self.http(),
                CreateMessage::new()
                    .content("A new game has started!")
                    .embed(board),
            )
            .await?;

        Ok(RenderToken::new(message.id.get()))
    }

    async fn render_guess_outcome(
        &self,
        session: &GameSession,
        outcome: &Outcome,
    ) -> Result<(), PresentError> {
        session
            .channel_id()
            .say(self.http(), outcome_line(session, outcome))
            .await?;

        if !matches!(outcome, Outcome::AlreadyGuessed(_)) {
            self.update_board(session).await?;
        }

        Ok(())
    }

    async fn render_game_won(&self, session: &GameSession) -> Result<(), PresentError> {
        let text = format!(
            "🎉 Congratulations {}, you found the word!",
            session.player().mention()
        );

        session.channel_id().say(self.http(), text).await?;
        Ok(())
    }

    async fn render_game_lost(&self, session: &GameSession) -> Result<(), PresentError> {
        let text = match session.revealed_word() {
            Some(word) => format!("💀 Game over! The word was **{word}**."),
            None => "💀 Game over!".to_owned(),
        };

        session.channel_id().say(self.http(), text).await?;
        Ok(())
    }
}
