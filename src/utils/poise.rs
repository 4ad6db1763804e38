use poise::{serenity_prelude as serenity, CreateReply};

use crate::{errors::CommandError, framework::data::PoiseData};

pub type Context<'a> = poise::Context<'a, PoiseData, CommandError>;

pub type Command = poise::Command<PoiseData, CommandError>;
pub type CommandResult = Result<(), CommandError>;

pub trait ContextExt {
    async fn reply_ephemeral(
        &self,
        text: impl Into<String>,
    ) -> Result<poise::ReplyHandle<'_>, serenity::Error>;
}

impl ContextExt for Context<'_> {
    async fn reply_ephemeral(
        &self,
        text: impl Into<String>,
    ) -> Result<poise::ReplyHandle<'_>, serenity::Error> {
        let builder = CreateReply::default()
            .reply(true)
            .ephemeral(true)
            .content(text);
        self.send(builder).await
    }
}
