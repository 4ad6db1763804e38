use std::{future::Future, pin::Pin};

use poise::{
    serenity_prelude::{self as serenity, FullEvent, Interaction},
    FrameworkContext,
};
use tracing::trace;

use crate::{
    commands::hangman::{
        self,
        core::{GameEvent, InvitationId},
    },
    errors::CommandError,
    framework::data::PoiseData,
    utils::serenity::component_interaction::ComponentInteractionExt,
};

async fn event_handler(
    serenity_ctx: &serenity::Context,
    event: &FullEvent,
    framework_ctx: FrameworkContext<'_, PoiseData, CommandError>,
    data: &PoiseData,
) -> Result<(), CommandError> {
    match event {
        FullEvent::Message { new_message: msg }
            if !msg.author.bot && msg.author.id != framework_ctx.bot_id =>
        {
            let event = GameEvent::Message {
                channel_id: msg.channel_id,
                author: msg.author.id,
                content: msg.content.clone(),
            };

            let dispatched = data.hangman().dispatch(event).await?;
            trace!(?dispatched, "handled message");
        }
        FullEvent::InteractionCreate {
            interaction: Interaction::Component(component),
        } => {
            if let Some(invitation) = InvitationId::from_button_id(component.custom_id()) {
                hangman::accept_button(serenity_ctx, data, component, invitation).await?;
            }
        }
        _ => (),
    }

    Ok(())
}

pub fn poise<'a>(
    serenity_ctx: &'a serenity::Context,
    event: &'a FullEvent,
    framework_ctx: FrameworkContext<'a, PoiseData, CommandError>,
    data: &'a PoiseData,
) -> Pin<Box<dyn Future<Output = Result<(), CommandError>> + Send + 'a>> {
    Box::pin(event_handler(serenity_ctx, event, framework_ctx, data))
}
