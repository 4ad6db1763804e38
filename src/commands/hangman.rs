use poise::serenity_prelude::{self as serenity, ComponentInteraction, Mentionable};
use thisslime::TracingError;
use tracing::{debug, instrument};

use crate::{
    framework::data::PoiseData,
    utils::{
        poise::{CommandResult, Context, ContextExt},
        serenity::component_interaction::ComponentInteractionExt,
    },
};

pub mod core;
use self::core::{GameEvent, InvitationId};

mod discord;
pub use discord::DiscordPresenter;

/// challenge yourself to find the hidden word
#[instrument(skip_all)]
#[poise::command(
    slash_command,
    guild_only,
    required_bot_permissions = "SEND_MESSAGES | VIEW_CHANNEL | EMBED_LINKS"
)]
pub async fn hangman(ctx: Context<'_>) -> CommandResult {
    let invitation = InvitationId::new(ctx.id());
    let inviter = ctx.author().id;

    debug!(%invitation, %inviter, "issuing challenge");

    ctx.data()
        .hangman()
        .dispatch(GameEvent::Challenge {
            invitation,
            inviter,
        })
        .await?;

    ctx.send(DiscordPresenter::challenge_offer(invitation, inviter))
        .await?;

    Ok(())
}

/// show the game running in this channel
#[instrument(skip_all)]
#[poise::command(slash_command, guild_only, rename = "hangman-status")]
pub async fn hangman_status(ctx: Context<'_>) -> CommandResult {
    let Some(game) = ctx.data().hangman().game(ctx.channel_id()).await else {
        ctx.reply_ephemeral("there's no game running in this channel!")
            .await?;
        return Ok(());
    };

    let mut text = format!(
        "{player} is playing! {wrong}/{max} wrong guesses, {hidden} characters left to find.\n```\n{mask}\n```",
        player = game.player().mention(),
        wrong = game.wrong_guesses(),
        max = game.max_tries(),
        hidden = game.mask().hidden(),
        mask = game.mask(),
    );

    if let Some(category) = &ctx.data().config().game.category {
        text.push_str(&format!("category: {category}"));
    }

    ctx.reply_ephemeral(text).await?;

    Ok(())
}

/// Handles a click on a challenge's accept button.
#[instrument(skip_all, fields(%invitation, user_id = %interaction.user.id))]
pub async fn accept_button(
    ctx: &serenity::Context,
    data: &PoiseData,
    interaction: &ComponentInteraction,
    invitation: InvitationId,
) -> CommandResult {
    interaction.acknowledge(ctx).await?;

    let event = GameEvent::Accept {
        invitation,
        channel_id: interaction.channel_id,
        accepter: interaction.user.id,
    };

    match data.hangman().dispatch(event).await {
        Ok(_) => {
            interaction
                .replace_message(ctx, "challenge accepted, good luck!")
                .await?;
        }
        Err(err) => {
            err.trace();
            interaction.followup_ephemeral(ctx, err.to_string()).await?;
        }
    }

    Ok(())
}
