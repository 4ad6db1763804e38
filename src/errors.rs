use poise::{serenity_prelude as serenity, BoxFuture, FrameworkError};
use thiserror::Error as ThisError;
use thisslime::TracingError;
use tracing::{error, error_span, Instrument};

use crate::{
    commands::hangman::core::AcceptError,
    framework::{data::PoiseData, DataError},
    utils::poise::{Context, ContextExt},
};

pub fn handle_framework_error(err: FrameworkError<'_, PoiseData, CommandError>) -> BoxFuture<()> {
    Box::pin(async {
        match err {
            FrameworkError::Command { error, ctx, .. } => {
                let command = ctx.invoked_command_name();
                let span = error_span!("", command);

                handle_error(error, ctx).instrument(span).await;
            }
            FrameworkError::MissingBotPermissions {
                missing_permissions,
                ctx,
                ..
            } => {
                let command = ctx.invoked_command_name();
                let _enter = error_span!("", command).entered();

                error!(%missing_permissions, "bot is missing permissions");
            }
            FrameworkError::Setup { error, .. } => {
                error.trace();
                error!("bot setup failed");
            }
            FrameworkError::EventHandler { error, .. } => {
                error.trace();
            }
            _ => {
                if let Err(err) = poise::builtins::on_error(err).await {
                    error!(%err, "failed to handle framework error");
                }
            }
        };
    })
}

async fn handle_error(err: CommandError, ctx: Context<'_>) {
    err.trace();

    if let Err(err) = ctx.reply_ephemeral(err.to_string()).await {
        error!(%err, "failed to send error message");
    }
}

#[derive(Debug, ThisError, TracingError)]
#[span(level = WARN)]
pub enum CommandError {
    #[error(transparent)]
    Accept(#[from] AcceptError),

    #[error("discord error: {0}")]
    #[event(level = ERROR)]
    Serenity(#[from] serenity::Error),

    #[error(transparent)]
    Data(#[from] DataError),
}
