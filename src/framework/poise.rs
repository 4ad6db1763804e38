use tracing::{info, trace};

use crate::{
    commands,
    errors::{self, CommandError},
};

use super::{config::Config, data::PoiseData, event_handler, secrets::Secrets};

pub fn build(config: Config, secrets: Secrets) -> poise::Framework<PoiseData, CommandError> {
    poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::list(),
            on_error: errors::handle_framework_error,
            event_handler: event_handler::poise,
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(user = %ready.user.name, "connected to discord");

                let commands = framework.options().commands.as_ref();

                if let Some(guild_id) = config.bot.testing_server() {
                    poise::builtins::register_in_guild(ctx, commands, guild_id).await?;
                } else {
                    poise::builtins::register_globally(ctx, commands).await?;
                }

                ctx.set_activity(config.bot.activity());

                let status_channel = config.bot.status_channel();
                let data = PoiseData::new(config, &secrets, ctx.http.clone())?;

                trace!("finished setup, accepting commands");

                if let Some(status_channel) = status_channel {
                    status_channel.say(ctx, "ready!").await?;
                }

                Ok(data)
            })
        })
        .build()
}
