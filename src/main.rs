#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

/// Slash commands, and the hangman game behind them.
mod commands;

mod errors;

mod framework;
use framework::{config::Config, secrets::Secrets};

mod utils;

use poise::serenity_prelude::{self as serenity, GatewayIntents};

#[allow(unused_imports)]
use tracing::{debug, info, trace};
use tracing_unwrap::ResultExt;

mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

fn build_description() -> String {
    if built_info::DEBUG {
        let branch = built_info::GIT_HEAD_REF
            .map(|s| s.trim_start_matches("refs/heads/"))
            .unwrap_or("DETACHED");

        format!(
            "development branch {} (`{}`)",
            branch,
            built_info::GIT_COMMIT_HASH_SHORT.unwrap_or("unknown commit")
        )
    } else {
        format!("release {}", built_info::PKG_VERSION)
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    framework::logging::init_tracing();

    info!("{}", build_description());

    let config = Config::load(&Config::path()).expect_or_log("config could not be loaded");
    let secrets = Secrets::from_env(&config).expect_or_log("secrets could not be loaded");

    if let Some(flavor_text) = config.logs.flavor_text() {
        info!("{flavor_text}")
    }

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let token = secrets.bot_token().to_owned();
    let framework = framework::poise::build(config, secrets);

    let mut client = serenity::Client::builder(token, intents)
        .framework(framework)
        .await
        .expect_or_log("client should be valid");

    client
        .start()
        .await
        .expect_or_log("client should not return error");
}
