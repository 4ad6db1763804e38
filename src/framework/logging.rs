use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[allow(unused_imports)]
use tracing::{error, instrument, trace};

const DEFAULT_FILTER: &str = "hangbot=info,tracing_unwrap=info";

#[instrument]
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    trace!("finished");
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_new(DEFAULT_FILTER).expect("hard-coded env filter should be valid")
}

