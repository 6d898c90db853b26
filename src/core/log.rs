use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

fn crate_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    }
}

/// Installs the global subscriber. `RUST_LOG`, when set, replaces the default
/// directive. Events go to stderr; stdout carries converter output only.
pub fn init_logging(verbose: bool) {
    let level = crate_level(verbose);
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let crate_filter = Targets::new().with_target(env!("CARGO_CRATE_NAME"), level);

    let stderr_layer = fmt::layer()
        .pretty()
        .without_time()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(crate_filter)
        .with(env_filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_unless_verbose() {
        assert_eq!(crate_level(false), LevelFilter::OFF);
        assert_eq!(crate_level(true), LevelFilter::DEBUG);
    }
}
