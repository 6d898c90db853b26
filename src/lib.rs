pub mod cli;
pub mod core;
pub mod providers;

use crate::core::CurrencyCode;
use crate::core::config::AppConfig;
use anyhow::{Context, Result, bail};
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Currencies,
    Interactive,
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    let config = config.with_env_overrides()?;
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

fn parse_code(code: Option<&str>, fallback: CurrencyCode) -> Result<CurrencyCode> {
    code.map_or(Ok(fallback), |c| {
        c.parse()
            .with_context(|| format!("Invalid currency argument: {c}"))
    })
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    match command {
        AppCommand::Convert { amount, from, to } => {
            let config = load_config(config_path)?;
            let from = parse_code(from.as_deref(), config.defaults.from)?;
            let to = parse_code(to.as_deref(), config.defaults.to)?;
            let mut converter = cli::convert::new_converter(&config);
            let snapshot = cli::convert::run(&mut converter, &amount, from, to).await;
            if let Some(reason) = cli::convert::failure_reason(&snapshot) {
                bail!("Conversion failed: {reason}");
            }
            Ok(())
        }
        AppCommand::Currencies => {
            cli::currencies::run();
            Ok(())
        }
        AppCommand::Interactive => {
            let config = load_config(config_path)?;
            cli::session::run(&config).await
        }
    }
}
