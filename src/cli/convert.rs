use super::ui;
use crate::core::config::AppConfig;
use crate::core::converter::{Blocked, Converter, LOADING_LABEL, Snapshot};
use crate::core::{CurrencyCode, RateProvider};
use crate::providers::FrankfurterProvider;
use std::sync::Arc;
use tracing::debug;

pub fn new_converter(config: &AppConfig) -> Converter {
    let provider: Arc<dyn RateProvider> = Arc::new(FrankfurterProvider::new(&config.api.base_url));
    Converter::new(provider, config.api.timeout())
        .with_currencies(config.defaults.from, config.defaults.to)
}

/// Handles the convert action: alert on a blocked precondition, otherwise
/// show a spinner until the request settles.
pub async fn submit(converter: &mut Converter) {
    let task = match converter.start() {
        Ok(task) => task,
        Err(blocked) => {
            debug!(?blocked, "Conversion blocked");
            ui::alert(blocked.message());
            return;
        }
    };

    let spinner = ui::new_spinner(LOADING_LABEL);
    let settlement = task.run().await;
    spinner.finish_and_clear();
    converter.settle(settlement);
}

/// One-shot conversion of `amount` from `from` to `to`.
pub async fn run(
    converter: &mut Converter,
    amount: &str,
    from: CurrencyCode,
    to: CurrencyCode,
) -> Snapshot {
    converter.set_from(from);
    converter.set_to(to);
    converter.set_amount(amount);

    // Same gate as a disabled convert button.
    if converter.can_convert() {
        submit(converter).await;
    }

    let snapshot = converter.snapshot();
    println!("{}", ui::render_snapshot(&snapshot));
    snapshot
}

/// Why a conversion left no result on screen, or `None` when it produced one.
pub fn failure_reason(snapshot: &Snapshot) -> Option<&'static str> {
    if snapshot.result.is_some() {
        return None;
    }
    let reason = snapshot.error.or(snapshot.validation_message);
    Some(reason.unwrap_or(if snapshot.from == snapshot.to {
        Blocked::SameCurrency.message()
    } else {
        Blocked::InvalidAmount.message()
    }))
}
