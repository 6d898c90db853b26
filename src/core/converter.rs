//! Conversion request controller.
//!
//! [`Converter`] holds the form state (amount, source and target currency)
//! and the outcome of the latest conversion. A conversion is split in three
//! steps so the caller stays in control of scheduling:
//!
//! 1. [`Converter::start`] checks the preconditions and moves to `Loading`,
//!    handing back a [`ConversionTask`].
//! 2. [`ConversionTask::run`] performs the request, racing it against the
//!    timeout and a cancellation signal.
//! 3. [`Converter::settle`] folds the [`Settlement`] back into the outcome,
//!    ignoring it if a newer request has been started since.
//!
//! [`Converter::convert`] chains the three for callers that just await.

use super::amount::{self, AmountError, AmountField, Key};
use super::currency::CurrencyCode;
use super::rate::{ConversionRequest, Quote, RateProvider};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// User-facing text for every transport, server or timeout failure.
pub const CONVERSION_FAILED: &str = "Could not convert currency. Please try again.";
pub const CONVERT_LABEL: &str = "Convert";
pub const LOADING_LABEL: &str = "Converting...";

/// Decimal places shown for a converted amount.
pub const RESULT_PRECISION: u32 = 2;

/// Precondition failure raised when the user asks to convert.
///
/// These stop the conversion before any network activity and are meant to be
/// shown as an interrupting alert, unlike the inline [`AmountError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    InvalidAmount,
    SameCurrency,
}

impl Blocked {
    pub fn message(&self) -> &'static str {
        match self {
            Blocked::InvalidAmount => "Enter a valid amount.",
            Blocked::SameCurrency => "Select different currencies for conversion.",
        }
    }
}

impl fmt::Display for Blocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for Blocked {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The rate service failed, answered with a non-success status, or sent
    /// a body without a usable rate.
    Provider,
    TimedOut,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Converted amount, always at [`RESULT_PRECISION`] decimal places.
    pub result: Decimal,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConversionOutcome {
    #[default]
    Idle,
    Loading,
    Success(Conversion),
    Failure(FailureKind),
}

impl ConversionOutcome {
    pub fn is_loading(&self) -> bool {
        matches!(self, ConversionOutcome::Loading)
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            ConversionOutcome::Success(_) | ConversionOutcome::Failure(_)
        )
    }
}

#[derive(Debug)]
enum Resolution {
    Completed(Result<Quote>),
    TimedOut,
    Cancelled,
}

/// Result of running a [`ConversionTask`], to be passed to [`Converter::settle`].
#[derive(Debug)]
pub struct Settlement {
    generation: u64,
    resolution: Resolution,
}

impl Settlement {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.resolution, Resolution::Cancelled)
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self.resolution, Resolution::TimedOut)
    }
}

/// One in-flight conversion request.
///
/// Dropping the task, or letting it finish on timeout or cancellation, drops
/// the provider future and with it the underlying HTTP request.
pub struct ConversionTask {
    generation: u64,
    request: ConversionRequest,
    provider: Arc<dyn RateProvider>,
    timeout: Duration,
    cancelled: watch::Receiver<bool>,
}

impl ConversionTask {
    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    pub async fn run(self) -> Settlement {
        let ConversionTask {
            generation,
            request,
            provider,
            timeout,
            mut cancelled,
        } = self;

        let resolution = tokio::select! {
            biased;
            // Err means the controller dropped the sender, which also cancels.
            _ = cancelled.changed() => Resolution::Cancelled,
            () = tokio::time::sleep(timeout) => Resolution::TimedOut,
            result = provider.convert(&request) => Resolution::Completed(result),
        };

        Settlement {
            generation,
            resolution,
        }
    }
}

/// What a front end should display for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub amount: String,
    /// Inline amount error. `None` for an empty field, although converting
    /// stays disabled then.
    pub validation_message: Option<&'static str>,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub convert_enabled: bool,
    pub button_label: &'static str,
    pub loading: bool,
    pub error: Option<&'static str>,
    pub result: Option<String>,
    pub rate_date: Option<NaiveDate>,
}

pub struct Converter {
    provider: Arc<dyn RateProvider>,
    timeout: Duration,
    amount: AmountField,
    validation: Option<AmountError>,
    from: CurrencyCode,
    to: CurrencyCode,
    outcome: ConversionOutcome,
    generation: u64,
    cancel: Option<watch::Sender<bool>>,
}

impl Converter {
    pub fn new(provider: Arc<dyn RateProvider>, timeout: Duration) -> Self {
        Converter {
            provider,
            timeout,
            amount: AmountField::new(),
            validation: None,
            from: CurrencyCode::BRL,
            to: CurrencyCode::USD,
            outcome: ConversionOutcome::Idle,
            generation: 0,
            cancel: None,
        }
    }

    pub fn with_currencies(mut self, from: CurrencyCode, to: CurrencyCode) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn amount(&self) -> &str {
        self.amount.value()
    }

    pub fn validation(&self) -> Option<AmountError> {
        self.validation
    }

    pub fn from_currency(&self) -> CurrencyCode {
        self.from
    }

    pub fn to_currency(&self) -> CurrencyCode {
        self.to
    }

    pub fn outcome(&self) -> &ConversionOutcome {
        &self.outcome
    }

    pub fn press(&mut self, key: Key) -> bool {
        let changed = self.amount.press(key);
        self.after_amount_edit(changed)
    }

    pub fn type_amount(&mut self, text: &str) -> bool {
        let changed = self.amount.type_text(text);
        self.after_amount_edit(changed)
    }

    pub fn paste_amount(&mut self, text: &str) -> bool {
        let changed = self.amount.paste(text);
        self.after_amount_edit(changed)
    }

    pub fn set_amount(&mut self, text: &str) -> bool {
        let changed = self.amount.replace(text);
        self.after_amount_edit(changed)
    }

    pub fn clear_amount(&mut self) -> bool {
        let changed = self.amount.clear();
        self.after_amount_edit(changed)
    }

    pub fn set_from(&mut self, code: CurrencyCode) -> bool {
        if self.from == code {
            return false;
        }
        self.from = code;
        self.clear_settled();
        true
    }

    pub fn set_to(&mut self, code: CurrencyCode) -> bool {
        if self.to == code {
            return false;
        }
        self.to = code;
        self.clear_settled();
        true
    }

    fn after_amount_edit(&mut self, changed: bool) -> bool {
        if changed {
            self.validation = amount::validate(self.amount.value());
            self.clear_settled();
        }
        changed
    }

    // A request still in flight is left alone.
    fn clear_settled(&mut self) {
        if self.outcome.is_settled() {
            self.outcome = ConversionOutcome::Idle;
        }
    }

    pub fn can_convert(&self) -> bool {
        !self.outcome.is_loading() && self.validation.is_none() && !self.amount.is_empty()
    }

    /// Validates the form and moves to `Loading`.
    ///
    /// An amount that is positive but cannot be sent as a `Decimal` is
    /// blocked as [`Blocked::InvalidAmount`]. Any request still in flight is cancelled; its settlement will be
    /// ignored.
    pub fn start(&mut self) -> Result<ConversionTask, Blocked> {
        let amount = amount::parse_amount(self.amount.value())
            .filter(|a| *a > Decimal::ZERO)
            .ok_or(Blocked::InvalidAmount)?;
        if self.from == self.to {
            return Err(Blocked::SameCurrency);
        }

        if let Some(previous) = self.cancel.take() {
            debug!(generation = self.generation, "Superseding in-flight conversion");
            // No receiver left means the previous task already finished.
            let _ = previous.send(true);
        }

        self.generation += 1;
        let (cancel, cancelled) = watch::channel(false);
        self.cancel = Some(cancel);
        self.outcome = ConversionOutcome::Loading;

        let request = ConversionRequest {
            amount,
            from: self.from,
            to: self.to,
        };
        info!(
            generation = self.generation,
            amount = %request.amount,
            from = %request.from,
            to = %request.to,
            "Starting conversion"
        );

        Ok(ConversionTask {
            generation: self.generation,
            request,
            provider: Arc::clone(&self.provider),
            timeout: self.timeout,
            cancelled,
        })
    }

    /// Applies a settlement. Returns `false` when it was stale and ignored.
    pub fn settle(&mut self, settlement: Settlement) -> bool {
        if settlement.generation != self.generation || !self.outcome.is_loading() {
            debug!(
                generation = settlement.generation,
                current = self.generation,
                "Ignoring stale settlement"
            );
            return false;
        }
        self.cancel = None;

        self.outcome = match settlement.resolution {
            Resolution::Completed(Ok(quote)) => match round_result(quote.amount) {
                Some(result) => {
                    info!(%result, "Conversion succeeded");
                    ConversionOutcome::Success(Conversion {
                        result,
                        date: quote.date,
                    })
                }
                None => {
                    error!(amount = quote.amount, "Rate service returned an unusable amount");
                    ConversionOutcome::Failure(FailureKind::Provider)
                }
            },
            Resolution::Completed(Err(e)) => {
                error!(error = %e, "Conversion failed");
                ConversionOutcome::Failure(FailureKind::Provider)
            }
            Resolution::TimedOut => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Conversion timed out");
                ConversionOutcome::Failure(FailureKind::TimedOut)
            }
            Resolution::Cancelled => {
                warn!("Conversion aborted");
                ConversionOutcome::Failure(FailureKind::Aborted)
            }
        };
        true
    }

    pub async fn convert(&mut self) -> Result<&ConversionOutcome, Blocked> {
        let task = self.start()?;
        let settlement = task.run().await;
        self.settle(settlement);
        Ok(&self.outcome)
    }

    pub fn snapshot(&self) -> Snapshot {
        let loading = self.outcome.is_loading();
        let (result, rate_date) = match &self.outcome {
            ConversionOutcome::Success(conversion) => (
                Some(format!(
                    "{} {} = {} {}",
                    self.amount.value(),
                    self.from,
                    conversion.result,
                    self.to
                )),
                conversion.date,
            ),
            _ => (None, None),
        };
        let error = match self.outcome {
            ConversionOutcome::Failure(_) => Some(CONVERSION_FAILED),
            _ => None,
        };

        Snapshot {
            amount: self.amount.value().to_string(),
            validation_message: self.validation.map(|e| e.message()),
            from: self.from,
            to: self.to,
            convert_enabled: self.can_convert(),
            button_label: if loading { LOADING_LABEL } else { CONVERT_LABEL },
            loading,
            error,
            result,
            rate_date,
        }
    }
}

fn round_result(amount: f64) -> Option<Decimal> {
    let value = Decimal::try_from(amount).ok()?;
    let mut rounded =
        value.round_dp_with_strategy(RESULT_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(RESULT_PRECISION);
    Some(rounded)
}
