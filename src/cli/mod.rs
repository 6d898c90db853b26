pub mod convert;
pub mod currencies;
pub mod session;
pub mod setup;
pub mod ui;
