#![doc(test(attr(deny(warnings))))]

//! Fintrack Core is the recurring-transaction engine behind the finance
//! tracker: occurrence generation, monthly normalization and cash-flow
//! projection, plus the rule book, storage and configuration around them.

pub mod config;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod recurring;
pub mod storage;
pub mod time;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Fintrack Core tracing initialized.");
    });
}
