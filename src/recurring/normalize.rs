//! Conversion of recurring amounts into per-month figures.
//!
//! The multipliers are fixed approximations; no rounding happens here.

use super::{frequency::Frequency, time_interval::TimeUnit};

pub const DAYS_PER_MONTH: f64 = 30.0;
pub const WEEKS_PER_MONTH: f64 = 4.33;
pub const BI_WEEKS_PER_MONTH: f64 = 2.17;
pub const MONTHS_PER_QUARTER: f64 = 3.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Converts `amount`, charged at `frequency`, into its monthly equivalent.
///
/// Custom frequencies missing an interval (or with an interval of zero) or a
/// unit, and unrecognized frequencies, are treated as monthly.
pub fn to_monthly_equivalent(
    amount: f64,
    frequency: &Frequency,
    custom_interval: Option<u32>,
    custom_unit: Option<TimeUnit>,
) -> f64 {
    match frequency {
        Frequency::Daily => amount * DAYS_PER_MONTH,
        Frequency::Weekly => amount * WEEKS_PER_MONTH,
        Frequency::BiWeekly => amount * BI_WEEKS_PER_MONTH,
        Frequency::Monthly => amount,
        Frequency::Quarterly => amount / MONTHS_PER_QUARTER,
        Frequency::Annually => amount / MONTHS_PER_YEAR,
        Frequency::Custom => match (custom_interval.filter(|every| *every > 0), custom_unit) {
            (Some(every), Some(unit)) => custom_monthly(amount, f64::from(every), unit),
            _ => amount,
        },
        Frequency::Unrecognized(_) => amount,
    }
}

fn custom_monthly(amount: f64, interval: f64, unit: TimeUnit) -> f64 {
    match unit {
        TimeUnit::Day => (amount / interval) * DAYS_PER_MONTH,
        TimeUnit::Week => (amount / interval) * WEEKS_PER_MONTH,
        TimeUnit::Month => amount / interval,
        TimeUnit::Year => amount / (interval * MONTHS_PER_YEAR),
    }
}
