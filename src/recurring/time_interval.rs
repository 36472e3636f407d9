use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Enumerates time units used by `TimeInterval` and custom frequencies.
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "day" => Some(TimeUnit::Day),
            "week" => Some(TimeUnit::Week),
            "month" => Some(TimeUnit::Month),
            "year" => Some(TimeUnit::Year),
            _ => None,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeUnit::Day => "Day",
            TimeUnit::Week => "Week",
            TimeUnit::Month => "Month",
            TimeUnit::Year => "Year",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Represents a time unit and multiplier for recurrence calculations.
///
/// An `every` of zero steps as one so a schedule always advances.
pub struct TimeInterval {
    pub every: u32,
    pub unit: TimeUnit,
}

impl TimeInterval {
    pub const fn new(every: u32, unit: TimeUnit) -> Self {
        Self { every, unit }
    }

    /// Calculates the next date after `from` according to the interval.
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        self.nth_after(from, 1)
    }

    /// Returns the date `steps` intervals after `anchor`.
    ///
    /// Calendar units are counted from the anchor rather than chained, so a
    /// schedule anchored on the 31st lands on the last day of short months and
    /// returns to the 31st afterwards. Returns `None` past chrono's date range.
    pub fn nth_after(&self, anchor: NaiveDate, steps: u32) -> Option<NaiveDate> {
        let count = u64::from(self.stride()) * u64::from(steps);
        match self.unit {
            TimeUnit::Day => anchor.checked_add_days(Days::new(count)),
            TimeUnit::Week => anchor.checked_add_days(Days::new(count.checked_mul(7)?)),
            TimeUnit::Month => shift_months(anchor, count),
            TimeUnit::Year => shift_months(anchor, count.checked_mul(12)?),
        }
    }

    /// Largest step count whose date is still strictly before `target` (zero
    /// when `target` is not after `anchor`). Every earlier step is before
    /// `target` too, so callers can jump straight to it.
    pub fn steps_before(&self, anchor: NaiveDate, target: NaiveDate) -> u32 {
        let (distance, span) = match self.unit {
            TimeUnit::Day => (
                (target - anchor).num_days(),
                i64::from(self.stride()),
            ),
            TimeUnit::Week => (
                (target - anchor).num_days(),
                i64::from(self.stride()) * 7,
            ),
            TimeUnit::Month => (month_distance(anchor, target), i64::from(self.stride())),
            TimeUnit::Year => (
                month_distance(anchor, target),
                i64::from(self.stride()) * 12,
            ),
        };
        if distance <= 0 {
            return 0;
        }
        u32::try_from((distance - 1) / span).unwrap_or(u32::MAX)
    }

    pub fn label(&self) -> String {
        match (self.stride(), &self.unit) {
            (1, TimeUnit::Day) => "Daily".into(),
            (1, TimeUnit::Week) => "Weekly".into(),
            (1, TimeUnit::Month) => "Monthly".into(),
            (1, TimeUnit::Year) => "Yearly".into(),
            (n, unit) => format!("Every {} {}s", n, unit),
        }
    }

    fn stride(&self) -> u32 {
        self.every.max(1)
    }
}

fn shift_months(date: NaiveDate, months: u64) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(u32::try_from(months).ok()?))
}

fn month_distance(from: NaiveDate, to: NaiveDate) -> i64 {
    let from_idx = i64::from(from.year()) * 12 + i64::from(from.month0());
    let to_idx = i64::from(to.year()) * 12 + i64::from(to.month0());
    to_idx - from_idx
}
