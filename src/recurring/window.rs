use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{FinanceError, Result};

/// Inclusive date range used to bound occurrence generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(FinanceError::InvalidInput(format!(
                "window end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// The whole calendar month `month` of `year`.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            FinanceError::InvalidInput(format!("{}-{:02} is not a calendar month", year, month))
        })?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| {
                FinanceError::InvalidInput(format!("{}-{:02} is out of range", year, month))
            })?;
        Self::new(start, end)
    }

    /// From `start` through the date `days` days later, so the window spans `days + 1` days.
    pub fn following(start: NaiveDate, days: u32) -> Result<Self> {
        let end = start
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or_else(|| FinanceError::InvalidInput("window end is out of range".into()))?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn same_month(&self) -> bool {
        self.start.year() == self.end.year() && self.start.month() == self.end.month()
    }
}
