use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

use super::{
    occurrence::{occurrences_in_window, Occurrence},
    rule::{FlowKind, RecurringRule},
    window::DateWindow,
};

pub const DEFAULT_PENDING_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledStatus {
    Overdue,
    Pending,
    Future,
}

impl ScheduledStatus {
    pub fn classify(scheduled: NaiveDate, reference: NaiveDate, pending_days: u32) -> Self {
        if scheduled < reference {
            return ScheduledStatus::Overdue;
        }
        let pending_cutoff = reference
            .checked_add_days(Days::new(u64::from(pending_days)))
            .unwrap_or(NaiveDate::MAX);
        if scheduled <= pending_cutoff {
            ScheduledStatus::Pending
        } else {
            ScheduledStatus::Future
        }
    }
}

/// Occurrences falling on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub occurrences: Vec<Occurrence>,
    pub income: f64,
    pub expenses: f64,
}

impl CalendarDay {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            occurrences: Vec::new(),
            income: 0.0,
            expenses: 0.0,
        }
    }

    fn push(&mut self, occurrence: Occurrence) {
        match occurrence.kind {
            FlowKind::Income => self.income += occurrence.amount,
            FlowKind::Expense => self.expenses += occurrence.amount,
        }
        self.occurrences.push(occurrence);
    }

    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Days of `year`-`month` with at least one occurrence, in date order.
pub fn month_calendar(rules: &[RecurringRule], year: i32, month: u32) -> Result<Vec<CalendarDay>> {
    let window = DateWindow::month(year, month)?;
    let mut days: BTreeMap<NaiveDate, CalendarDay> = BTreeMap::new();
    for occurrence in occurrences_in_window(rules, window) {
        days.entry(occurrence.date)
            .or_insert_with(|| CalendarDay::empty(occurrence.date))
            .push(occurrence);
    }
    Ok(days.into_values().collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledOccurrence {
    pub occurrence: Occurrence,
    pub status: ScheduledStatus,
}

/// Every occurrence in `window`, classified against `reference`.
pub fn scheduled_in_window(
    rules: &[RecurringRule],
    window: DateWindow,
    reference: NaiveDate,
    pending_days: u32,
) -> Vec<ScheduledOccurrence> {
    occurrences_in_window(rules, window)
        .into_iter()
        .map(|occurrence| ScheduledOccurrence {
            status: ScheduledStatus::classify(occurrence.date, reference, pending_days),
            occurrence,
        })
        .collect()
}
