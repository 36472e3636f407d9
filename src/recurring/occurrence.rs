use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    rule::{FlowKind, RecurringRule},
    time_interval::TimeInterval,
    window::DateWindow,
};

/// Upper bound on occurrences emitted for a single rule and window.
pub const MAX_OCCURRENCES: usize = 100;

/// One concrete calendar-date firing of a recurring rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub rule_id: Uuid,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: FlowKind,
}

/// Lazy sequence of the dates a rule fires on within `[window_start, window_end]`.
///
/// Candidates are counted from the rule's start date; those before the window
/// are skipped, those after the end date or the window end stop the sequence.
/// At most [`MAX_OCCURRENCES`] items are produced. Cloning the iterator before
/// use restarts it.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a RecurringRule,
    interval: TimeInterval,
    window_start: NaiveDate,
    window_end: NaiveDate,
    step: u32,
    emitted: usize,
    finished: bool,
}

impl<'a> Occurrences<'a> {
    pub fn new(rule: &'a RecurringRule, window_start: NaiveDate, window_end: NaiveDate) -> Self {
        let interval = rule.interval();
        Self {
            rule,
            interval,
            window_start,
            window_end,
            step: interval.steps_before(rule.start_date, window_start),
            emitted: 0,
            finished: window_start > window_end,
        }
    }

    pub fn in_window(rule: &'a RecurringRule, window: DateWindow) -> Self {
        Self::new(rule, window.start, window.end)
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        while !self.finished && self.emitted < MAX_OCCURRENCES {
            let Some(date) = self.interval.nth_after(self.rule.start_date, self.step) else {
                self.finished = true;
                break;
            };
            if date > self.window_end || self.rule.ended_before(date) {
                self.finished = true;
                break;
            }
            self.step = self.step.saturating_add(1);
            if date < self.window_start {
                continue;
            }
            self.emitted += 1;
            return Some(Occurrence {
                rule_id: self.rule.id,
                date,
                amount: self.rule.amount,
                kind: self.rule.kind,
            });
        }
        None
    }
}

/// Collects the occurrences of `rule` between `window_start` and `window_end`, inclusive.
pub fn generate_occurrences(
    rule: &RecurringRule,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<Occurrence> {
    Occurrences::new(rule, window_start, window_end).collect()
}

/// Occurrences of every rule active in `window`, ordered by date.
///
/// Rules that ended before the window opens are skipped up front. Each rule is
/// capped independently.
pub fn occurrences_in_window(rules: &[RecurringRule], window: DateWindow) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = rules
        .iter()
        .filter(|rule| !rule.ended_before(window.start))
        .flat_map(|rule| Occurrences::in_window(rule, window))
        .collect();
    occurrences.sort_by_key(|occurrence| occurrence.date);
    occurrences
}
