//! Forward-looking cash-flow projection over calendar months.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::Config,
    currency::{format_amount, CurrencyCode, LocaleConfig},
    time::{Clock, SystemClock},
};

use super::rule::{FlowKind, RecurringRule};

pub const DEFAULT_PROJECTION_MONTHS: u32 = 6;

/// Aggregated income and expenses for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBucket {
    pub month: u32,
    pub year: i32,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

impl ProjectionBucket {
    fn starting(first_day: NaiveDate) -> Self {
        Self {
            month: first_day.month(),
            year: first_day.year(),
            income: 0.0,
            expenses: 0.0,
            net: 0.0,
        }
    }

    fn fold(&mut self, kind: FlowKind, amount: f64) {
        match kind {
            FlowKind::Income => self.income += amount,
            FlowKind::Expense => self.expenses += amount,
        }
        self.net = self.income - self.expenses;
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// Projects `months_ahead` monthly buckets starting with the month containing `today`.
///
/// Every rule contributes its monthly-equivalent amount to every bucket; start
/// and end dates are not consulted per month.
pub fn project(
    rules: &[RecurringRule],
    months_ahead: u32,
    today: NaiveDate,
) -> Vec<ProjectionBucket> {
    let first_of_month = today - Days::new(u64::from(today.day0()));
    let mut buckets: Vec<ProjectionBucket> = (0..months_ahead)
        .map_while(|offset| first_of_month.checked_add_months(Months::new(offset)))
        .map(ProjectionBucket::starting)
        .collect();

    for rule in rules {
        let monthly = rule.monthly_equivalent();
        for bucket in &mut buckets {
            bucket.fold(rule.kind, monthly);
        }
    }

    debug!(
        rules = rules.len(),
        months = buckets.len(),
        "projected recurring cash flow"
    );
    buckets
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTotals {
    pub months: usize,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

impl ProjectionTotals {
    pub fn from_buckets(buckets: &[ProjectionBucket]) -> Self {
        let mut totals = ProjectionTotals {
            months: buckets.len(),
            ..ProjectionTotals::default()
        };
        for bucket in buckets {
            totals.income += bucket.income;
            totals.expenses += bucket.expenses;
        }
        totals.net = totals.income - totals.expenses;
        totals
    }
}

/// Request-scoped inputs to a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub today: NaiveDate,
    pub months_ahead: u32,
}

impl ProjectionRequest {
    pub fn new(today: NaiveDate, months_ahead: u32) -> Self {
        Self {
            today,
            months_ahead,
        }
    }

    /// Default horizon anchored on the clock's current date.
    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self::new(clock.today(), DEFAULT_PROJECTION_MONTHS)
    }

    pub fn from_config(config: &Config, clock: &dyn Clock) -> Self {
        Self::new(clock.today(), config.projection_months)
    }

    pub fn run(&self, rules: &[RecurringRule]) -> CashFlowReport {
        let buckets = project(rules, self.months_ahead, self.today);
        let totals = ProjectionTotals::from_buckets(&buckets);
        CashFlowReport {
            request: *self,
            buckets,
            totals,
        }
    }
}

/// Runs projections against a clock so each call picks up the current date.
#[derive(Debug, Clone)]
pub struct CashFlowProjector<C: Clock = SystemClock> {
    clock: C,
    months_ahead: u32,
}

impl<C: Clock> CashFlowProjector<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            months_ahead: DEFAULT_PROJECTION_MONTHS,
        }
    }

    pub fn from_config(config: &Config, clock: C) -> Self {
        Self::new(clock).with_months(config.projection_months)
    }

    pub fn with_months(mut self, months_ahead: u32) -> Self {
        self.months_ahead = months_ahead;
        self
    }

    pub fn request(&self) -> ProjectionRequest {
        ProjectionRequest::new(self.clock.today(), self.months_ahead)
    }

    pub fn project(&self, rules: &[RecurringRule]) -> CashFlowReport {
        self.request().run(rules)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowReport {
    pub request: ProjectionRequest,
    pub buckets: Vec<ProjectionBucket>,
    pub totals: ProjectionTotals,
}

impl CashFlowReport {
    /// One display line per bucket; amounts are rounded here and nowhere earlier.
    pub fn describe(&self, currency: &CurrencyCode, locale: &LocaleConfig) -> Vec<String> {
        self.buckets
            .iter()
            .map(|bucket| {
                format!(
                    "{}-{:02}: income {}, expenses {}, net {}",
                    bucket.year,
                    bucket.month,
                    format_amount(bucket.income, currency, locale),
                    format_amount(bucket.expenses, currency, locale),
                    format_amount(bucket.net, currency, locale),
                )
            })
            .collect()
    }
}
