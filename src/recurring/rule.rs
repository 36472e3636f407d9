use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FinanceError, Result};

use super::{
    frequency::Frequency,
    normalize::to_monthly_equivalent,
    time_interval::{TimeInterval, TimeUnit},
};

const DEFAULT_CURRENCY: &str = "USD";

/// Direction of money for a rule or transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Income,
    Expense,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::Income => f.write_str("income"),
            FlowKind::Expense => f.write_str("expense"),
        }
    }
}

/// A user-defined template describing a repeating income or expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringRule {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlowKind,
    pub amount: f64,
    #[serde(default = "RecurringRule::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_unit: Option<TimeUnit>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ref: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_ref: Option<Uuid>,
}

impl RecurringRule {
    pub fn new(
        name: impl Into<String>,
        kind: FlowKind,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            amount,
            currency: Self::default_currency(),
            frequency,
            custom_interval: None,
            custom_unit: None,
            start_date,
            end_date: None,
            category_ref: None,
            account_ref: None,
        }
    }

    pub fn default_currency() -> String {
        DEFAULT_CURRENCY.into()
    }

    /// Switches the rule to a custom cadence of `every` `unit`s.
    pub fn with_custom(mut self, every: u32, unit: TimeUnit) -> Self {
        self.frequency = Frequency::Custom;
        self.custom_interval = Some(every);
        self.custom_unit = Some(unit);
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into().to_uppercase();
        self
    }

    pub fn with_category(mut self, category: Uuid) -> Self {
        self.category_ref = Some(category);
        self
    }

    pub fn with_account(mut self, account: Uuid) -> Self {
        self.account_ref = Some(account);
        self
    }

    pub fn interval(&self) -> TimeInterval {
        self.frequency.interval(self.custom_interval, self.custom_unit)
    }

    pub fn monthly_equivalent(&self) -> f64 {
        to_monthly_equivalent(
            self.amount,
            &self.frequency,
            self.custom_interval,
            self.custom_unit,
        )
    }

    pub fn frequency_label(&self) -> String {
        self.frequency.label(self.custom_interval, self.custom_unit)
    }

    /// True when the rule's end date falls before `date`.
    pub fn ended_before(&self, date: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end < date)
    }

    /// Checks the fields the editing form guarantees.
    ///
    /// An end date before the start date is accepted; such a rule simply never fires.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FinanceError::InvalidInput(
                "recurring rule name cannot be empty".into(),
            ));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(FinanceError::InvalidInput(format!(
                "amount for `{}` must be a non-negative number",
                self.name
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(FinanceError::InvalidInput(format!(
                "currency for `{}` cannot be empty",
                self.name
            )));
        }
        if self.frequency == Frequency::Custom {
            match (self.custom_interval, self.custom_unit) {
                (Some(every), Some(_)) if every >= 1 => {}
                _ => {
                    return Err(FinanceError::InvalidInput(format!(
                        "custom frequency for `{}` needs an interval of at least 1 and a unit",
                        self.name
                    )))
                }
            }
        }
        Ok(())
    }
}
