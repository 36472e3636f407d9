use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recurring::{FlowKind, Occurrence, RecurringRule};

/// A dated money movement, either entered once or materialized from a rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    /// Rule this record was generated from; `None` for one-off entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<Uuid>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlowKind,
    pub amount: f64,
    pub currency: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ref: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_ref: Option<Uuid>,
}

impl Transaction {
    pub fn new(
        name: impl Into<String>,
        kind: FlowKind,
        amount: f64,
        currency: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            rule_id: None,
            name: name.into(),
            kind,
            amount,
            currency: currency.into(),
            date,
            category_ref: None,
            account_ref: None,
        }
    }

    pub fn from_occurrence(rule: &RecurringRule, occurrence: &Occurrence) -> Self {
        Self {
            id: Uuid::new_v4(),
            rule_id: Some(rule.id),
            name: rule.name.clone(),
            kind: occurrence.kind,
            amount: occurrence.amount,
            currency: rule.currency.clone(),
            date: occurrence.date,
            category_ref: rule.category_ref,
            account_ref: rule.account_ref,
        }
    }
}
