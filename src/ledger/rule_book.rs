use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::Config,
    errors::{FinanceError, Result},
    recurring::{
        month_calendar, scheduled_in_window, CalendarDay, CashFlowReport, DateWindow,
        Occurrences, ProjectionRequest, RecurringRule, ScheduledOccurrence,
    },
};

use super::transaction::Transaction;

/// A caller-owned snapshot of recurring rules and the transactions generated from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleBook {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<RecurringRule>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RuleBook {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rules: Vec::new(),
            transactions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn rules(&self) -> &[RecurringRule] {
        &self.rules
    }

    pub fn rule(&self, id: Uuid) -> Option<&RecurringRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn add_rule(&mut self, rule: RecurringRule) -> Result<Uuid> {
        rule.validate()?;
        if self.rule(rule.id).is_some() {
            return Err(FinanceError::InvalidInput(format!(
                "recurring rule {} already exists",
                rule.id
            )));
        }
        let id = rule.id;
        info!(
            rule_id = %id,
            name = %rule.name,
            frequency = %rule.frequency,
            "recurring rule added"
        );
        self.rules.push(rule);
        self.touch();
        Ok(id)
    }

    /// Applies `edit` to a copy of the rule and stores it only if it still validates.
    pub fn update_rule<F>(&mut self, id: Uuid, edit: F) -> Result<()>
    where
        F: FnOnce(&mut RecurringRule),
    {
        let index = self
            .rules
            .iter()
            .position(|rule| rule.id == id)
            .ok_or(FinanceError::RuleNotFound(id))?;
        let mut draft = self.rules[index].clone();
        edit(&mut draft);
        if draft.id != id {
            return Err(FinanceError::InvalidInput(
                "recurring rule id cannot change".into(),
            ));
        }
        draft.validate()?;
        self.rules[index] = draft;
        self.touch();
        debug!(rule_id = %id, "recurring rule updated");
        Ok(())
    }

    /// Deletes the rule along with every transaction generated from it.
    ///
    /// Returns the removed rule and the number of transactions dropped with it.
    pub fn remove_rule(&mut self, id: Uuid) -> Result<(RecurringRule, usize)> {
        let index = self
            .rules
            .iter()
            .position(|rule| rule.id == id)
            .ok_or(FinanceError::RuleNotFound(id))?;
        let rule = self.rules.remove(index);
        let before = self.transactions.len();
        self.transactions.retain(|txn| txn.rule_id != Some(id));
        let removed = before - self.transactions.len();
        self.touch();
        info!(rule_id = %id, removed_transactions = removed, "recurring rule removed");
        Ok((rule, removed))
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<Uuid> {
        if !transaction.amount.is_finite() {
            return Err(FinanceError::InvalidInput(format!(
                "amount for `{}` must be a finite number",
                transaction.name
            )));
        }
        if let Some(rule_id) = transaction.rule_id {
            if self.rule(rule_id).is_none() {
                return Err(FinanceError::RuleNotFound(rule_id));
            }
        }
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        Ok(id)
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(FinanceError::TransactionNotFound(id))?;
        let removed = self.transactions.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Transactions generated from `rule_id`, oldest first.
    pub fn transactions_for_rule(&self, rule_id: Uuid) -> Vec<&Transaction> {
        let mut matches: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|txn| txn.rule_id == Some(rule_id))
            .collect();
        matches.sort_by_key(|txn| txn.date);
        matches
    }

    /// Records every occurrence up to and including `reference` that has no
    /// transaction yet, returning how many were created.
    ///
    /// Each rule resumes the day after its latest recorded transaction, so a
    /// deleted instance is not recreated. A single call creates at most
    /// `MAX_OCCURRENCES` records per rule; later calls continue the backlog.
    pub fn materialize_due(&mut self, reference: NaiveDate) -> usize {
        let mut recorded: HashSet<(Uuid, NaiveDate)> = self
            .transactions
            .iter()
            .filter_map(|txn| txn.rule_id.map(|rule_id| (rule_id, txn.date)))
            .collect();
        let mut creations = Vec::new();

        for rule in &self.rules {
            let resume_from = self
                .transactions
                .iter()
                .filter(|txn| txn.rule_id == Some(rule.id))
                .map(|txn| txn.date)
                .max()
                .and_then(|last| last.succ_opt())
                .map_or(rule.start_date, |next| next.max(rule.start_date));
            if resume_from > reference || rule.ended_before(resume_from) {
                continue;
            }
            for occurrence in Occurrences::new(rule, resume_from, reference) {
                if recorded.insert((rule.id, occurrence.date)) {
                    creations.push(Transaction::from_occurrence(rule, &occurrence));
                }
            }
        }

        let created = creations.len();
        if created > 0 {
            self.transactions.extend(creations);
            self.touch();
            info!(created, %reference, "materialized recurring transactions");
        }
        created
    }

    pub fn projection(&self, request: &ProjectionRequest) -> CashFlowReport {
        request.run(&self.rules)
    }

    pub fn month_calendar(&self, year: i32, month: u32) -> Result<Vec<CalendarDay>> {
        month_calendar(&self.rules, year, month)
    }

    pub fn schedule(
        &self,
        window: DateWindow,
        reference: NaiveDate,
        pending_days: u32,
    ) -> Vec<ScheduledOccurrence> {
        scheduled_in_window(&self.rules, window, reference, pending_days)
    }

    /// [`RuleBook::schedule`] using the configured pending window.
    pub fn schedule_with_config(
        &self,
        window: DateWindow,
        reference: NaiveDate,
        config: &Config,
    ) -> Vec<ScheduledOccurrence> {
        self.schedule(window, reference, config.pending_window_days)
    }
}
