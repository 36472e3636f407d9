mod common;

use common::{date, expense, income};
use fintrack_core::{
    config::Config,
    errors::FinanceError,
    ledger::{RuleBook, Transaction},
    recurring::{DateWindow, FlowKind, Frequency, ProjectionRequest, ScheduledStatus, TimeUnit},
};
use uuid::Uuid;

fn household() -> (RuleBook, Uuid, Uuid) {
    let mut book = RuleBook::new("Household");
    let salary = book
        .add_rule(income("Salary", 3000.0, Frequency::Monthly, date(2024, 1, 1)))
        .expect("add salary");
    let rent = book
        .add_rule(expense("Rent", 1200.0, Frequency::Monthly, date(2024, 1, 5)))
        .expect("add rent");
    (book, salary, rent)
}

#[test]
fn added_rules_can_be_looked_up() {
    let (book, salary, rent) = household();
    assert_eq!(book.rules().len(), 2);
    assert_eq!(book.rule(salary).map(|r| r.name.as_str()), Some("Salary"));
    assert_eq!(book.rule(rent).map(|r| r.kind), Some(FlowKind::Expense));
    assert!(book.rule(Uuid::new_v4()).is_none());
}

#[test]
fn invalid_rules_are_rejected() {
    let mut book = RuleBook::new("Household");

    let unnamed = income("  ", 10.0, Frequency::Monthly, date(2024, 1, 1));
    assert!(matches!(
        book.add_rule(unnamed),
        Err(FinanceError::InvalidInput(_))
    ));

    let negative = expense("Refund?", -5.0, Frequency::Monthly, date(2024, 1, 1));
    assert!(book.add_rule(negative).is_err());

    let zero_interval =
        expense("Pet food", 5.0, Frequency::Custom, date(2024, 1, 1)).with_custom(0, TimeUnit::Day);
    assert!(book.add_rule(zero_interval).is_err());

    let no_unit = expense("Pet food", 5.0, Frequency::Custom, date(2024, 1, 1));
    assert!(book.add_rule(no_unit).is_err());

    assert!(book.rules().is_empty());
}

#[test]
fn duplicate_ids_are_rejected() {
    let (mut book, salary, _) = household();
    let copy = book.rule(salary).cloned().expect("salary exists");
    assert!(book.add_rule(copy).is_err());
    assert_eq!(book.rules().len(), 2);
}

#[test]
fn updates_apply_only_when_valid() {
    let (mut book, salary, _) = household();

    book.update_rule(salary, |rule| {
        rule.amount = 3250.0;
        rule.frequency = Frequency::BiWeekly;
    })
    .expect("valid update");
    let updated = book.rule(salary).expect("salary exists");
    assert_eq!(updated.amount, 3250.0);
    assert_eq!(updated.frequency, Frequency::BiWeekly);

    let err = book.update_rule(salary, |rule| rule.amount = f64::NAN);
    assert!(matches!(err, Err(FinanceError::InvalidInput(_))));
    assert_eq!(book.rule(salary).map(|r| r.amount), Some(3250.0));

    let err = book.update_rule(salary, |rule| rule.id = Uuid::new_v4());
    assert!(err.is_err());
    assert!(book.rule(salary).is_some());

    let missing = Uuid::new_v4();
    assert!(matches!(
        book.update_rule(missing, |_| {}),
        Err(FinanceError::RuleNotFound(id)) if id == missing
    ));
}

#[test]
fn removing_a_rule_cascades_to_its_transactions() {
    let (mut book, salary, rent) = household();
    book.materialize_due(date(2024, 3, 31));
    let one_off = book
        .add_transaction(Transaction::new(
            "Garage sale",
            FlowKind::Income,
            85.0,
            "USD",
            date(2024, 2, 10),
        ))
        .expect("add one-off");

    assert_eq!(book.transactions_for_rule(salary).len(), 3);
    let (removed, dropped) = book.remove_rule(salary).expect("remove salary");

    assert_eq!(removed.id, salary);
    assert_eq!(dropped, 3);
    assert!(book.rule(salary).is_none());
    assert!(book.transactions_for_rule(salary).is_empty());
    assert_eq!(book.transactions_for_rule(rent).len(), 3);
    assert!(book.transaction(one_off).is_some());

    assert!(matches!(
        book.remove_rule(salary),
        Err(FinanceError::RuleNotFound(_))
    ));
}

#[test]
fn transactions_must_reference_known_rules() {
    let (mut book, _, _) = household();

    let mut orphan = Transaction::new("Ghost", FlowKind::Expense, 10.0, "USD", date(2024, 1, 1));
    orphan.rule_id = Some(Uuid::new_v4());
    assert!(matches!(
        book.add_transaction(orphan),
        Err(FinanceError::RuleNotFound(_))
    ));

    let broken = Transaction::new(
        "Broken",
        FlowKind::Expense,
        f64::INFINITY,
        "USD",
        date(2024, 1, 1),
    );
    assert!(book.add_transaction(broken).is_err());

    assert!(matches!(
        book.remove_transaction(Uuid::new_v4()),
        Err(FinanceError::TransactionNotFound(_))
    ));
    assert!(book.transactions.is_empty());
}

#[test]
fn materializing_is_idempotent_and_resumes() {
    let (mut book, salary, rent) = household();

    assert_eq!(book.materialize_due(date(2024, 3, 15)), 6);
    assert_eq!(book.materialize_due(date(2024, 3, 15)), 0);

    let dates: Vec<_> = book
        .transactions_for_rule(rent)
        .iter()
        .map(|txn| txn.date)
        .collect();
    assert_eq!(dates, vec![date(2024, 1, 5), date(2024, 2, 5), date(2024, 3, 5)]);

    assert_eq!(book.materialize_due(date(2024, 5, 1)), 3);
    let latest = book.transactions_for_rule(salary);
    assert_eq!(latest.last().map(|txn| txn.date), Some(date(2024, 5, 1)));
    assert!(latest.iter().all(|txn| txn.amount == 3000.0 && txn.currency == "USD"));
}

#[test]
fn deleted_instances_are_not_recreated() {
    let (mut book, salary, _) = household();
    book.materialize_due(date(2024, 4, 30));

    let february = book
        .transactions_for_rule(salary)
        .iter()
        .find(|txn| txn.date == date(2024, 2, 1))
        .map(|txn| txn.id)
        .expect("february salary");
    book.remove_transaction(february).expect("remove february");

    assert_eq!(book.materialize_due(date(2024, 4, 30)), 0);
    assert_eq!(book.transactions_for_rule(salary).len(), 3);
}

#[test]
fn large_backlogs_are_caught_up_over_several_calls() {
    let mut book = RuleBook::new("Habits");
    let coffee = book
        .add_rule(expense("Coffee", 4.5, Frequency::Daily, date(2024, 1, 1)))
        .expect("add coffee");
    let reference = date(2024, 12, 31);

    let created: Vec<usize> = (0..5).map(|_| book.materialize_due(reference)).collect();
    assert_eq!(created, vec![100, 100, 100, 66, 0]);

    let records = book.transactions_for_rule(coffee);
    assert_eq!(records.len(), 366);
    assert_eq!(records.first().map(|txn| txn.date), Some(date(2024, 1, 1)));
    assert_eq!(records.last().map(|txn| txn.date), Some(reference));
}

#[test]
fn ended_and_future_rules_are_not_materialized() {
    let mut book = RuleBook::new("Edges");
    book.add_rule(
        expense("Old loan", 100.0, Frequency::Monthly, date(2023, 1, 10))
            .with_end_date(date(2023, 3, 10)),
    )
    .expect("add loan");
    book.add_rule(income("Pension", 900.0, Frequency::Monthly, date(2040, 1, 1)))
        .expect("add pension");

    assert_eq!(book.materialize_due(date(2024, 6, 1)), 3);
    assert_eq!(book.materialize_due(date(2024, 6, 1)), 0);
}

#[test]
fn month_calendar_groups_by_day() {
    let mut book = RuleBook::new("Calendar");
    book.add_rule(expense("Groceries", 50.0, Frequency::Weekly, date(2024, 1, 3)))
        .expect("add groceries");
    book.add_rule(income("Paycheck", 800.0, Frequency::BiWeekly, date(2024, 1, 31)))
        .expect("add paycheck");
    book.add_rule(expense("Phone", 40.0, Frequency::Monthly, date(2024, 1, 15)))
        .expect("add phone");

    let days = book.month_calendar(2024, 2).expect("calendar");
    let dates: Vec<_> = days.iter().map(|day| day.date).collect();
    assert_eq!(
        dates,
        vec![
            date(2024, 2, 7),
            date(2024, 2, 14),
            date(2024, 2, 15),
            date(2024, 2, 21),
            date(2024, 2, 28)
        ]
    );

    let payday = &days[1];
    assert_eq!(payday.occurrences.len(), 2);
    assert_eq!(payday.income, 800.0);
    assert_eq!(payday.expenses, 50.0);
    assert_eq!(payday.net(), 750.0);

    assert!(book.month_calendar(2024, 13).is_err());
}

#[test]
fn schedule_classifies_against_reference() {
    let mut book = RuleBook::new("Schedule");
    book.add_rule(expense("Cleaner", 60.0, Frequency::Weekly, date(2024, 5, 1)))
        .expect("add cleaner");

    let window = DateWindow::following(date(2024, 5, 1), 30).expect("window");
    let statuses: Vec<_> = book
        .schedule(window, date(2024, 5, 10), 7)
        .into_iter()
        .map(|scheduled| (scheduled.occurrence.date, scheduled.status))
        .collect();

    assert_eq!(
        statuses,
        vec![
            (date(2024, 5, 1), ScheduledStatus::Overdue),
            (date(2024, 5, 8), ScheduledStatus::Overdue),
            (date(2024, 5, 15), ScheduledStatus::Pending),
            (date(2024, 5, 22), ScheduledStatus::Future),
            (date(2024, 5, 29), ScheduledStatus::Future),
        ]
    );
}

#[test]
fn configured_pending_window_drives_the_schedule() {
    let mut book = RuleBook::new("Schedule");
    book.add_rule(expense("Cleaner", 60.0, Frequency::Weekly, date(2024, 5, 1)))
        .expect("add cleaner");
    let window = DateWindow::following(date(2024, 5, 1), 30).expect("window");
    let reference = date(2024, 5, 10);

    let pending = |config: &Config| {
        book.schedule_with_config(window, reference, config)
            .iter()
            .filter(|scheduled| scheduled.status == ScheduledStatus::Pending)
            .count()
    };

    assert_eq!(pending(&Config::default()), 1);
    let wide = Config {
        pending_window_days: 14,
        ..Config::default()
    };
    assert_eq!(pending(&wide), 2);
    let none = Config {
        pending_window_days: 0,
        ..Config::default()
    };
    assert_eq!(pending(&none), 0);
}

#[test]
fn projection_covers_every_rule() {
    let (book, _, _) = household();
    let report = book.projection(&ProjectionRequest::new(date(2024, 1, 20), 3));
    assert_eq!(report.buckets.len(), 3);
    assert!(report.buckets.iter().all(|bucket| bucket.net == 1800.0));
    assert_eq!(report.totals.net, 5400.0);
}
