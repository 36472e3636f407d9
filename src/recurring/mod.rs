//! Recurring rules and everything derived from them: occurrences, monthly
//! equivalents, projections and calendar views.

pub mod calendar;
pub mod frequency;
pub mod normalize;
pub mod occurrence;
pub mod projection;
pub mod rule;
pub mod time_interval;
pub mod window;

pub use calendar::{
    month_calendar, scheduled_in_window, CalendarDay, ScheduledOccurrence, ScheduledStatus,
};
pub use frequency::Frequency;
pub use normalize::to_monthly_equivalent;
pub use occurrence::{
    generate_occurrences, occurrences_in_window, Occurrence, Occurrences, MAX_OCCURRENCES,
};
pub use projection::{
    project, CashFlowProjector, CashFlowReport, ProjectionBucket, ProjectionRequest,
    ProjectionTotals, DEFAULT_PROJECTION_MONTHS,
};
pub use rule::{FlowKind, RecurringRule};
pub use time_interval::{TimeInterval, TimeUnit};
pub use window::DateWindow;
