//! Temporal bucketing and derived calendar-period groupings.

pub mod bucket;
pub mod period;

pub use bucket::{PeriodKey, bucket_of};
pub use period::{
    CalendarPeriod, group_and_count_events_by_period, group_events_by_period, period_bounds,
};
