//! Per-group interval scheduling.
//!
//! Each policy group may carry its own evaluation interval. The
//! [`GroupScheduler`] tracks when each group last ran and determines which
//! groups are due on a given tick. Groups without an interval run on every
//! tick, and the tick period is the finest granularity any group can get.

mod core;
mod entry;


pub use self::core::GroupScheduler;
pub use self::entry::GroupScheduleEntry;
