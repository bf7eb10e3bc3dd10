//! Shared data types for reporting events
//!
//! Input-side model: what the cluster hands us once per reporting interval.

mod event;
mod value;

pub use event::{DataPoint, ReportingEvent, TaskInfo};
pub use value::RawValue;
