//! Periodic fetch, process and publish pipeline

pub mod cycle;
pub mod handle;

pub use cycle::{CycleState, RefreshScheduler, SchedulerSettings};
pub use handle::SchedulerHandle;
