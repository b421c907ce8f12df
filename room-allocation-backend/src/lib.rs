//! Runs the weekly allocation against a store and reports what happened.

pub mod allocation;
pub mod error;
pub mod telemetry;

pub use allocation::{
    preview_allocation, resolve_week, run_allocation, stored_allocations, CategoryReport,
    RunReport, StoredAllocations, Target,
};
pub use error::AppError;
