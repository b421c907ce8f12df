//! Weekly allocation of meeting rooms and hot-desks.
//!
//! The engine is pure: it takes the submitted preferences of one week, the
//! bookable resources and a random source, and returns the assignments
//! together with diagnostics for the admin. Loading preferences and storing
//! the result is up to the caller.

pub mod error;
pub mod oasis;
pub mod outcome;
pub mod preference;
pub mod resource;
pub mod rooms;
pub mod week;

pub use error::{CatalogError, PreferenceError, WeekError};
pub use oasis::allocate_desks;
pub use outcome::{AllocationOutcome, AllocationSummary, Assignment, Diagnostic};
pub use preference::{Category, DeskRequest, DeskSubmission, RoomRequest, RoomSubmission};
pub use resource::{DeskPool, ResourceCatalog, Room};
pub use rooms::allocate_rooms;
pub use week::{DayPair, Week, WORKDAYS};
