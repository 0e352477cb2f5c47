//! Membership plan durations and end-date derivation used by the form page.

pub mod handlers;
pub mod models;

pub use models::{derive_end_date, PlanDuration};
