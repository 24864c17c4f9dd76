//! The Summary Engine: aggregates a user's transactions into monthly figures.

mod aggregation;
mod endpoint;

pub use aggregation::{SummaryReport, compute_summary};
pub use endpoint::{get_summary, get_summary_endpoint};
