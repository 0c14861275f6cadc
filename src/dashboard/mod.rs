//! Dashboard module
//!
//! Provides an overview of the owner's income and expenses: all-time totals, the
//! spending of the last 30 days, the income of the last 60 days and the most recent
//! transactions of either kind.

mod aggregation;
mod handlers;

pub use handlers::get_dashboard_endpoint;
