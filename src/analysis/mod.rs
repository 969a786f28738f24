//! Views derived from a decoded action stream.
//!
//! Both computations only read the stream and can be re-run on it with
//! identical results.

mod build_order;
mod metrics;

pub use build_order::{
    build_order_for, extract_build_orders, BuildOrderEntry, SUPPLY_BASE, SUPPLY_STEP,
};
pub use metrics::{compute_metrics, PlayerMetrics};
