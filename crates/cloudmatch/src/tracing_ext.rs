//! Tracing helpers for registration operations.
//!
//! Enable output by installing a subscriber in the application:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // Set RUST_LOG=cloudmatch=debug for detailed output,
//! // RUST_LOG=cloudmatch::timing=debug for timing only.
//! ```

use std::time::Instant;
use tracing::{debug, info};

use crate::types::PointSet;

/// A performance timer that logs duration on drop.
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        debug!(target: "cloudmatch::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Create a timer that also records the sizes of both inputs.
    pub fn with_context(name: &'static str, model_count: usize, data_count: usize) -> Self {
        debug!(
            target: "cloudmatch::timing",
            operation = name,
            model = model_count,
            data = data_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Get the elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        info!(
            target: "cloudmatch::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", self.elapsed_ms()),
            "Operation completed"
        );
    }
}

/// Log point-set statistics at debug level.
pub fn log_point_set_stats(set: &PointSet, context: &str) {
    let dims = set
        .bounds()
        .map(|(min, max)| format!("{:.2} x {:.2}", max.x - min.x, max.y - min.y))
        .unwrap_or_else(|| "empty".to_string());

    debug!(
        target: "cloudmatch::cloud_state",
        context = context,
        points = set.len(),
        dimensions = dims,
        "Point set state"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_measures_elapsed() {
        let timer = OperationTimer::new("test_op");
        assert!(timer.elapsed_ms() >= 0.0);
    }

    #[test]
    fn test_stats_on_empty_set() {
        // Must not panic on an empty set.
        log_point_set_stats(&PointSet::new(), "empty");
    }
}
