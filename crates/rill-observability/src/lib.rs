//! Observability for the rill pipeline.
//!
//! - `StructuredLogger` - request-scoped JSON log lines
//! - `MetricsCollector` / `StreamMetrics` - flush and boundary timings

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;
