//! Per-request streaming metrics.

use std::collections::HashMap;
use std::time::Instant;

use rill_core::RequestId;
use serde::{Deserialize, Serialize};

/// Metrics for a single streamed (or buffered) response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamMetrics {
    /// Request ID for correlation.
    pub request_id: String,
    /// Page component name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Route path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Whether the crawler path was taken (single flush).
    pub bot: bool,
    /// Number of flushes performed.
    pub flush_count: usize,
    /// Total body bytes.
    pub bytes_sent: usize,
    /// Time to shell flush (microseconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_shell_us: Option<u64>,
    /// Time to first boundary resolution chunk (microseconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_first_boundary_us: Option<u64>,
    /// Per-boundary resolution timings.
    pub boundaries: HashMap<String, BoundaryMetrics>,
    /// Total duration (microseconds).
    pub total_duration_us: u64,
    /// HTTP status code.
    pub status_code: u16,
}

/// Metrics for one boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryMetrics {
    /// Time from request start to resolution chunk sent (microseconds).
    pub resolved_us: u64,
    /// Chunk size in bytes.
    pub bytes: usize,
    /// Whether the boundary resolved with an error fallback.
    pub errored: bool,
}

/// Collector building [`StreamMetrics`] as the pipeline runs.
#[derive(Debug)]
pub struct MetricsCollector {
    request_id: RequestId,
    page: Option<String>,
    route: Option<String>,
    bot: bool,
    start: Instant,
    shell_sent: Option<Instant>,
    first_boundary_sent: Option<Instant>,
    flush_count: usize,
    bytes_sent: usize,
    boundaries: HashMap<String, BoundaryMetrics>,
}

impl MetricsCollector {
    /// Create a new collector.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            page: None,
            route: None,
            bot: false,
            start: Instant::now(),
            shell_sent: None,
            first_boundary_sent: None,
            flush_count: 0,
            bytes_sent: 0,
            boundaries: HashMap::new(),
        }
    }

    /// Set the page component name.
    pub fn set_page(&mut self, page: impl Into<String>) {
        self.page = Some(page.into());
    }

    /// Set the route path.
    pub fn set_route(&mut self, route: impl Into<String>) {
        self.route = Some(route.into());
    }

    /// Mark the crawler path.
    pub fn set_bot(&mut self, bot: bool) {
        self.bot = bot;
    }

    /// Record one flush of `bytes` body bytes.
    pub fn record_flush(&mut self, bytes: usize) {
        self.flush_count += 1;
        self.bytes_sent += bytes;
        if self.shell_sent.is_none() {
            self.shell_sent = Some(Instant::now());
        }
    }

    /// Record a boundary's resolution chunk.
    pub fn record_boundary(&mut self, name: &str, bytes: usize, errored: bool) {
        let now = Instant::now();
        if self.first_boundary_sent.is_none() {
            self.first_boundary_sent = Some(now);
        }
        self.boundaries.insert(
            name.to_string(),
            BoundaryMetrics {
                resolved_us: now.duration_since(self.start).as_micros() as u64,
                bytes,
                errored,
            },
        );
    }

    /// Current flush count.
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    /// Finalize into [`StreamMetrics`].
    pub fn finalize(self, status_code: u16) -> StreamMetrics {
        let now = Instant::now();

        StreamMetrics {
            request_id: self.request_id.to_string(),
            page: self.page,
            route: self.route,
            bot: self.bot,
            flush_count: self.flush_count,
            bytes_sent: self.bytes_sent,
            time_to_shell_us: self
                .shell_sent
                .map(|t| t.duration_since(self.start).as_micros() as u64),
            time_to_first_boundary_us: self
                .first_boundary_sent
                .map(|t| t.duration_since(self.start).as_micros() as u64),
            boundaries: self.boundaries,
            total_duration_us: now.duration_since(self.start).as_micros() as u64,
            status_code,
        }
    }
}

impl StreamMetrics {
    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as a human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Request: {} ({} flushes, {} bytes{})",
            self.request_id,
            self.flush_count,
            self.bytes_sent,
            if self.bot { ", bot" } else { "" }
        ));

        if let Some(tts) = self.time_to_shell_us {
            lines.push(format!("  Time to shell: {:.2}ms", tts as f64 / 1000.0));
        }

        for (name, b) in &self.boundaries {
            let err = if b.errored { " [error]" } else { "" };
            lines.push(format!(
                "  Boundary {}: {:.2}ms, {} bytes{}",
                name,
                b.resolved_us as f64 / 1000.0,
                b.bytes,
                err
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_accounting() {
        let mut collector = MetricsCollector::new(RequestId::from_string("m-1"));
        collector.record_flush(100);
        collector.record_flush(50);

        let metrics = collector.finalize(200);
        assert_eq!(metrics.flush_count, 2);
        assert_eq!(metrics.bytes_sent, 150);
        assert!(metrics.time_to_shell_us.is_some());
    }

    #[test]
    fn test_first_boundary_recorded_once() {
        let mut collector = MetricsCollector::new(RequestId::from_string("m-2"));
        collector.record_flush(10);
        collector.record_boundary("fast", 20, false);
        let first = collector.first_boundary_sent;
        collector.record_boundary("slow", 30, true);

        assert_eq!(collector.first_boundary_sent, first);
        let metrics = collector.finalize(200);
        assert!(metrics.boundaries["slow"].errored);
        assert_eq!(metrics.boundaries.len(), 2);
    }

    #[test]
    fn test_summary_mentions_bot_path() {
        let mut collector = MetricsCollector::new(RequestId::from_string("m-3"));
        collector.set_bot(true);
        collector.record_flush(512);

        let summary = collector.finalize(200).to_summary();
        assert!(summary.contains("1 flushes"));
        assert!(summary.contains("bot"));
    }

    #[test]
    fn test_json_round_trips() {
        let mut collector = MetricsCollector::new(RequestId::from_string("m-4"));
        collector.set_page("Streaming");
        collector.record_flush(64);

        let json = collector.finalize(200).to_json();
        let parsed: StreamMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.page.as_deref(), Some("Streaming"));
        assert_eq!(parsed.status_code, 200);
    }
}
