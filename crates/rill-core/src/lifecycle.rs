//! Request lifecycle tracking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lifecycle phases for a streamed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Request received, processing started.
    Start,
    /// Shell HTML has been flushed to the client.
    ShellSent,
    /// A named boundary's resolution chunk has been sent.
    BoundarySent(String),
    /// Closing chunk flushed, response complete.
    Completion,
    /// An error occurred.
    Error(String),
}

/// Timing context for observability.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    /// Create a new timing context.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Mark a boundary's resolution start.
    pub fn mark_boundary_start(&mut self, boundary: &str) {
        self.mark(&format!("boundary_{}_start", boundary));
    }

    /// Mark a boundary's resolution chunk as sent.
    pub fn mark_boundary_sent(&mut self, boundary: &str) {
        self.mark(&format!("boundary_{}_sent", boundary));
    }

    /// Get elapsed time since request start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time from request start to the shell flush.
    pub fn time_to_shell(&self) -> Option<Duration> {
        self.marks
            .get("shell_sent")
            .map(|t| t.duration_since(self.start))
    }

    /// Time from request start to the first boundary resolution chunk.
    pub fn time_to_first_boundary(&self) -> Option<Duration> {
        self.marks
            .iter()
            .filter(|(k, _)| k.starts_with("boundary_") && k.ends_with("_sent"))
            .map(|(_, t)| t.duration_since(self.start))
            .min()
    }

    /// Timing for a specific boundary, if both marks were recorded.
    pub fn boundary_timing(&self, boundary: &str) -> Option<BoundaryTiming> {
        let start = self.marks.get(&format!("boundary_{}_start", boundary))?;
        let sent = self.marks.get(&format!("boundary_{}_sent", boundary))?;

        Some(BoundaryTiming {
            name: boundary.to_string(),
            start: start.duration_since(self.start),
            sent: sent.duration_since(self.start),
            duration: sent.duration_since(*start),
        })
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing information for one boundary.
#[derive(Debug, Clone)]
pub struct BoundaryTiming {
    /// Boundary name.
    pub name: String,
    /// Time from request start to resolution start.
    pub start: Duration,
    /// Time from request start to chunk sent.
    pub sent: Duration,
    /// Duration of the resolution itself.
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_shell_requires_mark() {
        let mut timing = TimingContext::new();
        assert!(timing.time_to_shell().is_none());

        timing.mark("shell_sent");
        assert!(timing.time_to_shell().is_some());
    }

    #[test]
    fn test_boundary_timing_needs_both_marks() {
        let mut timing = TimingContext::new();
        timing.mark_boundary_start("feed");
        assert!(timing.boundary_timing("feed").is_none());

        timing.mark_boundary_sent("feed");
        let t = timing.boundary_timing("feed").unwrap();
        assert_eq!(t.name, "feed");
        assert!(t.sent >= t.start);
    }

    #[test]
    fn test_time_to_first_boundary_takes_minimum() {
        let mut timing = TimingContext::new();
        timing.mark_boundary_sent("slow");
        timing.mark_boundary_sent("fast");

        let first = timing.time_to_first_boundary().unwrap();
        assert!(first <= timing.elapsed());
    }
}
