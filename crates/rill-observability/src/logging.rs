//! Structured logging with request context.

use std::collections::HashMap;
use std::fmt;

use rill_core::RequestId;
use serde::Serialize;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Request ID for correlation.
    pub request_id: String,
    /// Page component name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Route path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
    /// Microseconds since the logger was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as a JSON line.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as a human-readable line.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if let Some(elapsed) = self.elapsed_us {
            s.push_str(&format!(" ({}us)", elapsed));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON lines (production, log aggregation).
    #[default]
    Json,
    /// Human-readable (development).
    Human,
}

/// Request-scoped structured logger.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    request_id: RequestId,
    page: Option<String>,
    route: Option<String>,
    start_time: std::time::Instant,
    min_level: LogLevel,
    format: LogFormat,
}

impl StructuredLogger {
    /// Create a new logger with request context.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            page: None,
            route: None,
            start_time: std::time::Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
        }
    }

    /// Set the page component name.
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Set the route path.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, HashMap::new());
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, HashMap::new());
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, HashMap::new());
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, HashMap::new());
    }

    /// Log at info level with structured fields.
    pub fn info_with(&self, message: &str, fields: &[(&str, serde_json::Value)]) {
        self.log(LogLevel::Info, message, collect_fields(fields));
    }

    /// Log at warn level with structured fields.
    pub fn warn_with(&self, message: &str, fields: &[(&str, serde_json::Value)]) {
        self.log(LogLevel::Warn, message, collect_fields(fields));
    }

    /// Log at error level with structured fields.
    pub fn error_with(&self, message: &str, fields: &[(&str, serde_json::Value)]) {
        self.log(LogLevel::Error, message, collect_fields(fields));
    }

    fn log(&self, level: LogLevel, message: &str, fields: HashMap<String, serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        let entry = self.entry(level, message, fields);
        let output = match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        };

        eprintln!("{}", output);
    }

    /// Build an entry without emitting it (used by tests and metrics).
    pub fn entry(
        &self,
        level: LogLevel,
        message: &str,
        fields: HashMap<String, serde_json::Value>,
    ) -> LogEntry {
        LogEntry {
            level,
            message: message.to_string(),
            request_id: self.request_id.to_string(),
            page: self.page.clone(),
            route: self.route.clone(),
            fields,
            elapsed_us: Some(self.start_time.elapsed().as_micros() as u64),
        }
    }

    /// Get the request ID.
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

fn collect_fields(fields: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_serializes_context() {
        let logger = StructuredLogger::new(RequestId::from_string("req-1"))
            .with_page("Streaming")
            .with_route("/streaming");

        let entry = logger.entry(LogLevel::Info, "shell flushed", HashMap::new());
        let line = entry.to_json();

        assert!(line.contains("\"request_id\":\"req-1\""));
        assert!(line.contains("\"page\":\"Streaming\""));
        assert!(line.contains("\"route\":\"/streaming\""));
    }

    #[test]
    fn test_entry_flattens_fields() {
        let logger = StructuredLogger::new(RequestId::from_string("req-2"));
        let entry = logger.entry(
            LogLevel::Warn,
            "boundary failed",
            collect_fields(&[("boundary", json!("reviews"))]),
        );

        assert!(entry.to_json().contains("\"boundary\":\"reviews\""));
    }

    #[test]
    fn test_human_format_includes_fields() {
        let logger = StructuredLogger::new(RequestId::from_string("req-3"));
        let entry = logger.entry(
            LogLevel::Info,
            "done",
            collect_fields(&[("flushes", json!(4))]),
        );

        let line = entry.to_human();
        assert!(line.starts_with("[INFO] done"));
        assert!(line.contains("flushes=4"));
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
