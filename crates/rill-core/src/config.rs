//! Runtime configuration for the pipeline.

use serde::{Deserialize, Serialize};

/// Runtime the pipeline is hosted in.
///
/// The mode decides the cache-validator policy: under `Server` a streamed
/// response must not carry an `ETag` while a buffered (crawler-path)
/// response must. Under `Edge` no validator is attached at all; the host
/// CDN owns validators there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Long-lived host runtime.
    #[default]
    Server,
    /// Edge/isolate runtime.
    Edge,
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(Self::Server),
            "edge" => Ok(Self::Edge),
            other => Err(format!("unknown runtime mode: {other}")),
        }
    }
}

/// Streaming behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Channel capacity for in-flight chunks.
    pub channel_capacity: usize,
    /// Flush after each boundary resolution chunk. When false, resolution
    /// chunks coalesce into the closing flush; the shell still flushes on
    /// its own.
    pub flush_after_boundary: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
            flush_after_boundary: true,
        }
    }
}

impl StreamConfig {
    /// Create a new streaming configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Enable or disable per-boundary flushing.
    pub fn with_flush_after_boundary(mut self, flush: bool) -> Self {
        self.flush_after_boundary = flush;
        self
    }
}

/// Configuration for a rill application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RillConfig {
    /// Application name.
    pub name: String,
    /// Hosting runtime mode.
    #[serde(default)]
    pub runtime: RuntimeMode,
    /// Dev mode: enables head lint warnings in document and logs.
    #[serde(default)]
    pub dev: bool,
    /// Streaming behavior.
    #[serde(default)]
    pub stream: StreamConfig,
}

impl Default for RillConfig {
    fn default() -> Self {
        Self {
            name: "rill-app".to_string(),
            runtime: RuntimeMode::Server,
            dev: false,
            stream: StreamConfig::default(),
        }
    }
}

impl RillConfig {
    /// Create a new configuration with the given app name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the runtime mode.
    pub fn with_runtime(mut self, runtime: RuntimeMode) -> Self {
        self.runtime = runtime;
        self
    }

    /// Enable or disable dev mode.
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    /// Set streaming behavior.
    pub fn with_stream(mut self, stream: StreamConfig) -> Self {
        self.stream = stream;
        self
    }

    /// Load configuration from a TOML document.
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
