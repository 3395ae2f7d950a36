//! Response type shared by the pipeline and host servers.

use futures::channel::mpsc;
use futures::StreamExt;

/// Content type of HTML responses.
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Response body: one complete buffer or an ordered chunk stream.
pub enum Body {
    /// Complete body, delivered as exactly one flush.
    Buffered(String),
    /// Ordered chunks; each received chunk is one flush.
    Streaming(mpsc::Receiver<Vec<u8>>),
}

impl Body {
    /// Whether this body streams.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming(_))
    }

    /// Drain the body into its flushes, in send order.
    pub async fn chunks(self) -> Vec<Vec<u8>> {
        match self {
            Self::Buffered(s) => vec![s.into_bytes()],
            Self::Streaming(rx) => rx.collect().await,
        }
    }

    /// Drain the body into its full text.
    pub async fn text(self) -> String {
        let mut out = String::new();
        for chunk in self.chunks().await {
            out.push_str(&String::from_utf8_lossy(&chunk));
        }
        out
    }
}

/// An HTTP-shaped response produced by the pipeline.
pub struct Response {
    /// Status code.
    pub status: u16,
    headers: Vec<(String, String)>,
    /// Response body.
    pub body: Body,
}

impl Response {
    /// Create a response.
    pub fn new(status: u16, body: Body) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All headers, in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}
