//! Request context with typed parameters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::lifecycle::TimingContext;

/// Unique request identifier for log correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        let seq = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self(format!("{:x}-{:x}", nanos, seq))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Query string parameters.
pub type QueryParams = HashMap<String, String>;

/// HTTP headers.
pub type Headers = HashMap<String, String>;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    /// Parse from a request-line token. Unknown methods are rejected.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }
}

/// Parse a raw query string (`a=1&b=2`) into query parameters.
///
/// Flag-style entries without `=` map to an empty value so code can
/// test for presence (`__flight__` is matched this way).
pub fn parse_query_string(raw: &str) -> QueryParams {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Typed request context handed to the pipeline.
#[derive(Debug)]
pub struct RequestContext {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request path (without query string).
    pub path: String,
    /// Query string parameters.
    pub query: QueryParams,
    /// HTTP headers.
    pub headers: Headers,
    /// Timing context for observability.
    pub timing: TimingContext,
}

impl RequestContext {
    /// Create a new request context.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::generate(),
            method,
            path: path.into(),
            query: HashMap::new(),
            headers: HashMap::new(),
            timing: TimingContext::new(),
        }
    }

    /// Attach a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach query parameters parsed from a raw query string.
    pub fn with_query_string(mut self, raw: &str) -> Self {
        self.query = parse_query_string(raw);
        self
    }

    /// Get a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(|s| s.as_str())
    }

    /// Check whether a query flag is present (value ignored).
    pub fn has_query_flag(&self, name: &str) -> bool {
        self.query.contains_key(name)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }

    /// The request's user-agent header, if any.
    pub fn user_agent(&self) -> Option<&str> {
        self.header("user-agent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === RequestId Tests ===

    #[test]
    fn test_request_id_generate_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_id_from_string() {
        let id = RequestId::from_string("abc-123");
        assert_eq!(id.to_string(), "abc-123");
    }

    // === Query Parsing Tests ===

    #[test]
    fn test_parse_query_string_pairs() {
        let q = parse_query_string("a=1&b=two");
        assert_eq!(q.get("a").map(String::as_str), Some("1"));
        assert_eq!(q.get("b").map(String::as_str), Some("two"));
    }

    #[test]
    fn test_parse_query_string_flag() {
        let q = parse_query_string("__flight__");
        assert!(q.contains_key("__flight__"));
        assert_eq!(q.get("__flight__").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_query_string_empty() {
        assert!(parse_query_string("").is_empty());
    }

    // === RequestContext Tests ===

    #[test]
    fn test_header_lookup_case_insensitive() {
        let ctx = RequestContext::new(Method::Get, "/streaming")
            .with_header("User-Agent", "Mozilla/5.0");

        assert_eq!(ctx.header("user-agent"), Some("Mozilla/5.0"));
        assert_eq!(ctx.user_agent(), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_query_flag() {
        let ctx = RequestContext::new(Method::Get, "/").with_query_string("__flight__=1");
        assert!(ctx.has_query_flag("__flight__"));
        assert!(!ctx.has_query_flag("other"));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("GET"), Some(Method::Get));
        assert_eq!(Method::parse("BREW"), None);
    }
}
