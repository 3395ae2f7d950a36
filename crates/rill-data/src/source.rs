//! Data source trait and the resolve loop.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DataError;
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

/// An async source of boundary data.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Source name, used for timing keys and error context.
    fn name(&self) -> &str;

    /// Load the data.
    async fn load(&self) -> Result<Value, DataError>;
}

/// Resolve a source under timeout and retry policies.
///
/// Each attempt runs under `per_attempt`; the whole loop, backoff sleeps
/// included, runs under `total`.
pub async fn resolve_with_policy(
    source: &dyn DataSource,
    timeout: &TimeoutConfig,
    retry: &RetryPolicy,
) -> Result<Value, DataError> {
    let started = Instant::now();
    let mut attempt: u32 = 0;
    let mut last_error = String::new();

    loop {
        if started.elapsed() >= timeout.total {
            return Err(DataError::Timeout(timeout.total));
        }

        match tokio::time::timeout(timeout.per_attempt, source.load()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => last_error = e.to_string(),
            Err(_) => last_error = format!("attempt timeout after {:?}", timeout.per_attempt),
        }

        if !retry.should_retry(attempt) {
            return Err(DataError::Exhausted {
                attempts: attempt + 1,
                last: last_error,
            });
        }

        tokio::time::sleep(retry.backoff.delay_for_attempt(attempt)).await;
        attempt += 1;
    }
}

/// Resolve a source under policies and deserialize the payload.
pub async fn resolve_typed<T>(
    source: &dyn DataSource,
    timeout: &TimeoutConfig,
    retry: &RetryPolicy,
) -> Result<T, DataError>
where
    T: serde::de::DeserializeOwned,
{
    let value = resolve_with_policy(source, timeout, retry).await?;
    serde_json::from_value(value).map_err(|e| DataError::Deserialization(e.to_string()))
}

/// In-memory source with an optional artificial delay.
///
/// Used by the demo pages and tests to model a slow upstream dependency.
pub struct MemorySource {
    name: String,
    value: Value,
    delay: Duration,
}

impl MemorySource {
    /// Create a source returning `value` immediately.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            delay: Duration::ZERO,
        }
    }

    /// Delay each load by the given duration.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl DataSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Value, DataError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingSource {
        fail_times: std::sync::atomic::AtomicU32,
    }

    #[async_trait]
    impl DataSource for FailingSource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn load(&self) -> Result<Value, DataError> {
            use std::sync::atomic::Ordering;
            if self.fail_times.load(Ordering::SeqCst) > 0 {
                self.fail_times.fetch_sub(1, Ordering::SeqCst);
                return Err(DataError::Source(anyhow::anyhow!("upstream hiccup")));
            }
            Ok(json!({"ok": true}))
        }
    }

    #[tokio::test]
    async fn test_memory_source_returns_value() {
        let source = MemorySource::new("fixture", json!({"count": 3}));
        let value = source.load().await.unwrap();
        assert_eq!(value["count"], 3);
    }

    #[tokio::test]
    async fn test_resolve_retries_until_success() {
        let source = FailingSource {
            fail_times: std::sync::atomic::AtomicU32::new(2),
        };
        let retry = RetryPolicy::new(3).with_backoff(crate::BackoffStrategy::None);

        let value = resolve_with_policy(&source, &TimeoutConfig::default(), &retry)
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_resolve_exhausts_retries() {
        let source = FailingSource {
            fail_times: std::sync::atomic::AtomicU32::new(10),
        };
        let retry = RetryPolicy::new(1).with_backoff(crate::BackoffStrategy::None);

        let err = resolve_with_policy(&source, &TimeoutConfig::default(), &retry)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Exhausted { attempts: 2, .. }));
    }

    #[derive(Debug, serde::Deserialize)]
    struct CountPayload {
        count: u32,
    }

    #[tokio::test]
    async fn test_resolve_typed_deserializes_payload() {
        let source = MemorySource::new("typed", json!({"count": 3}));
        let payload: CountPayload =
            resolve_typed(&source, &TimeoutConfig::default(), &RetryPolicy::none())
                .await
                .unwrap();
        assert_eq!(payload.count, 3);
    }

    #[tokio::test]
    async fn test_resolve_typed_reports_shape_mismatch() {
        let source = MemorySource::new("typed", json!({"count": "three"}));
        let err = resolve_typed::<CountPayload>(
            &source,
            &TimeoutConfig::default(),
            &RetryPolicy::none(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DataError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_resolve_times_out_slow_source() {
        let source =
            MemorySource::new("slow", json!(null)).with_delay(Duration::from_millis(200));
        let timeout = TimeoutConfig::new(Duration::from_millis(20), Duration::from_millis(50));
        let retry = RetryPolicy::none();

        let err = resolve_with_policy(&source, &timeout, &retry)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::Exhausted { .. } | DataError::Timeout(_)
        ));
    }
}
