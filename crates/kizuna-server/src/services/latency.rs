//! Latency Guard - Timeout with fallback payload
//!
//! Bounds the worst-case latency of a protected tool operation so a
//! live voice conversation never stalls on a slow backend. On deadline
//! the guarded future is dropped and the fallback payload is returned,
//! marked so the conversation layer knows it is degraded data.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use kizuna::DomainError;

/// Default per-tool latency budget
pub const DEFAULT_TOOL_BUDGET: Duration = Duration::from_secs(2);

/// Run `fut` under `budget`. On deadline the operation is cancelled and
/// `fallback` is returned augmented with `timeout`, `cache_friendly`,
/// and `error` markers. Inner errors pass through untouched.
pub async fn with_fallback<F>(
    budget: Duration,
    fallback: Value,
    op_name: &str,
    fut: F,
) -> Result<Value, DomainError>
where
    F: Future<Output = Result<Value, DomainError>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                "Operation {} exceeded {}ms budget, serving fallback",
                op_name,
                budget.as_millis()
            );
            let mut payload = match fallback {
                Value::Object(map) => map,
                other => {
                    let mut map = serde_json::Map::new();
                    map.insert("fallback".to_string(), other);
                    map
                }
            };
            payload.insert("timeout".to_string(), Value::Bool(true));
            payload.insert("cache_friendly".to_string(), Value::Bool(true));
            payload.insert(
                "error".to_string(),
                Value::String(format!("{} timed out after {}ms", op_name, budget.as_millis())),
            );
            Ok(Value::Object(payload))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fast_operation_passes_through() {
        let result = with_fallback(
            Duration::from_millis(100),
            json!({"mood": "neutral"}),
            "fast_op",
            async { Ok(json!({"mood": "warm"})) },
        )
        .await
        .unwrap();

        assert_eq!(result["mood"], "warm");
        assert!(result.get("timeout").is_none());
    }

    #[tokio::test]
    async fn test_slow_operation_serves_marked_fallback() {
        let result = with_fallback(
            Duration::from_millis(10),
            json!({"mood": "neutral"}),
            "slow_op",
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(json!({"mood": "warm"}))
            },
        )
        .await
        .unwrap();

        assert_eq!(result["mood"], "neutral");
        assert_eq!(result["timeout"], true);
        assert_eq!(result["cache_friendly"], true);
        assert!(result["error"].as_str().unwrap().contains("slow_op"));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result = with_fallback(
            Duration::from_millis(100),
            json!({}),
            "failing_op",
            async { Err(DomainError::ExternalService("backend down".to_string())) },
        )
        .await;

        assert!(result.is_err());
    }
}
