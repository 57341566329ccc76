//! 원격 호출 재시도 정책.

use std::future::Future;
use std::time::Duration;

use ashare_core::TushareConfig;
use tracing::{error, warn};

use crate::error::Result;

/// 재시도 정책.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (첫 요청 포함).
    pub max_attempts: u32,
    /// 첫 재시도 전 대기 시간.
    pub initial_delay: Duration,
    /// 재시도마다 곱해지는 배수.
    pub backoff_factor: u32,
    /// 최대 대기 시간.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            backoff_factor: 2,
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Tushare 설정에서 정책을 만듭니다.
    pub fn from_config(config: &TushareConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            initial_delay: Duration::from_millis(config.retry_delay_ms),
            ..Self::default()
        }
    }

    /// 대기 없이 재시도하는 정책 (테스트용).
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::ZERO,
            backoff_factor: 1,
            max_delay: Duration::ZERO,
        }
    }

    /// 실패한 시도(0부터) 이후의 대기 시간.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.backoff_factor.saturating_pow(attempt);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// 비동기 작업을 정책에 따라 재시도합니다.
///
/// 재시도할 수 없는 오류([`crate::DataError::is_retryable`]가 false)는 바로 반환합니다.
/// 각 실패마다 남은 횟수와 함께 `warn!`을, 마지막 실패에는 `error!`를 남깁니다.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                let remaining = max_attempts - attempt;

                if remaining == 0 || !e.is_retryable() {
                    error!(target_name = label, attempts = attempt, error = %e, "Request failed");
                    return Err(e);
                }

                warn!(
                    target_name = label,
                    remaining = remaining,
                    error = %e,
                    "Request failed, retrying"
                );
                tokio::time::sleep(policy.delay_for_attempt(attempt - 1)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_backoff_and_cap() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_millis(100),
            backoff_factor: 2,
            max_delay: Duration::from_millis(300),
        };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(300));
    }

    #[test]
    fn test_from_config() {
        let config = TushareConfig::default();
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = retry(&RetryPolicy::immediate(3), "000001.SZ", move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(DataError::FetchError("connection reset".into()))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = retry(&RetryPolicy::immediate(3), "000001.SZ", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(DataError::FetchError("timeout".into()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_fast() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = retry(&RetryPolicy::immediate(3), "000001.SZ", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(DataError::ParseError("bad row".into()))
        })
        .await;

        assert!(matches!(result, Err(DataError::ParseError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
