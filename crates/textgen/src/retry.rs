use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::error::Result;
use crate::provider::{GeneratorInfo, TextGenerator};

#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no backoff.
    pub fn none() -> Self {
        Self { max_attempts: 1, ..Self::default() }
    }

    /// Delay before retry number `attempt` (1-based): base * 2^(attempt-1), capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Wraps a generator and retries transient failures with exponential backoff.
pub struct RetryingGenerator<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: TextGenerator> RetryingGenerator<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for RetryingGenerator<G> {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let max = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.generate(prompt, temperature).await {
                Ok(out) => return Ok(out),
                Err(e) if e.is_retryable() && attempt < max => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(attempt, max_attempts = max, ?delay, "textgen: retrying after error: {e}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn info(&self) -> GeneratorInfo {
        self.inner.info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        calls: AtomicU32,
        fail_first: u32,
        retryable: bool,
    }

    #[async_trait]
    impl TextGenerator for Flaky {
        async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.fail_first {
                if self.retryable {
                    return Err(GenerationError::Status { status: 503, body: "busy".into() });
                }
                return Err(GenerationError::Status { status: 401, body: "no key".into() });
            }
            Ok(format!("ok after {n}"))
        }

        fn info(&self) -> GeneratorInfo {
            GeneratorInfo { name: "flaky".into(), base_url: String::new(), model: String::new() }
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let p = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
        };
        assert_eq!(p.delay_for(1), Duration::from_millis(100));
        assert_eq!(p.delay_for(2), Duration::from_millis(200));
        assert_eq!(p.delay_for(3), Duration::from_millis(350));
        assert_eq!(p.delay_for(30), Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_recovers_from_transient_failures() {
        let g = RetryingGenerator::new(
            Flaky { calls: AtomicU32::new(0), fail_first: 2, retryable: true },
            fast_policy(3),
        );
        let out = g.generate("hi", 0.2).await.unwrap();
        assert_eq!(out, "ok after 3");
        assert_eq!(g.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let g = RetryingGenerator::new(
            Flaky { calls: AtomicU32::new(0), fail_first: 10, retryable: true },
            fast_policy(3),
        );
        let err = g.generate("hi", 0.2).await.unwrap_err();
        assert!(matches!(err, GenerationError::Status { status: 503, .. }));
        assert_eq!(g.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_immediately() {
        let g = RetryingGenerator::new(
            Flaky { calls: AtomicU32::new(0), fail_first: 1, retryable: false },
            fast_policy(5),
        );
        assert!(g.generate("hi", 0.2).await.is_err());
        assert_eq!(g.inner().calls.load(Ordering::SeqCst), 1);
    }
}
