use std::time::Duration;

use async_trait::async_trait;

/// Time source for effects that wait.
///
/// Reducers take an `Arc<dyn Clock>` so tests can swap in one that returns
/// immediately.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real time via `tokio::time`.
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_waits_for_the_duration() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::from_millis(250)).await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_returns_immediately() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::ZERO).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
