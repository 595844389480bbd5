use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::time::Duration;

/// Lets at most one request through per window; callers wait in [`RequestThrottle::acquire`].
pub struct RequestThrottle {
    limiter: Option<DefaultDirectRateLimiter>,
    window: Duration,
}

impl RequestThrottle {
    /// A zero window disables throttling.
    pub fn new(window: Duration) -> Self {
        Self {
            limiter: Quota::with_period(window).map(RateLimiter::direct),
            window,
        }
    }

    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            if limiter.check().is_err() {
                tracing::debug!("Rate limit reached, waiting up to {:?}", self.window);
                limiter.until_ready().await;
            }
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl std::fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("window", &self.window)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_calls_are_spaced_by_window() {
        let throttle = RequestThrottle::new(Duration::from_millis(100));
        let start = Instant::now();

        for _ in 0..3 {
            throttle.acquire().await;
        }

        // first call passes immediately, the next two wait one window each
        assert!(start.elapsed() >= Duration::from_millis(190));
    }

    #[tokio::test]
    async fn test_first_call_is_not_delayed() {
        let throttle = RequestThrottle::new(Duration::from_secs(5));
        let start = Instant::now();
        throttle.acquire().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_zero_window_disables_throttling() {
        let throttle = RequestThrottle::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..10 {
            throttle.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
        assert_eq!(throttle.window(), Duration::ZERO);
    }
}
