//! Request pacing for batch workers

use std::time::Duration;

/// Minimum pause between bursts of provider requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Pause inserted after each burst
    pub min_interval: Duration,

    /// Requests allowed before pausing; `None` means one pause per batch
    pub burst: Option<usize>,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(5),
            burst: None,
        }
    }
}

impl RateLimit {
    /// No pacing at all
    pub fn none() -> Self {
        Self {
            min_interval: Duration::ZERO,
            burst: None,
        }
    }

    /// Derive pacing from a documented requests-per-second limit.
    ///
    /// Returns `None` when the rate is not positive and finite, or when the
    /// resulting interval does not fit in a `Duration`.
    pub fn per_second(requests: f64, burst: usize) -> Option<Self> {
        if !requests.is_finite() || requests <= 0.0 {
            return None;
        }
        let burst = burst.max(1);
        let min_interval = Duration::try_from_secs_f64(burst as f64 / requests).ok()?;
        Some(Self {
            min_interval,
            burst: Some(burst),
        })
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn with_burst(mut self, burst: usize) -> Self {
        self.burst = Some(burst.max(1));
        self
    }

    pub fn pacer(&self) -> Pacer {
        Pacer {
            limit: *self,
            since_pause: 0,
        }
    }
}

/// Per-worker pacing state; never shared between batches
#[derive(Debug)]
pub struct Pacer {
    limit: RateLimit,
    since_pause: usize,
}

impl Pacer {
    /// Call after every fetch attempt, successful or not
    pub async fn tick(&mut self) {
        self.since_pause += 1;
        if let Some(burst) = self.limit.burst {
            if self.since_pause >= burst {
                self.pause().await;
            }
        }
    }

    /// Call once at the end of a batch
    pub async fn finish(&mut self) {
        if self.since_pause > 0 {
            self.pause().await;
        }
    }

    async fn pause(&mut self) {
        self.since_pause = 0;
        if !self.limit.min_interval.is_zero() {
            tracing::trace!("Pacing provider requests for {:?}", self.limit.min_interval);
            tokio::time::sleep(self.limit.min_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_per_second() {
        let limit = RateLimit::per_second(1.0, 10).unwrap();
        assert_eq!(limit.min_interval, Duration::from_secs(10));
        assert_eq!(limit.burst, Some(10));

        let limit = RateLimit::per_second(100.0, 0).unwrap();
        assert_eq!(limit.burst, Some(1));
        assert_eq!(limit.min_interval, Duration::from_millis(10));
    }

    #[test]
    fn test_per_second_rejects_unusable_rates() {
        assert_eq!(RateLimit::per_second(0.0, 1), None);
        assert_eq!(RateLimit::per_second(-2.0, 1), None);
        assert_eq!(RateLimit::per_second(f64::NAN, 1), None);
        // The interval would overflow a Duration
        assert_eq!(RateLimit::per_second(1e-300, 1), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_pause_per_batch_by_default() {
        let mut pacer = RateLimit::default().pacer();
        let start = Instant::now();

        for _ in 0..7 {
            pacer.tick().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        pacer.finish().await;
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_pacing() {
        let mut pacer = RateLimit::default()
            .with_interval(Duration::from_secs(1))
            .with_burst(2)
            .pacer();
        let start = Instant::now();

        for _ in 0..5 {
            pacer.tick().await;
        }
        assert_eq!(start.elapsed(), Duration::from_secs(2));

        pacer.finish().await;
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pause_without_fetches() {
        let mut pacer = RateLimit::default().pacer();
        let start = Instant::now();
        pacer.finish().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
