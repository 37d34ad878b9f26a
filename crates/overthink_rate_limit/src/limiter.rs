//! Rate limiter built on governor and a Tokio semaphore.
//!
//! - governor (GCRA) enforces requests per minute and per day
//! - a semaphore bounds concurrent requests
//!
//! Throttling only ever waits. Nothing here retries a failed call.

use crate::Tier;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

const SECONDS_PER_DAY: u64 = 86_400;

/// Rate limiter that enforces the quotas of one tier.
///
/// # Example
///
/// ```
/// use overthink_rate_limit::{RateLimiter, TierConfig};
///
/// let tier = TierConfig {
///     name: "Tiny".to_string(),
///     rpm: Some(60),
///     rpd: None,
///     max_concurrent: Some(1),
///     models: Default::default(),
/// };
/// let limiter = RateLimiter::new(tier);
///
/// let guard = limiter.try_acquire().unwrap();
/// // The single concurrent slot is taken until the guard drops.
/// assert!(limiter.try_acquire().is_none());
/// drop(guard);
/// ```
#[derive(Clone)]
pub struct RateLimiter<T: Tier> {
    inner: T,
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    rpd_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent_semaphore: Arc<Semaphore>,
}

impl<T: Tier> RateLimiter<T> {
    /// Create a new rate limiter from a tier.
    ///
    /// Every limit the tier reports as `Some` is enforced.
    pub fn new(tier: T) -> Self {
        let rpm_limiter = tier.rpm().and_then(NonZeroU32::new).map(|n| {
            let quota = Quota::per_minute(n);
            Arc::new(GovernorRateLimiter::direct(quota))
        });

        // Daily quota replenishes evenly across the day, full burst allowed
        let rpd_limiter = tier.rpd().and_then(NonZeroU32::new).and_then(|n| {
            Quota::with_period(Duration::from_secs(SECONDS_PER_DAY) / n.get())
                .map(|quota| Arc::new(GovernorRateLimiter::direct(quota.allow_burst(n))))
        });

        let max_concurrent = tier
            .max_concurrent()
            .map(|n| n as usize)
            .unwrap_or(Semaphore::MAX_PERMITS)
            .clamp(1, Semaphore::MAX_PERMITS);
        let concurrent_semaphore = Arc::new(Semaphore::new(max_concurrent));

        Self {
            inner: tier,
            rpm_limiter,
            rpd_limiter,
            concurrent_semaphore,
        }
    }

    /// The tier this limiter enforces.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Wait until every limit allows one more request.
    ///
    /// Returns a guard that releases the concurrent slot when dropped.
    pub async fn acquire(&self) -> RateLimiterGuard {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        if let Some(limiter) = &self.rpd_limiter {
            limiter.until_ready().await;
        }

        // Concurrent slot last, to avoid holding it while waiting on quota
        let permit = self.concurrent_semaphore.clone().acquire_owned().await.ok();
        trace!(tier = self.inner.name(), "Rate limit slot acquired");

        RateLimiterGuard { _permit: permit }
    }

    /// Try to acquire without waiting.
    ///
    /// Returns `None` if any limit would block.
    pub fn try_acquire(&self) -> Option<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.check().ok()?;
        }

        if let Some(limiter) = &self.rpd_limiter {
            limiter.check().ok()?;
        }

        let permit = self.concurrent_semaphore.clone().try_acquire_owned().ok()?;

        Some(RateLimiterGuard {
            _permit: Some(permit),
        })
    }
}

/// RAII guard for the rate limiter.
///
/// Releases the concurrent request slot when dropped.
pub struct RateLimiterGuard {
    _permit: Option<OwnedSemaphorePermit>,
}
