//! Per-client request admission
//!
//! Each client IP gets a token bucket of `capacity` tokens. The bucket is
//! refilled to full once per elapsed `refill_every` period; a request with no
//! token left is rejected with 429. Buckets idle for a whole period are
//! dropped when a new client arrives.

use crate::error::AppError;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

pub type SharedRateLimiter = Arc<RateLimiter>;

#[derive(Debug, Clone, Copy)]
struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    refill_every: Duration,
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
}

impl RateLimiter {
    pub fn new(capacity: u32, refill_every: Duration) -> Self {
        Self {
            capacity,
            refill_every,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Take one token for `client`; false when its bucket is empty
    pub async fn try_acquire(&self, client: IpAddr) -> bool {
        self.try_acquire_at(client, Instant::now()).await
    }

    async fn try_acquire_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut buckets = self.buckets.lock().await;
        if !buckets.contains_key(&client) {
            // An idle bucket would be full on its next use anyway
            let refill_every = self.refill_every;
            buckets.retain(|_, b| now.saturating_duration_since(b.last_refill) < refill_every);
        }
        let bucket = buckets.entry(client).or_insert(Bucket {
            tokens: self.capacity,
            last_refill: now,
        });

        if !self.refill_every.is_zero() {
            let elapsed = now.saturating_duration_since(bucket.last_refill);
            let periods = elapsed.as_nanos() / self.refill_every.as_nanos();
            if periods > 0 {
                bucket.tokens = self.capacity;
                // Keep refill boundaries aligned to the first request
                bucket.last_refill = u32::try_from(periods)
                    .ok()
                    .and_then(|p| self.refill_every.checked_mul(p))
                    .and_then(|d| bucket.last_refill.checked_add(d))
                    .unwrap_or(now);
            }
        } else {
            bucket.tokens = self.capacity;
        }

        if bucket.tokens > 0 {
            bucket.tokens -= 1;
            true
        } else {
            false
        }
    }
}

/// Axum middleware: reject requests from clients that ran out of tokens
pub async fn rate_limit(
    State(limiter): State<SharedRateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if limiter.try_acquire(client).await {
        return next.run(request).await;
    }

    warn!(%client, path = %request.uri().path(), "Rate limit exceeded");
    AppError::RateLimit.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[tokio::test]
    async fn test_capacity_is_enforced_per_client() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.try_acquire_at(ip(1), now).await);
        assert!(limiter.try_acquire_at(ip(1), now).await);
        assert!(!limiter.try_acquire_at(ip(1), now).await);

        // Another client has its own bucket
        assert!(limiter.try_acquire_at(ip(2), now).await);
    }

    #[tokio::test]
    async fn test_bucket_refills_after_interval() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.try_acquire_at(ip(1), now).await);
        assert!(!limiter.try_acquire_at(ip(1), now + Duration::from_secs(59)).await);
        assert!(limiter.try_acquire_at(ip(1), now + Duration::from_secs(60)).await);
        assert!(!limiter.try_acquire_at(ip(1), now + Duration::from_secs(61)).await);
        assert!(limiter.try_acquire_at(ip(1), now + Duration::from_secs(125)).await);
    }

    #[tokio::test]
    async fn test_refill_does_not_exceed_capacity() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));
        let now = Instant::now();

        assert!(limiter.try_acquire_at(ip(1), now).await);
        let later = now + Duration::from_secs(10);
        assert!(limiter.try_acquire_at(ip(1), later).await);
        assert!(limiter.try_acquire_at(ip(1), later).await);
        assert!(!limiter.try_acquire_at(ip(1), later).await);
    }

    #[tokio::test]
    async fn test_idle_buckets_are_evicted() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.try_acquire_at(ip(1), now).await);
        assert!(limiter.try_acquire_at(ip(2), now + Duration::from_secs(30)).await);
        assert_eq!(limiter.buckets.lock().await.len(), 2);

        // ip(1) has been idle a full period, ip(2) has not
        assert!(limiter.try_acquire_at(ip(3), now + Duration::from_secs(61)).await);
        {
            let buckets = limiter.buckets.lock().await;
            assert_eq!(buckets.len(), 2);
            assert!(!buckets.contains_key(&ip(1)));
            assert!(buckets.contains_key(&ip(2)));
        }

        // ip(2) is still limited within its period
        assert!(!limiter.try_acquire_at(ip(2), now + Duration::from_secs(62)).await);
    }

    #[tokio::test]
    async fn test_zero_capacity_rejects_everything() {
        let limiter = RateLimiter::new(0, Duration::from_secs(60));
        assert!(!limiter.try_acquire(ip(1)).await);
    }
}
