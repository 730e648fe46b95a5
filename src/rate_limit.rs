use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory fixed-window quota keyed by caller IP.
///
/// Counters live only in this process: restarts reset them and multiple
/// server instances do not share them. That is the accepted behavior, not a
/// durability guarantee.
pub struct RateLimiter {
    points: u32,
    window: Duration,
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
}

struct Bucket {
    consumed: u32,
    window_start: Instant,
}

impl RateLimiter {
    pub fn new(points: u32, window: Duration) -> Self {
        Self {
            points,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Consumes `cost` units for `ip`, returning whether the quota allows it.
    /// A rejected call consumes nothing.
    pub fn try_consume(&self, ip: IpAddr, cost: u32) -> bool {
        self.try_consume_at(ip, cost, Instant::now())
    }

    fn try_consume_at(&self, ip: IpAddr, cost: u32, now: Instant) -> bool {
        let mut buckets = self.buckets.lock().unwrap();
        let bucket = buckets.entry(ip).or_insert(Bucket {
            consumed: 0,
            window_start: now,
        });

        if now.duration_since(bucket.window_start) >= self.window {
            bucket.consumed = 0;
            bucket.window_start = now;
        }

        match bucket.consumed.checked_add(cost) {
            Some(total) if total <= self.points => {
                bucket.consumed = total;
                true
            }
            _ => false,
        }
    }

    /// Drops buckets whose window has fully elapsed. Returns how many were
    /// removed; meant for the periodic sweep.
    pub fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().unwrap();

        let before = buckets.len();
        buckets.retain(|_, bucket| now.duration_since(bucket.window_start) < self.window);
        before - buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn allows_up_to_quota_then_rejects() {
        let limiter = RateLimiter::new(20, Duration::from_secs(60));

        for _ in 0..20 {
            assert!(limiter.try_consume(ip(1), 1));
        }
        assert!(!limiter.try_consume(ip(1), 1));
    }

    #[test]
    fn rejection_consumes_nothing() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));

        assert!(limiter.try_consume(ip(1), 4));
        assert!(!limiter.try_consume(ip(1), 2));
        // One unit is still available
        assert!(limiter.try_consume(ip(1), 1));
    }

    #[test]
    fn quotas_are_per_ip() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.try_consume(ip(1), 1));
        assert!(limiter.try_consume(ip(2), 1));
        assert!(!limiter.try_consume(ip(1), 1));
    }

    #[test]
    fn window_elapse_resets_the_bucket() {
        let window = Duration::from_secs(60);
        let limiter = RateLimiter::new(1, window);
        let start = Instant::now();

        assert!(limiter.try_consume_at(ip(1), 1, start));
        assert!(!limiter.try_consume_at(ip(1), 1, start + window / 2));
        assert!(limiter.try_consume_at(ip(1), 1, start + window));
    }

    #[test]
    fn prune_removes_only_expired_buckets() {
        let window = Duration::from_millis(10);
        let limiter = RateLimiter::new(1, window);

        limiter.try_consume(ip(1), 1);
        assert_eq!(limiter.prune_expired(), 0);

        std::thread::sleep(window * 2);
        assert_eq!(limiter.prune_expired(), 1);
    }
}
