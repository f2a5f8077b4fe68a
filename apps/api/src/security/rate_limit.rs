//! Per-client sliding-window rate limiter.
//!
//! Each key keeps the timestamps of its admitted requests inside the current
//! window. A request is admitted while fewer than `max_requests` remain after
//! expired timestamps are dropped. The store is owned by `AppState` and shared
//! across handlers behind an `Arc`.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::ConnectInfo;

/// Requests allowed per window for one route family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: usize,
    pub window: Duration,
}

impl RateLimit {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

/// Admitted timestamps for one key, plus the window they were admitted under.
#[derive(Debug)]
struct Bucket {
    window: Duration,
    stamps: VecDeque<Instant>,
}

impl Bucket {
    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.stamps.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }

    fn is_stale(&self, now: Instant) -> bool {
        self.stamps
            .back()
            .map_or(true, |&newest| now.saturating_duration_since(newest) >= self.window)
    }
}

#[derive(Debug, Default)]
struct Buckets {
    by_key: HashMap<String, Bucket>,
    last_sweep: Option<Instant>,
}

impl Buckets {
    /// Drops every key whose newest stamp has left its window. Runs at most
    /// once per window of the calling limit.
    fn sweep(&mut self, now: Instant, every: Duration) {
        let due = self
            .last_sweep
            .map_or(true, |last| now.saturating_duration_since(last) >= every);
        if !due {
            return;
        }
        self.by_key.retain(|_, bucket| !bucket.is_stale(now));
        self.last_sweep = Some(now);
    }
}

#[derive(Debug, Default)]
pub struct RateLimiter {
    buckets: Mutex<Buckets>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request for `key` and returns whether it is allowed.
    pub fn check(&self, key: &str, limit: RateLimit) -> bool {
        self.check_at(key, limit, Instant::now())
    }

    pub fn check_at(&self, key: &str, limit: RateLimit, now: Instant) -> bool {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        buckets.sweep(now, limit.window);

        let bucket = buckets
            .by_key
            .entry(key.to_string())
            .or_insert_with(|| Bucket {
                window: limit.window,
                stamps: VecDeque::new(),
            });
        bucket.window = limit.window;
        bucket.prune(now);

        if bucket.stamps.len() >= limit.max_requests {
            if bucket.stamps.is_empty() {
                buckets.by_key.remove(key);
            }
            return false;
        }

        bucket.stamps.push_back(now);
        true
    }

    /// Number of keys currently holding state.
    pub fn tracked_keys(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .by_key
            .len()
    }
}

/// Rate-limit key for a route family and client address. Requests without
/// connection info share one "unknown" bucket.
pub fn client_key(scope: &str, connect_info: Option<ConnectInfo<SocketAddr>>) -> String {
    match connect_info {
        Some(ConnectInfo(addr)) => format!("{scope}:{}", addr.ip()),
        None => format!("{scope}:unknown"),
    }
}
