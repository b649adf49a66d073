//! Per-sender command rate limiter.
//!
//! A leaky-window counter: bursts inside one window are tolerated up to the
//! threshold, after which the sender is blocked for a fixed duration no
//! matter how quiet they are afterwards.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::config::RateLimitConfig;

/// Sender's rate tracking data
#[derive(Debug, Clone)]
struct RateState {
    count: u32,
    window_start: Instant,
    blocked_until: Option<Instant>,
}

impl RateState {
    fn new(now: Instant) -> Self {
        Self {
            count: 0,
            window_start: now,
            blocked_until: None,
        }
    }

    fn reset(&mut self, now: Instant) {
        self.count = 0;
        self.window_start = now;
    }
}

/// Global rate limiter (in-memory, lock-free).
#[derive(Clone)]
pub struct RateLimiter {
    data: Arc<DashMap<String, RateState>>,
    max_messages: u32,
    interval: Duration,
    block_duration: Duration,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            max_messages: config.max_messages,
            interval: config.interval,
            block_duration: config.block_duration,
        }
    }

    /// Record a message from `sender`. Returns `true` if the sender is blocked.
    pub fn check_and_record(&self, sender: &str) -> bool {
        self.check_and_record_at(sender, Instant::now())
    }

    /// Same as [`check_and_record`](Self::check_and_record) with an explicit clock.
    pub fn check_and_record_at(&self, sender: &str, now: Instant) -> bool {
        let mut state = self
            .data
            .entry(sender.to_string())
            .or_insert_with(|| RateState::new(now));

        if let Some(until) = state.blocked_until {
            if now < until {
                return true;
            }
            debug!("Rate limit block expired for {}", sender);
            state.blocked_until = None;
            state.reset(now);
        }

        if now.duration_since(state.window_start) >= self.interval {
            state.reset(now);
        }

        state.count += 1;

        if state.count > self.max_messages {
            state.blocked_until = Some(now + self.block_duration);
            return true;
        }

        false
    }

    /// Drop senders that are neither blocked nor inside an active window.
    pub fn sweep(&self, now: Instant) {
        self.data.retain(|_, state| {
            let blocked = state.blocked_until.is_some_and(|until| now < until);
            blocked || now.duration_since(state.window_start) < self.interval
        });
    }

    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.data.len()
    }
}
