//! Sliding-window rate limiting.
//!
//! The quota applies to every interval of `window_ms` ending at "now", not to
//! fixed buckets: a burst straddling a bucket boundary is still limited
//! because pruning is relative to the current time.

use crate::request::ServiceType;
use serde::{Deserialize, Serialize};

/// Storage key for a subject/service pair: `rateLimit:{subjectId}:{serviceType}`.
pub fn rate_limit_key(subject_id: &str, service_type: ServiceType) -> String {
    format!("rateLimit:{}:{}", subject_id, service_type.as_str())
}

/// Counter state at the moment of a decision, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Accepted requests still inside the window
    pub request_count: u32,
    pub limit: u32,
    pub window_ms: u64,
    pub window_start: u64,
    pub now: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed(RateLimitSnapshot),
    Denied(RateLimitSnapshot),
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed(_))
    }

    pub fn snapshot(&self) -> &RateLimitSnapshot {
        match self {
            RateLimitDecision::Allowed(s) | RateLimitDecision::Denied(s) => s,
        }
    }
}

/// Sliding-window quota: at most `max_per_window` acceptances in any
/// `window_ms`-wide interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidingWindow {
    pub window_ms: u64,
    pub max_per_window: u32,
}

impl SlidingWindow {
    pub fn new(window_ms: u64, max_per_window: u32) -> Self {
        Self {
            window_ms,
            max_per_window,
        }
    }

    /// Prune timestamps that fell out of the window, then accept `now` if
    /// there is room. `timestamps` is updated in place (ordered, oldest
    /// first) whether or not the call is accepted.
    pub fn try_acquire(&self, timestamps: &mut Vec<u64>, now: u64) -> RateLimitDecision {
        timestamps.retain(|&t| now.saturating_sub(t) < self.window_ms);

        let snapshot = |count: usize| RateLimitSnapshot {
            request_count: count as u32,
            limit: self.max_per_window,
            window_ms: self.window_ms,
            window_start: now.saturating_sub(self.window_ms),
            now,
        };

        if timestamps.len() < self.max_per_window as usize {
            timestamps.push(now);
            RateLimitDecision::Allowed(snapshot(timestamps.len()))
        } else {
            RateLimitDecision::Denied(snapshot(timestamps.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(
            rate_limit_key("s-7", ServiceType::LessonPlan),
            "rateLimit:s-7:lesson_plan"
        );
    }

    #[test]
    fn test_documented_example() {
        let window = SlidingWindow::new(60_000, 3);
        let mut log = Vec::new();

        assert!(window.try_acquire(&mut log, 0).is_allowed());
        assert!(window.try_acquire(&mut log, 10).is_allowed());
        assert!(window.try_acquire(&mut log, 20).is_allowed());

        let denied = window.try_acquire(&mut log, 30);
        assert!(!denied.is_allowed());
        assert_eq!(denied.snapshot().request_count, 3);
        assert_eq!(log, vec![0, 10, 20]);

        assert!(window.try_acquire(&mut log, 61_000).is_allowed());
        assert_eq!(log, vec![61_000]);
    }

    #[test]
    fn test_boundary_burst_is_limited() {
        let window = SlidingWindow::new(1_000, 2);
        let mut log = Vec::new();

        assert!(window.try_acquire(&mut log, 999).is_allowed());
        assert!(window.try_acquire(&mut log, 999).is_allowed());
        // A fixed bucket would reset at 1000; the sliding window does not.
        assert!(!window.try_acquire(&mut log, 1_000).is_allowed());
        assert!(!window.try_acquire(&mut log, 1_998).is_allowed());
        assert!(window.try_acquire(&mut log, 1_999).is_allowed());
    }

    #[test]
    fn test_zero_quota_denies_everything() {
        let window = SlidingWindow::new(1_000, 0);
        let mut log = Vec::new();
        assert!(!window.try_acquire(&mut log, 5).is_allowed());
        assert!(log.is_empty());
    }

    #[test]
    fn test_no_window_interval_exceeds_quota() {
        let window = SlidingWindow::new(500, 4);
        let mut log = Vec::new();
        let mut accepted = Vec::new();

        // Deterministic pseudo-random, non-decreasing call times
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        let mut now = 0u64;
        for _ in 0..2_000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            now += (seed >> 33) % 120;
            if window.try_acquire(&mut log, now).is_allowed() {
                accepted.push(now);
            }
        }

        assert!(!accepted.is_empty());
        for (i, &start) in accepted.iter().enumerate() {
            let in_window = accepted[i..]
                .iter()
                .take_while(|&&t| t < start + window.window_ms)
                .count();
            assert!(in_window <= window.max_per_window as usize, "window at {start}");
        }
    }
}
