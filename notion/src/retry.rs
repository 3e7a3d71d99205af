// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// Retry policy for transient request failures.
///
/// Delays grow exponentially with the attempt number and are clamped to
/// `[min_delay, max_delay]`. The schedule is a pure function of the attempt
/// number, so tests can verify it without sleeping.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,

    /// Base multiplier for the exponential term, in seconds.
    pub multiplier: f64,

    /// Lower clamp on the computed delay.
    pub min_delay: Duration,

    /// Upper clamp on the computed delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            multiplier: 1.0,
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// A policy with the default attempt count but no waiting, for tests.
    pub fn immediate() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// The delay to wait after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.multiplier * f64::from(2u32.saturating_pow(attempt.min(31)));
        let raw = Duration::from_secs_f64(exp.max(0.0));
        raw.clamp(self.min_delay, self.max_delay)
    }
}
