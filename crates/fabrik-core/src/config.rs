// ── Lifecycle tuning ──
//
// Timeouts and poll cadence for the orchestrator. Built by
// `fabrik-config` (or by hand) and passed in; core never reads files.

use std::time::Duration;

use tokio::time::Instant;

/// Poll cadence for one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Sleep before the first refresh.
    pub delay: Duration,
    /// Minimum gap between refreshes.
    pub min_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(30),
            min_interval: Duration::from_secs(30),
        }
    }
}

/// Overall budget per lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTimeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for OperationTimeouts {
    fn default() -> Self {
        let ten_minutes = Duration::from_secs(10 * 60);
        Self {
            create: ten_minutes,
            read: ten_minutes,
            update: ten_minutes,
            delete: ten_minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    pub timeouts: OperationTimeouts,
    pub polling: PollSettings,
    /// Reserved from every budget so the caller's own deadline is not hit
    /// first.
    pub safety_margin: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            timeouts: OperationTimeouts::default(),
            polling: PollSettings::default(),
            safety_margin: Duration::from_secs(30),
        }
    }
}

/// Time left in one operation: `total - margin - elapsed`, floored at zero.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutBudget {
    started: Instant,
    total: Duration,
    margin: Duration,
}

impl TimeoutBudget {
    pub fn start(total: Duration, margin: Duration) -> Self {
        Self {
            started: Instant::now(),
            total,
            margin,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Recomputed on every call.
    pub fn remaining(&self) -> Duration {
        self.total
            .saturating_sub(self.margin)
            .saturating_sub(self.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn budget_shrinks_with_elapsed_time() {
        let budget = TimeoutBudget::start(Duration::from_secs(600), Duration::from_secs(30));
        assert_eq!(budget.remaining(), Duration::from_secs(570));

        tokio::time::advance(Duration::from_secs(70)).await;
        assert_eq!(budget.remaining(), Duration::from_secs(500));

        tokio::time::advance(Duration::from_secs(1000)).await;
        assert_eq!(budget.remaining(), Duration::ZERO);
    }

    #[test]
    fn margin_larger_than_total_saturates() {
        let budget = TimeoutBudget::start(Duration::from_secs(10), Duration::from_secs(30));
        assert_eq!(budget.remaining(), Duration::ZERO);
    }
}
