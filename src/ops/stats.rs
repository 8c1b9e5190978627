use alloy_primitives::Address;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::info;

/// Raw counters for one scope. `total` moves before dispatch, exactly one of
/// the other two after, so `succeeded + failed == total` holds whenever no
/// operation is in flight.
#[derive(Debug, Default)]
pub struct OpCounters {
    total: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl OpCounters {
    pub fn record_dispatch(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, success: bool) {
        if success {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn totals(&self) -> (u64, u64, u64) {
        (self.total.load(Ordering::Relaxed), self.succeeded.load(Ordering::Relaxed), self.failed.load(Ordering::Relaxed))
    }
}

/// Point-in-time view with the derived figures already computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsSnapshot {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub throughput_per_minute: f64,
    pub success_rate: f64,
}

/// Global and per-account operation counters. Recording is lock-free; the
/// periodic reporter and `snapshot` only read.
#[derive(Debug)]
pub struct StatsAggregator {
    global: OpCounters,
    per_account: DashMap<Address, Arc<OpCounters>>,
    started_at: Instant,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self { global: OpCounters::default(), per_account: DashMap::new(), started_at: Instant::now() }
    }

    fn account_counters(&self, account: Address) -> Arc<OpCounters> {
        self.per_account.entry(account).or_default().clone()
    }

    pub fn record_dispatch(&self, account: Address) {
        self.global.record_dispatch();
        self.account_counters(account).record_dispatch();
    }

    pub fn record_outcome(&self, account: Address, success: bool) {
        self.global.record_outcome(success);
        self.account_counters(account).record_outcome(success);
    }

    fn derive(&self, total: u64, succeeded: u64, failed: u64) -> StatsSnapshot {
        let minutes = self.started_at.elapsed().as_secs_f64() / 60.0;
        StatsSnapshot {
            total,
            succeeded,
            failed,
            throughput_per_minute: if minutes > 0.0 { total as f64 / minutes } else { 0.0 },
            success_rate: if total > 0 { succeeded as f64 / total as f64 } else { 0.0 },
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let (total, succeeded, failed) = self.global.totals();
        self.derive(total, succeeded, failed)
    }

    pub fn account_snapshot(&self, account: Address) -> StatsSnapshot {
        let (total, succeeded, failed) = match self.per_account.get(&account) {
            Some(counters) => counters.totals(),
            None => (0, 0, 0),
        };
        self.derive(total, succeeded, failed)
    }

    pub fn tracked_accounts(&self) -> usize {
        self.per_account.len()
    }

    /// Background reporter logging the derived figures on a fixed cadence.
    /// Read-only; runs until the handle is aborted.
    pub fn spawn_reporter(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let snap = self.snapshot();
                info!(
                    total = snap.total,
                    succeeded = snap.succeeded,
                    failed = snap.failed,
                    throughput_per_minute = format!("{:.2}", snap.throughput_per_minute),
                    success_rate = format!("{:.1}%", snap.success_rate * 100.0),
                    accounts = self.tracked_accounts(),
                    "operation statistics"
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conservation_after_each_outcome() {
        let stats = StatsAggregator::new();
        let wallet = Address::repeat_byte(1);

        for i in 0..100 {
            stats.record_dispatch(wallet);
            stats.record_outcome(wallet, i % 3 != 0);

            let snap = stats.snapshot();
            assert_eq!(snap.succeeded + snap.failed, snap.total);
        }

        let snap = stats.snapshot();
        assert_eq!(snap.total, 100);
        assert_eq!(snap.failed, 34);
        assert!((snap.success_rate - 0.66).abs() < 0.01);
    }

    #[test]
    fn test_per_account_isolation() {
        let stats = StatsAggregator::new();
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);

        stats.record_dispatch(a);
        stats.record_outcome(a, true);
        stats.record_dispatch(b);
        stats.record_outcome(b, false);

        assert_eq!(stats.account_snapshot(a).succeeded, 1);
        assert_eq!(stats.account_snapshot(b).failed, 1);
        assert_eq!(stats.snapshot().total, 2);
        assert_eq!(stats.tracked_accounts(), 2);
    }

    #[test]
    fn test_untracked_account_is_zeroed() {
        let stats = StatsAggregator::new();
        let snap = stats.account_snapshot(Address::repeat_byte(9));
        assert_eq!(snap.total, 0);
        assert_eq!(snap.success_rate, 0.0);
    }
}
