use crate::chain::AccountHandle;
use crate::error::OpError;
use crate::ops::config::PacingConfig;
use crate::ops::stats::StatsAggregator;
use crate::registry::{ActionKind, NetworkDescriptor, WeightTable};
use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use strum_macros::{Display, EnumString};
use tracing::{error, info, warn};

/// Concrete operations after composite kinds have been resolved.
#[derive(Clone, Copy, Debug, Display, EnumString, Hash, PartialEq, Eq)]
pub enum Operation {
    #[strum(serialize = "transfer")]
    Transfer,
    #[strum(serialize = "swap")]
    Swap,
    #[strum(serialize = "subscribe")]
    Subscribe,
    #[strum(serialize = "stake")]
    Stake,
    #[strum(serialize = "lend")]
    Lend,
    #[strum(serialize = "borrow")]
    Borrow,
}

/// One runnable operation. Executors live for the process lifetime and are
/// shared across wallets; state they need travels through the arguments.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, account: &dyn AccountHandle, network: &NetworkDescriptor) -> Result<(), OpError>;
}

/// Weighted draw: uniform point in `[0, total)`, then a cumulative walk.
/// A degenerate all-zero table falls back to a uniform pick.
pub fn weighted_choice<'a, T, R: Rng>(rng: &mut R, items: &'a [(T, u32)]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let total: u64 = items.iter().map(|(_, w)| *w as u64).sum();
    if total == 0 {
        return Some(&items[rng.gen_range(0..items.len())].0);
    }

    let point = rng.gen_range(0.0..total as f64);
    let mut cumulative = 0.0;
    for (item, weight) in items {
        cumulative += *weight as f64;
        if point < cumulative {
            return Some(item);
        }
    }
    items.last().map(|(item, _)| item)
}

/// Per-network action selection and dispatch. Owns the outcome discipline:
/// the total counter moves before dispatch, exactly one of succeeded or
/// failed after, and no executor error escapes past this boundary.
pub struct Scheduler {
    executors: HashMap<Operation, Arc<dyn ActionExecutor>>,
    stats: Arc<StatsAggregator>,
    weight_overrides: DashMap<String, WeightTable>,
    pacing: PacingConfig,
}

pub struct SchedulerBuilder {
    executors: HashMap<Operation, Arc<dyn ActionExecutor>>,
    stats: Option<Arc<StatsAggregator>>,
    pacing: PacingConfig,
    weights: HashMap<String, WeightTable>,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self { executors: HashMap::new(), stats: None, pacing: PacingConfig::default(), weights: HashMap::new() }
    }

    pub fn with_executor(mut self, operation: Operation, executor: Arc<dyn ActionExecutor>) -> Self {
        self.executors.insert(operation, executor);
        self
    }

    pub fn with_stats(mut self, stats: Arc<StatsAggregator>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_network_weights(mut self, network: impl Into<String>, table: WeightTable) -> Self {
        self.weights.insert(network.into(), table);
        self
    }

    pub fn build(self) -> Scheduler {
        let scheduler = Scheduler {
            executors: self.executors,
            stats: self.stats.unwrap_or_default(),
            weight_overrides: DashMap::new(),
            pacing: self.pacing,
        };
        for (network, table) in self.weights {
            scheduler.set_network_weights(network, table);
        }
        scheduler
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    /// Replace the weight table for one network at runtime. A zero-total
    /// table is rejected in favor of the network class default at use time.
    pub fn set_network_weights(&self, network: impl Into<String>, table: WeightTable) {
        self.weight_overrides.insert(network.into(), table);
    }

    fn effective_weights(&self, network: &NetworkDescriptor) -> WeightTable {
        let table = self
            .weight_overrides
            .get(&network.name)
            .map(|entry| *entry.value())
            .unwrap_or_else(|| network.class.default_weights());
        if table.is_zero() {
            let fallback = network.class.default_weights();
            warn!(network = %network.name, "weight table sums to zero, installing class default");
            self.weight_overrides.insert(network.name.clone(), fallback);
            return fallback;
        }
        table
    }

    fn resolve_operation<R: Rng>(rng: &mut R, kind: ActionKind) -> Operation {
        match kind {
            ActionKind::Transfer => Operation::Transfer,
            ActionKind::Swap => Operation::Swap,
            ActionKind::SubscribeOrStake => {
                if rng.gen_bool(0.5) { Operation::Subscribe } else { Operation::Stake }
            }
            ActionKind::LendOrBorrow => {
                if rng.gen_bool(0.5) { Operation::Lend } else { Operation::Borrow }
            }
        }
    }

    /// Choose an action for `account` on `network`, run it, and fold every
    /// outcome into a boolean. Nothing thrown below this line propagates.
    pub async fn select_and_run(&self, account: &dyn AccountHandle, network: &NetworkDescriptor) -> bool {
        let operation = {
            let weights = self.effective_weights(network);
            let entries = weights.entries();
            let mut rng = rand::thread_rng();
            let kind = match weighted_choice(&mut rng, &entries) {
                Some(kind) => *kind,
                None => return false,
            };
            Self::resolve_operation(&mut rng, kind)
        };

        self.stats.record_dispatch(account.address());

        let outcome = match self.executors.get(&operation) {
            Some(executor) => executor.execute(account, network).await,
            None => Err(OpError::Unsupported { network: network.name.clone(), what: format!("no executor registered for {operation}") }),
        };

        let success = match outcome {
            Ok(()) => {
                info!(network = %network.name, wallet = account.label(), %operation, "operation succeeded");
                true
            }
            Err(err) if err.is_fault() => {
                error!(network = %network.name, wallet = account.label(), %operation, %err, "operation failed");
                false
            }
            Err(err) if err.is_expected() => {
                info!(network = %network.name, wallet = account.label(), %operation, reason = %err, "operation skipped");
                false
            }
            Err(err) => {
                warn!(network = %network.name, wallet = account.label(), %operation, reason = %err, "operation failed");
                false
            }
        };

        self.stats.record_outcome(account.address(), success);
        success
    }

    /// Run cycles across the wallet pool with randomized think-time between
    /// operations. Wallet order is reshuffled every pass.
    pub async fn run_continuous(&self, accounts: &[Arc<dyn AccountHandle>], network: &NetworkDescriptor, cycles: usize) {
        let mut order: Vec<usize> = (0..accounts.len()).collect();
        for cycle in 0..cycles {
            {
                let mut rng = rand::thread_rng();
                order.shuffle(&mut rng);
            }
            for &index in &order {
                self.select_and_run(accounts[index].as_ref(), network).await;

                let delay_secs = {
                    let mut rng = rand::thread_rng();
                    rng.gen_range(self.pacing.delay_min_secs..=self.pacing.delay_max_secs)
                };
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            }
            info!(network = %network.name, cycle = cycle + 1, cycles, "cycle complete");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockAccount;
    use crate::constants::ChainId;
    use alloy_primitives::Address;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingExecutor {
        name: &'static str,
        calls: AtomicU32,
        outcome: fn() -> Result<(), OpError>,
    }

    impl CountingExecutor {
        fn ok(name: &'static str) -> Arc<Self> {
            Arc::new(Self { name, calls: AtomicU32::new(0), outcome: || Ok(()) })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self { name, calls: AtomicU32::new(0), outcome: || Err(OpError::NoBalance("drained".to_string())) })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl ActionExecutor for CountingExecutor {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn execute(&self, _account: &dyn AccountHandle, _network: &NetworkDescriptor) -> Result<(), OpError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            (self.outcome)()
        }
    }

    #[test]
    fn test_weighted_choice_fairness() {
        let mut rng = StdRng::seed_from_u64(1234);
        let items = [("a", 70u32), ("b", 30u32)];
        let draws = 100_000;
        let mut hits_a = 0usize;
        for _ in 0..draws {
            if *weighted_choice(&mut rng, &items).unwrap() == "a" {
                hits_a += 1;
            }
        }
        let share = hits_a as f64 / draws as f64;
        assert!((share - 0.7).abs() < 0.01, "share of a was {share}");
    }

    #[test]
    fn test_weighted_choice_all_zero_is_uniform() {
        let mut rng = StdRng::seed_from_u64(5);
        let items = [("a", 0u32), ("b", 0u32), ("c", 0u32)];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(*weighted_choice(&mut rng, &items).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_weighted_choice_empty() {
        let mut rng = StdRng::seed_from_u64(5);
        let items: [(&str, u32); 0] = [];
        assert!(weighted_choice(&mut rng, &items).is_none());
    }

    #[test]
    fn test_zero_weight_entry_never_chosen() {
        let mut rng = StdRng::seed_from_u64(9);
        let items = [("a", 100u32), ("b", 0u32)];
        for _ in 0..10_000 {
            assert_eq!(*weighted_choice(&mut rng, &items).unwrap(), "a");
        }
    }

    #[tokio::test]
    async fn test_transfer_only_weights_never_dispatch_elsewhere() {
        let transfer = CountingExecutor::ok("transfer");
        let swap = CountingExecutor::ok("swap");
        let lend = CountingExecutor::ok("lend");
        let scheduler = Scheduler::builder()
            .with_executor(Operation::Transfer, transfer.clone())
            .with_executor(Operation::Swap, swap.clone())
            .with_executor(Operation::Lend, lend.clone())
            .build();

        // transfer-oriented class default is transfer=100
        let network = NetworkDescriptor::new("Rise", ChainId::RISE, "http://x", "ETH");
        let account = MockAccount::new(Address::repeat_byte(1));

        for _ in 0..50 {
            assert!(scheduler.select_and_run(&account, &network).await);
        }

        assert_eq!(transfer.calls(), 50);
        assert_eq!(swap.calls(), 0);
        assert_eq!(lend.calls(), 0);

        let snap = scheduler.stats().snapshot();
        assert_eq!(snap.total, 50);
        assert_eq!(snap.succeeded, 50);
    }

    #[tokio::test]
    async fn test_missing_executor_is_reported_failure() {
        let scheduler = Scheduler::builder().build();
        let network = NetworkDescriptor::new("Rise", ChainId::RISE, "http://x", "ETH");
        let account = MockAccount::new(Address::repeat_byte(1));

        assert!(!scheduler.select_and_run(&account, &network).await);
        let snap = scheduler.stats().snapshot();
        assert_eq!(snap.total, 1);
        assert_eq!(snap.failed, 1);
    }

    #[tokio::test]
    async fn test_executor_error_becomes_false_and_counts() {
        let failing = CountingExecutor::failing("transfer");
        let scheduler = Scheduler::builder().with_executor(Operation::Transfer, failing.clone()).build();
        let network = NetworkDescriptor::new("Rise", ChainId::RISE, "http://x", "ETH");
        let account = MockAccount::new(Address::repeat_byte(1));

        for _ in 0..10 {
            assert!(!scheduler.select_and_run(&account, &network).await);
        }

        assert_eq!(failing.calls(), 10);
        let snap = scheduler.stats().snapshot();
        assert_eq!(snap.succeeded + snap.failed, snap.total);
        assert_eq!(snap.failed, 10);
    }

    #[tokio::test]
    async fn test_zero_weight_override_installs_class_default() {
        let transfer = CountingExecutor::ok("transfer");
        let scheduler = Scheduler::builder()
            .with_executor(Operation::Transfer, transfer.clone())
            .with_network_weights("Rise", WeightTable::default())
            .build();
        let network = NetworkDescriptor::new("Rise", ChainId::RISE, "http://x", "ETH");
        let account = MockAccount::new(Address::repeat_byte(1));

        assert!(scheduler.select_and_run(&account, &network).await);
        assert_eq!(transfer.calls(), 1);
    }

    #[test]
    fn test_composite_kinds_split_roughly_evenly() {
        let mut rng = StdRng::seed_from_u64(77);
        let mut stakes = 0;
        for _ in 0..10_000 {
            if Scheduler::resolve_operation(&mut rng, ActionKind::SubscribeOrStake) == Operation::Stake {
                stakes += 1;
            }
        }
        let share = stakes as f64 / 10_000.0;
        assert!((share - 0.5).abs() < 0.03);
    }
}
