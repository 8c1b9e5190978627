use crate::constants::GWEI;
use crate::error::ChainError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Live fee source, one per deployment. Implementations typically poll the
/// RPC endpoint; the core never talks to an endpoint directly.
#[async_trait]
pub trait GasOracle: Send + Sync {
    async fn suggested_fee_wei(&self, chain_id: u64) -> Result<u128, ChainError>;
}

#[derive(Clone, Debug)]
struct CachedFee {
    wei: u128,
    fetched_at: Instant,
}

/// Applies the crate's fee discipline on top of a raw oracle: a safety
/// margin over the suggestion, per-chain minimum floors, a fallback when the
/// oracle is unreachable, and a short cache so hot loops do not hammer it.
pub struct FeePolicy {
    oracle: Arc<dyn GasOracle>,
    floors_wei: HashMap<u64, u128>,
    fallback_wei: u128,
    margin_pct: u32,
    cache_ttl: Duration,
    cache: DashMap<u64, CachedFee>,
}

impl FeePolicy {
    pub fn new(oracle: Arc<dyn GasOracle>) -> Self {
        Self {
            oracle,
            floors_wei: HashMap::new(),
            fallback_wei: 10 * GWEI,
            margin_pct: 15,
            cache_ttl: Duration::from_secs(30),
            cache: DashMap::new(),
        }
    }

    pub fn with_floor(mut self, chain_id: u64, floor_wei: u128) -> Self {
        self.floors_wei.insert(chain_id, floor_wei);
        self
    }

    pub fn with_fallback(mut self, fallback_wei: u128) -> Self {
        self.fallback_wei = fallback_wei;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Effective gas price for a submission on `chain_id`. Infallible: an
    /// oracle failure degrades to the fallback price, not to a dropped cycle.
    pub async fn fee_for(&self, chain_id: u64) -> u128 {
        if let Some(cached) = self.cache.get(&chain_id) {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                return cached.wei;
            }
        }

        let raw = match self.oracle.suggested_fee_wei(chain_id).await {
            Ok(wei) => wei,
            Err(err) => {
                warn!(chain_id, %err, fallback_wei = self.fallback_wei, "gas oracle unavailable, using fallback price");
                self.fallback_wei
            }
        };

        let with_margin = raw.saturating_mul(100 + self.margin_pct as u128) / 100;
        let floor = self.floors_wei.get(&chain_id).copied().unwrap_or(0);
        let effective = with_margin.max(floor);

        self.cache.insert(chain_id, CachedFee { wei: effective, fetched_at: Instant::now() });
        effective
    }
}
