use crate::ops::amount::AmountPolicy;
use crate::registry::{NetworkDescriptor, WeightTable};
use crate::utils::config_loader::{LoadConfigError, load_from_file};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Randomized think-time between operations and the stats cadence.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PacingConfig {
    pub delay_min_secs: u64,
    pub delay_max_secs: u64,
    pub stats_interval_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { delay_min_secs: 15, delay_max_secs: 25, stats_interval_secs: 30 }
    }
}

impl PacingConfig {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs)
    }
}

/// Per-operation receipt deadlines. Lending waits longest; those pools are
/// the slowest contracts on the target networks.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    pub transfer_secs: u64,
    pub swap_secs: u64,
    pub lending_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self { transfer_secs: 120, swap_secs: 180, lending_secs: 240 }
    }
}

impl ConfirmationConfig {
    pub fn transfer(&self) -> Duration {
        Duration::from_secs(self.transfer_secs)
    }

    pub fn swap(&self) -> Duration {
        Duration::from_secs(self.swap_secs)
    }

    pub fn lending(&self) -> Duration {
        Duration::from_secs(self.lending_secs)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AmountSection {
    #[serde(default)]
    pub native: AmountPolicy,
    #[serde(default)]
    pub token: AmountPolicy,
}

/// Top-level TOML configuration. Everything downstream receives these values
/// already parsed; no module reads files or environment on its own.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CyclerConfig {
    #[serde(default)]
    pub networks: Vec<NetworkDescriptor>,
    /// Per-network weight overrides, keyed by network name.
    #[serde(default)]
    pub weights: HashMap<String, WeightTable>,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
    #[serde(default)]
    pub amounts: AmountSection,
}

impl CyclerConfig {
    pub async fn load(file_name: impl Into<String>) -> Result<Self, LoadConfigError> {
        load_from_file(file_name.into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CyclerConfig::default();
        assert_eq!(config.pacing.delay_min_secs, 15);
        assert_eq!(config.pacing.delay_max_secs, 25);
        assert_eq!(config.confirmation.lending(), Duration::from_secs(240));
        assert!(config.networks.is_empty());
    }

    #[test]
    fn test_parse_full_document() {
        let raw = r#"
            [pacing]
            delay_min_secs = 5
            delay_max_secs = 9
            stats_interval_secs = 10

            [weights.Pharos]
            subscribe_stake = 30
            lend_borrow = 70

            [[networks]]
            name = "Pharos"
            chain_id = 688689
            rpc_endpoint = "https://rpc.pharos.example"
            native_symbol = "PHRS"

            [networks.contracts]
            padded_pool_router = "0x1E656B2C6B6e91ef6E6A2B16475Df7b7D223e3c2"

            [[networks.tokens]]
            address = "0x4200000000000000000000000000000000000006"
            symbol = "WETH"
            decimals = 18
        "#;
        let config: CyclerConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.networks.len(), 1);
        assert_eq!(config.networks[0].tokens.len(), 1);
        assert_eq!(config.weights["Pharos"].lend_borrow, 70);
        assert_eq!(config.pacing.delay_max_secs, 9);
    }
}
