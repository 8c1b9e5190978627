use crate::chain::{AccountHandle, FeePolicy, TxRequest};
use crate::constants::{FallbackContract, GasLimit, Selector, VARIABLE_INTEREST_MODE};
use crate::error::OpError;
use crate::ops::allowance::AllowanceManager;
use crate::ops::amount::resolve_decimals;
use crate::ops::scheduler::ActionExecutor;
use crate::registry::{NetworkDescriptor, Token};
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LendingMode {
    Supply,
    Borrow,
}

/// Human-unit bounds for one collateral asset.
#[derive(Clone, Copy, Debug)]
pub struct TokenRange {
    pub supply_min: f64,
    pub supply_max: f64,
    pub borrow_min: f64,
    pub borrow_max: f64,
}

/// Built-in ranges for the assets the lending pool actually lists.
pub fn default_token_ranges() -> HashMap<String, TokenRange> {
    HashMap::from([
        ("WBTC".to_string(), TokenRange { supply_min: 0.00015, supply_max: 0.0015, borrow_min: 0.00005, borrow_max: 0.0002 }),
        ("WETH".to_string(), TokenRange { supply_min: 0.0035, supply_max: 0.04, borrow_min: 0.0009, borrow_max: 0.0065 }),
    ])
}

/// Draw in `[min, max]` floored to 1e-8, the pool's accounting granularity.
fn draw_quantized<R: Rng>(rng: &mut R, min: f64, max: f64, decimals: u8) -> U256 {
    let raw = if max > min { rng.gen_range(min..=max) } else { min };
    let floored = (raw * 1e8).floor() / 1e8;
    Token::from_float(floored, decimals)
}

/// Supply or borrow against the Aave-style pool, driven by a per-asset
/// range table. One executor instance per mode.
pub struct LendingExecutor {
    mode: LendingMode,
    ranges: HashMap<String, TokenRange>,
    fees: Arc<FeePolicy>,
    allowances: AllowanceManager,
    confirmation_timeout: Duration,
}

impl LendingExecutor {
    pub fn supply(fees: Arc<FeePolicy>) -> Self {
        Self::new(LendingMode::Supply, fees)
    }

    pub fn borrow(fees: Arc<FeePolicy>) -> Self {
        Self::new(LendingMode::Borrow, fees)
    }

    fn new(mode: LendingMode, fees: Arc<FeePolicy>) -> Self {
        Self {
            mode,
            ranges: default_token_ranges(),
            fees,
            allowances: AllowanceManager::default(),
            confirmation_timeout: Duration::from_secs(240),
        }
    }

    pub fn with_ranges(mut self, ranges: HashMap<String, TokenRange>) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self.allowances = AllowanceManager::new(timeout);
        self
    }

    fn pick_asset<'a>(&self, network: &'a NetworkDescriptor) -> Option<(&'a Token, TokenRange)> {
        let listed: Vec<(&Token, TokenRange)> = network
            .tokens
            .iter()
            .filter_map(|t| self.ranges.get(&t.get_symbol().to_uppercase()).map(|r| (t, *r)))
            .collect();
        if listed.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..listed.len());
        Some(listed[index])
    }
}

#[async_trait]
impl ActionExecutor for LendingExecutor {
    fn name(&self) -> &'static str {
        match self.mode {
            LendingMode::Supply => "lend",
            LendingMode::Borrow => "borrow",
        }
    }

    async fn execute(&self, account: &dyn AccountHandle, network: &NetworkDescriptor) -> Result<(), OpError> {
        let pool = network.contract_or("lending_pool", FallbackContract::LENDING_POOL);
        let (token, range) = self
            .pick_asset(network)
            .ok_or_else(|| OpError::Unsupported { network: network.name.clone(), what: "no listed collateral asset in catalog".to_string() })?;
        let asset = token.get_address();
        let decimals = resolve_decimals(token);
        let gas_price = self.fees.fee_for(network.chain_id).await;

        let (amount, calldata) = match self.mode {
            LendingMode::Supply => {
                let balance = account.token_balance(asset).await?;
                if balance.is_zero() {
                    return Err(OpError::NoBalance(format!("{} balance is zero on {}", token.get_symbol(), network.name)));
                }
                let balance_f = Token::to_float(balance, decimals);
                let upper = range.supply_max.min(balance_f);
                if upper < range.supply_min {
                    return Err(OpError::BelowMinimum(format!("{} balance below supply minimum", token.get_symbol())));
                }
                let amount = {
                    let mut rng = rand::thread_rng();
                    draw_quantized(&mut rng, range.supply_min, upper, decimals)
                };

                self.allowances.ensure_allowance(account, asset, pool, amount, gas_price).await?;

                let params = (asset, amount, account.address(), 0u16).abi_encode_params();
                (amount, crate::routing::encoder::encode_with_selector(Selector::SUPPLY, &params))
            }
            LendingMode::Borrow => {
                // borrow draws against posted collateral, not wallet balance
                let amount = {
                    let mut rng = rand::thread_rng();
                    draw_quantized(&mut rng, range.borrow_min, range.borrow_max, decimals)
                };
                let params = (asset, amount, U256::from(VARIABLE_INTEREST_MODE), 0u16, account.address()).abi_encode_params();
                (amount, crate::routing::encoder::encode_with_selector(Selector::BORROW, &params))
            }
        };

        let tx = TxRequest::call(pool, calldata).with_gas(GasLimit::LENDING, gas_price);
        let tx_hash = account.sign_and_submit(tx).await?;
        let receipt = account.wait_for_receipt(tx_hash, self.confirmation_timeout).await?;

        if !receipt.success {
            return Err(OpError::Reverted(receipt.tx_hash));
        }
        info!(
            network = %network.name,
            wallet = account.label(),
            mode = self.name(),
            asset = %token.get_symbol(),
            %amount,
            tx = %receipt.tx_hash,
            "lending operation confirmed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{GasOracle, MockAccount};
    use crate::constants::{ChainId, GWEI};
    use crate::error::ChainError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct QuietOracle;

    #[async_trait]
    impl GasOracle for QuietOracle {
        async fn suggested_fee_wei(&self, _chain_id: u64) -> Result<u128, ChainError> {
            Ok(GWEI)
        }
    }

    fn fees() -> Arc<FeePolicy> {
        Arc::new(FeePolicy::new(Arc::new(QuietOracle)))
    }

    fn network_with_wbtc() -> (NetworkDescriptor, Token) {
        let wbtc = Token::new_with_data(Address::repeat_byte(2), Some("WBTC".into()), Some(8));
        let network = NetworkDescriptor::new("Pharos", ChainId::PHAROS, "http://x", "PHRS").with_token(wbtc.clone());
        (network, wbtc)
    }

    #[test]
    fn test_draw_quantized_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let units = draw_quantized(&mut rng, 0.00015, 0.0015, 8);
            // 8-decimal token: 0.00015 -> 15000 units, one unit of float slack
            assert!(units >= U256::from(14_999u64));
            assert!(units <= U256::from(150_000u64));
        }
    }

    #[tokio::test]
    async fn test_supply_approves_then_calls_pool() {
        let (network, wbtc) = network_with_wbtc();
        let account = MockAccount::new(Address::repeat_byte(1));
        account.set_token_balance(wbtc.get_address(), U256::from(100_000_000u64)); // 1 WBTC

        LendingExecutor::supply(fees()).execute(&account, &network).await.unwrap();

        assert_eq!(account.approval_count(), 1);
        let submissions = account.submissions();
        assert_eq!(submissions.len(), 2);
        let supply_tx = &submissions[1];
        assert_eq!(supply_tx.to, FallbackContract::LENDING_POOL);
        assert_eq!(&supply_tx.data[..4], &Selector::SUPPLY);
    }

    #[tokio::test]
    async fn test_supply_with_zero_balance_is_no_balance() {
        let (network, _) = network_with_wbtc();
        let account = MockAccount::new(Address::repeat_byte(1));

        let err = LendingExecutor::supply(fees()).execute(&account, &network).await.unwrap_err();
        assert!(matches!(err, OpError::NoBalance(_)));
        assert_eq!(account.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_borrow_needs_no_allowance() {
        let (network, _) = network_with_wbtc();
        let account = MockAccount::new(Address::repeat_byte(1));

        LendingExecutor::borrow(fees()).execute(&account, &network).await.unwrap();

        assert_eq!(account.approval_count(), 0);
        let tx = &account.submissions()[0];
        assert_eq!(&tx.data[..4], &Selector::BORROW);
    }

    #[tokio::test]
    async fn test_unlisted_assets_are_unsupported() {
        let network = NetworkDescriptor::new("Pharos", ChainId::PHAROS, "http://x", "PHRS")
            .with_token(Token::new_with_data(Address::repeat_byte(3), Some("DAI".into()), Some(18)));
        let account = MockAccount::new(Address::repeat_byte(1));

        let err = LendingExecutor::supply(fees()).execute(&account, &network).await.unwrap_err();
        assert!(matches!(err, OpError::Unsupported { .. }));
    }
}
