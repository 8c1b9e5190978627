use crate::chain::{AccountHandle, FeePolicy, TxRequest};
use crate::constants::{GasLimit, NATIVE, NATIVE_GAS_RESERVE_WEI, SWAP_DEADLINE_SECS};
use crate::error::OpError;
use crate::ops::allowance::AllowanceManager;
use crate::ops::amount::{AmountPolicy, choose_amount_with_rng, resolve_decimals};
use crate::registry::{NetworkDescriptor, Token};
use crate::routing::{RouteResolver, RouterFamily, SwapIntent};
use crate::utils::{AddressClass, AddressClassCache};
use alloy_primitives::{Address, U256};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Wallet holdings relevant to one swap decision: spendable native plus
/// catalogued tokens with a nonzero balance. Tokens whose address carries no
/// deployed code never enter the snapshot.
#[derive(Clone, Debug)]
pub struct BalanceSnapshot {
    pub native: U256,
    pub funded: Vec<(Token, U256)>,
}

/// Drives one swap end to end: snapshot, candidate pair, amount, allowance,
/// payload, submission, bounded confirmation, and at most one fallback to an
/// alternate untried plan.
pub struct SwapEngine {
    fees: Arc<FeePolicy>,
    address_cache: Arc<AddressClassCache>,
    allowances: AllowanceManager,
    native_policy: AmountPolicy,
    token_policy: AmountPolicy,
    confirmation_timeout: Duration,
    gas_reserve: U256,
    max_attempts: usize,
}

impl SwapEngine {
    pub fn new(fees: Arc<FeePolicy>, address_cache: Arc<AddressClassCache>) -> Self {
        Self {
            fees,
            address_cache,
            allowances: AllowanceManager::default(),
            native_policy: AmountPolicy::default(),
            token_policy: AmountPolicy::default(),
            confirmation_timeout: Duration::from_secs(180),
            gas_reserve: U256::from(NATIVE_GAS_RESERVE_WEI),
            max_attempts: 2,
        }
    }

    pub fn with_policies(mut self, native: AmountPolicy, token: AmountPolicy) -> Self {
        self.native_policy = native;
        self.token_policy = token;
        self
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    pub fn with_gas_reserve(mut self, reserve: U256) -> Self {
        self.gas_reserve = reserve;
        self
    }

    pub async fn snapshot(&self, account: &dyn AccountHandle, network: &NetworkDescriptor) -> Result<BalanceSnapshot, OpError> {
        let native = account.native_balance().await?;

        let mut funded = Vec::new();
        for token in &network.tokens {
            if token.is_native() {
                continue;
            }
            if self.address_cache.classify(account, token.get_address()).await? == AddressClass::Eoa {
                warn!(network = %network.name, token = %token.get_symbol(), "token address has no deployed code, skipping");
                continue;
            }
            let balance = account.token_balance(token.get_address()).await?;
            if !balance.is_zero() {
                funded.push((token.clone(), balance));
            }
        }

        Ok(BalanceSnapshot { native, funded })
    }

    /// Pick direction and amount from the snapshot. Native-in is preferred
    /// when the reserve-adjusted native balance can fund the policy minimum;
    /// otherwise the funded token side is used. Token-to-token pairs only
    /// exist where the command router can route them.
    fn pick_candidate(&self, snapshot: &BalanceSnapshot, network: &NetworkDescriptor, family: RouterFamily) -> Result<(SwapIntent, Token), OpError> {
        let tokens: Vec<&Token> = network.tokens.iter().filter(|t| !t.is_native()).collect();
        if tokens.is_empty() {
            return Err(OpError::Unsupported { network: network.name.clone(), what: "no tokens catalogued for swapping".to_string() });
        }

        let mut rng = rand::thread_rng();
        let spendable_native = snapshot.native.saturating_sub(self.gas_reserve);
        let native_amount = choose_amount_with_rng(&mut rng, spendable_native, 18, &self.native_policy);

        // native -> token, strongly preferred when it can be funded
        let use_native = match (&native_amount, snapshot.funded.is_empty()) {
            (Some(_), true) => true,
            (Some(_), false) => rng.gen_bool(0.8),
            (None, _) => false,
        };

        if use_native {
            let amount = native_amount.ok_or_else(|| OpError::Invariant("native amount vanished".to_string()))?;
            let token_out = tokens[rng.gen_range(0..tokens.len())].clone();
            let intent = SwapIntent {
                token_in: NATIVE,
                token_out: token_out.get_address(),
                amount_in: amount,
                recipient: Address::ZERO, // filled by caller
                pool_in: None,
                pool_out: token_out.pool(),
            };
            return Ok((intent, token_out));
        }

        if snapshot.funded.is_empty() {
            return Err(OpError::NoBalance(format!("native below policy minimum and no funded tokens on {}", network.name)));
        }

        let (token_in, balance) = snapshot.funded[rng.gen_range(0..snapshot.funded.len())].clone();
        let decimals = resolve_decimals(&token_in);
        let amount = choose_amount_with_rng(&mut rng, balance, decimals, &self.token_policy)
            .ok_or_else(|| OpError::BelowMinimum(format!("{} balance below swap minimum", token_in.get_symbol())))?;

        // token -> token only where the command router can express it
        let token_to_token = family == RouterFamily::Universal && snapshot.funded.len() >= 2 && rng.gen_bool(0.5);
        let (token_out_addr, pool_out) = if token_to_token {
            let other: Vec<&(Token, U256)> = snapshot.funded.iter().filter(|(t, _)| t != &token_in).collect();
            let picked = &other[rng.gen_range(0..other.len())].0;
            (picked.get_address(), picked.pool())
        } else {
            (NATIVE, None)
        };

        let intent = SwapIntent {
            token_in: token_in.get_address(),
            token_out: token_out_addr,
            amount_in: amount,
            recipient: Address::ZERO,
            pool_in: token_in.pool(),
            pool_out,
        };
        Ok((intent, token_in))
    }

    pub async fn execute_swap(&self, account: &dyn AccountHandle, network: &NetworkDescriptor) -> Result<(), OpError> {
        let resolver = RouteResolver::for_network(network);
        let family = resolver
            .family()
            .ok_or_else(|| OpError::Unsupported { network: network.name.clone(), what: "no router family bound for this chain".to_string() })?;

        let snapshot = self.snapshot(account, network).await?;
        if snapshot.native.saturating_sub(self.gas_reserve).is_zero() && snapshot.funded.is_empty() {
            return Err(OpError::NoBalance(format!("wallet {} has no balance to swap on {}", account.label(), network.name)));
        }

        let (mut intent, pivot_token) = self.pick_candidate(&snapshot, network, family)?;
        intent.recipient = account.address();

        let deadline = U256::from(SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() + SWAP_DEADLINE_SECS);
        let plans = resolver.resolve(&intent, deadline)?;
        let gas_price = self.fees.fee_for(network.chain_id).await;

        let mut visited: HashSet<String> = HashSet::new();
        let mut last_failure: Option<OpError> = None;

        for plan in &plans {
            if visited.len() >= self.max_attempts {
                break;
            }
            if !visited.insert(plan.label.clone()) {
                continue;
            }

            if let Some(spender) = plan.spender {
                // an approval failure dooms every plan with the same input
                // token, so it ends the whole swap
                self.allowances.ensure_allowance(account, intent.token_in, spender, intent.amount_in, gas_price).await?;
            }

            let tx = TxRequest::call(plan.target, plan.calldata.clone()).with_value(plan.value).with_gas(GasLimit::SWAP, gas_price);

            let tx_hash = match account.sign_and_submit(tx).await {
                Ok(hash) => hash,
                Err(err) => {
                    warn!(network = %network.name, plan = %plan.label, %err, "swap submission failed, trying alternate route");
                    last_failure = Some(err.into());
                    continue;
                }
            };

            match account.wait_for_receipt(tx_hash, self.confirmation_timeout).await {
                Ok(receipt) if receipt.success => {
                    info!(
                        network = %network.name,
                        wallet = account.label(),
                        plan = %plan.label,
                        token = %pivot_token.get_symbol(),
                        tx = %receipt.tx_hash,
                        "swap confirmed"
                    );
                    return Ok(());
                }
                Ok(receipt) => {
                    warn!(network = %network.name, plan = %plan.label, tx = %receipt.tx_hash, "swap reverted, trying alternate route");
                    last_failure = Some(OpError::Reverted(receipt.tx_hash));
                }
                Err(err) => {
                    warn!(network = %network.name, plan = %plan.label, %err, "swap confirmation failed");
                    last_failure = Some(err.into());
                }
            }
        }

        Err(last_failure.unwrap_or_else(|| OpError::Invariant("resolver produced no attempt plans".to_string())))
    }
}

#[async_trait::async_trait]
impl crate::ops::scheduler::ActionExecutor for SwapEngine {
    fn name(&self) -> &'static str {
        "swap"
    }

    async fn execute(&self, account: &dyn AccountHandle, network: &NetworkDescriptor) -> Result<(), OpError> {
        self.execute_swap(account, network).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{GasOracle, MockAccount};
    use crate::constants::{ChainId, GWEI};
    use crate::error::ChainError;
    use alloy_primitives::Bytes;
    use async_trait::async_trait;

    struct QuietOracle;

    #[async_trait]
    impl GasOracle for QuietOracle {
        async fn suggested_fee_wei(&self, _chain_id: u64) -> Result<u128, ChainError> {
            Ok(GWEI)
        }
    }

    fn engine() -> SwapEngine {
        let fees = Arc::new(FeePolicy::new(Arc::new(QuietOracle)));
        SwapEngine::new(fees, Arc::new(AddressClassCache::new()))
    }

    fn token(byte: u8) -> Token {
        Token::new_with_data(Address::repeat_byte(byte), Some(format!("TK{byte}")), Some(18)).with_pool(Address::repeat_byte(byte + 100))
    }

    fn deploy(account: &MockAccount, t: &Token) {
        account.set_code(t.get_address(), Bytes::from(vec![0x60, 0x80, 0x60, 0x40]));
    }

    fn ether(value: u64) -> U256 {
        U256::from(value) * U256::from(10).pow(U256::from(18))
    }

    #[tokio::test]
    async fn test_zero_balance_yields_no_submission() {
        let network = NetworkDescriptor::new("OPN", ChainId::OPN, "http://x", "OPN").with_token(token(1));
        let account = MockAccount::new(Address::repeat_byte(9));
        deploy(&account, &network.tokens[0]);

        let err = engine().execute_swap(&account, &network).await.unwrap_err();
        assert!(matches!(err, OpError::NoBalance(_)));
        assert!(err.to_string().contains("no balance"));
        assert_eq!(account.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_primary_revert_falls_back_once() {
        let network = NetworkDescriptor::new("Arc", ChainId::ARC, "http://x", "ARC")
            .with_contract("universal_router", Address::repeat_byte(8))
            .with_token(token(1));
        let account = MockAccount::new(Address::repeat_byte(9));
        deploy(&account, &network.tokens[0]);
        account.set_native_balance(ether(1));
        account.script_receipt_outcomes([false, true]);

        engine().execute_swap(&account, &network).await.unwrap();
        // primary reverted, alternate confirmed: exactly two submissions
        assert_eq!(account.submission_count(), 2);
    }

    #[tokio::test]
    async fn test_both_plans_reverting_fails_with_revert_reason() {
        let network = NetworkDescriptor::new("Arc", ChainId::ARC, "http://x", "ARC")
            .with_contract("universal_router", Address::repeat_byte(8))
            .with_token(token(1));
        let account = MockAccount::new(Address::repeat_byte(9));
        deploy(&account, &network.tokens[0]);
        account.set_native_balance(ether(1));
        account.script_receipt_outcomes([false, false]);

        let err = engine().execute_swap(&account, &network).await.unwrap_err();
        assert!(matches!(err, OpError::Reverted(_)));
        assert_eq!(account.submission_count(), 2);
    }

    #[tokio::test]
    async fn test_token_side_used_when_native_drained() {
        let wbtc = token(1);
        let network = NetworkDescriptor::new("OPN", ChainId::OPN, "http://x", "OPN").with_token(wbtc.clone());
        let account = MockAccount::new(Address::repeat_byte(9));
        deploy(&account, &wbtc);
        account.set_token_balance(wbtc.get_address(), ether(5));

        engine().execute_swap(&account, &network).await.unwrap();
        // one approval plus the swap itself
        assert_eq!(account.approval_count(), 1);
        assert_eq!(account.submission_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_chain_is_unsupported() {
        let network = NetworkDescriptor::new("Mystery", 42, "http://x", "ETH").with_token(token(1));
        let account = MockAccount::new(Address::repeat_byte(9));
        account.set_native_balance(ether(1));

        let err = engine().execute_swap(&account, &network).await.unwrap_err();
        assert!(matches!(err, OpError::Unsupported { .. }));
        assert_eq!(account.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_undeployed_token_excluded_from_snapshot() {
        let ghost = token(1);
        let network = NetworkDescriptor::new("OPN", ChainId::OPN, "http://x", "OPN").with_token(ghost.clone());
        let account = MockAccount::new(Address::repeat_byte(9));
        // balance present but no code at the token address
        account.set_token_balance(ghost.get_address(), ether(5));

        let snap = engine().snapshot(&account, &network).await.unwrap();
        assert!(snap.funded.is_empty());
    }
}
