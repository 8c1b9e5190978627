use crate::chain::{AccountHandle, FeePolicy, TxRequest};
use crate::constants::{GasLimit, Selector};
use crate::error::OpError;
use crate::ops::allowance::AllowanceManager;
use crate::ops::amount::{AmountPolicy, choose_amount};
use crate::ops::scheduler::ActionExecutor;
use crate::registry::NetworkDescriptor;
use alloy_primitives::{Address, B256};
use alloy_sol_types::SolValue;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One subscribable position: the manager contract, its asset identifier,
/// and the ERC-20 the subscription is paid in.
#[derive(Clone, Debug)]
pub struct SubscriptionTarget {
    pub contract: Address,
    pub asset_id: B256,
    pub token: Address,
    pub token_decimals: u8,
}

/// Calls `subscribe(bytes32,uint256)` on a manager contract that publishes
/// no ABI; the payload is a raw selector plus encoded arguments.
pub struct SubscriptionExecutor {
    targets: Vec<SubscriptionTarget>,
    fees: Arc<FeePolicy>,
    allowances: AllowanceManager,
    policy: AmountPolicy,
    confirmation_timeout: Duration,
}

impl SubscriptionExecutor {
    pub fn new(targets: Vec<SubscriptionTarget>, fees: Arc<FeePolicy>) -> Self {
        Self {
            targets,
            fees,
            allowances: AllowanceManager::default(),
            policy: AmountPolicy::default(),
            confirmation_timeout: Duration::from_secs(180),
        }
    }

    pub fn with_policy(mut self, policy: AmountPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl ActionExecutor for SubscriptionExecutor {
    fn name(&self) -> &'static str {
        "subscribe"
    }

    async fn execute(&self, account: &dyn AccountHandle, network: &NetworkDescriptor) -> Result<(), OpError> {
        if self.targets.is_empty() {
            return Err(OpError::Unsupported { network: network.name.clone(), what: "no subscription targets configured".to_string() });
        }
        let target = {
            let index = rand::thread_rng().gen_range(0..self.targets.len());
            self.targets[index].clone()
        };

        let balance = account.token_balance(target.token).await?;
        if balance.is_zero() {
            return Err(OpError::NoBalance(format!("subscription token balance is zero on {}", network.name)));
        }
        let amount = choose_amount(balance, target.token_decimals, &self.policy)
            .ok_or_else(|| OpError::BelowMinimum("subscription token balance below policy minimum".to_string()))?;

        let gas_price = self.fees.fee_for(network.chain_id).await;
        self.allowances.ensure_allowance(account, target.token, target.contract, amount, gas_price).await?;

        let params = (target.asset_id, amount).abi_encode_params();
        let calldata = crate::routing::encoder::encode_with_selector(Selector::SUBSCRIBE, &params);
        let tx = TxRequest::call(target.contract, calldata).with_gas(GasLimit::SUBSCRIBE, gas_price);

        let tx_hash = account.sign_and_submit(tx).await?;
        let receipt = account.wait_for_receipt(tx_hash, self.confirmation_timeout).await?;
        if !receipt.success {
            return Err(OpError::Reverted(receipt.tx_hash));
        }
        info!(
            network = %network.name,
            wallet = account.label(),
            asset_id = %target.asset_id,
            %amount,
            tx = %receipt.tx_hash,
            "subscription confirmed"
        );
        Ok(())
    }
}
