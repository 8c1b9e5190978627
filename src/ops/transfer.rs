use crate::chain::{AccountHandle, FeePolicy, TxRequest};
use crate::constants::GasLimit;
use crate::error::{ChainError, OpError};
use crate::ops::amount::{AmountPolicy, choose_amount};
use crate::ops::scheduler::ActionExecutor;
use crate::registry::NetworkDescriptor;
use crate::utils::{AddressClass, AddressClassCache};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Supplies candidate transfer recipients. Deployments back this with an
/// explorer scraper or a peer-wallet list; the executor only validates.
#[async_trait]
pub trait RecipientSource: Send + Sync {
    async fn next_recipient(&self, network: &NetworkDescriptor) -> Result<Option<Address>, ChainError>;
}

/// Round-robin over a fixed recipient list.
#[derive(Debug, Default)]
pub struct StaticRecipients {
    pool: Vec<Address>,
    cursor: AtomicUsize,
}

impl StaticRecipients {
    pub fn new(pool: Vec<Address>) -> Self {
        Self { pool, cursor: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl RecipientSource for StaticRecipients {
    async fn next_recipient(&self, _network: &NetworkDescriptor) -> Result<Option<Address>, ChainError> {
        if self.pool.is_empty() {
            return Ok(None);
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.pool.len();
        Ok(Some(self.pool[index]))
    }
}

/// Native-coin transfer to a validated, active EOA. Recipients that turn out
/// to be contracts or dormant addresses are skipped, and the chosen amount
/// always leaves room for the transfer's own gas.
pub struct TransferExecutor {
    recipients: Arc<dyn RecipientSource>,
    cache: Arc<AddressClassCache>,
    fees: Arc<FeePolicy>,
    policy: AmountPolicy,
    confirmation_timeout: Duration,
    max_candidates: usize,
}

impl TransferExecutor {
    pub fn new(recipients: Arc<dyn RecipientSource>, cache: Arc<AddressClassCache>, fees: Arc<FeePolicy>) -> Self {
        Self {
            recipients,
            cache,
            fees,
            policy: AmountPolicy::default(),
            confirmation_timeout: Duration::from_secs(120),
            max_candidates: 5,
        }
    }

    pub fn with_policy(mut self, policy: AmountPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    async fn pick_recipient(&self, account: &dyn AccountHandle, network: &NetworkDescriptor) -> Result<Option<Address>, OpError> {
        for _ in 0..self.max_candidates {
            let Some(candidate) = self.recipients.next_recipient(network).await? else {
                break;
            };
            if candidate == account.address() || candidate.is_zero() {
                continue;
            }
            if self.cache.classify(account, candidate).await? == AddressClass::Contract {
                debug!(%candidate, "recipient is a contract, skipping");
                continue;
            }
            // only send to addresses that have actually been used
            let active = account.native_balance_of(candidate).await? > U256::ZERO || account.transaction_count(candidate).await? > 0;
            if active {
                return Ok(Some(candidate));
            }
            debug!(%candidate, "recipient shows no activity, skipping");
        }
        Ok(None)
    }
}

#[async_trait]
impl ActionExecutor for TransferExecutor {
    fn name(&self) -> &'static str {
        "transfer"
    }

    async fn execute(&self, account: &dyn AccountHandle, network: &NetworkDescriptor) -> Result<(), OpError> {
        let balance = account.native_balance().await?;
        if balance.is_zero() {
            return Err(OpError::NoBalance(format!("wallet {} is empty on {}", account.label(), network.name)));
        }

        let gas_price = self.fees.fee_for(network.chain_id).await;
        let gas_cost = U256::from(GasLimit::TRANSFER as u128 * gas_price);
        let available = balance.saturating_sub(gas_cost);
        if available.is_zero() {
            return Err(OpError::NoBalance(format!("balance covers gas only on {}", network.name)));
        }

        let recipient = self
            .pick_recipient(account, network)
            .await?
            .ok_or_else(|| OpError::Unsupported { network: network.name.clone(), what: "no active EOA recipient available".to_string() })?;

        let amount = choose_amount(available, 18, &self.policy)
            .ok_or_else(|| OpError::BelowMinimum(format!("spendable native below transfer minimum on {}", network.name)))?;

        let tx = TxRequest::native_transfer(recipient, amount).with_gas(GasLimit::TRANSFER, gas_price);
        let tx_hash = account.sign_and_submit(tx).await?;
        let receipt = account.wait_for_receipt(tx_hash, self.confirmation_timeout).await?;

        if !receipt.success {
            warn!(network = %network.name, tx = %receipt.tx_hash, "transfer reverted");
            return Err(OpError::Reverted(receipt.tx_hash));
        }
        info!(network = %network.name, wallet = account.label(), %recipient, tx = %receipt.tx_hash, "transfer confirmed");
        Ok(())
    }
}
