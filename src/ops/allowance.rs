use crate::chain::{AccountHandle, TxRequest};
use crate::constants::{GasLimit, MAX_ALLOWANCE};
use crate::error::OpError;
use crate::routing::encoder;
use alloy_primitives::{Address, U256};
use std::time::Duration;
use tracing::{debug, info};

/// Ensures routers can pull tokens before a swap. Approvals are unlimited,
/// so a spender is approved at most once per token for a wallet's lifetime;
/// every later call is a read and a no-op.
#[derive(Clone, Debug)]
pub struct AllowanceManager {
    confirmation_timeout: Duration,
}

impl Default for AllowanceManager {
    fn default() -> Self {
        Self { confirmation_timeout: Duration::from_secs(120) }
    }
}

impl AllowanceManager {
    pub fn new(confirmation_timeout: Duration) -> Self {
        Self { confirmation_timeout }
    }

    pub async fn ensure_allowance(
        &self,
        account: &dyn AccountHandle,
        token: Address,
        spender: Address,
        amount: U256,
        gas_price_wei: u128,
    ) -> Result<(), OpError> {
        let current = account.allowance(token, spender).await?;
        if current >= amount {
            debug!(%token, %spender, "allowance already sufficient");
            return Ok(());
        }

        info!(%token, %spender, wallet = account.label(), "approving unlimited allowance");
        let tx = TxRequest::call(token, encoder::encode_approve(spender, MAX_ALLOWANCE)).with_gas(GasLimit::APPROVE, gas_price_wei);
        let tx_hash = account.sign_and_submit(tx).await?;
        let receipt = account.wait_for_receipt(tx_hash, self.confirmation_timeout).await?;

        if !receipt.success {
            return Err(OpError::AllowanceDenied { asset: token.to_string(), spender: spender.to_string() });
        }
        Ok(())
    }
}
