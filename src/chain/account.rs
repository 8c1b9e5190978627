use crate::error::ChainError;
use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use std::time::Duration;

/// Fully-formed transaction handed to the account handle for signing.
/// Nonce management stays on the wallet side.
#[derive(Clone, Debug, Default)]
pub struct TxRequest {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub gas_limit: u64,
    pub gas_price_wei: u128,
}

impl TxRequest {
    pub fn call(to: Address, data: Bytes) -> Self {
        Self { to, data, ..Self::default() }
    }

    pub fn native_transfer(to: Address, value: U256) -> Self {
        Self { to, value, ..Self::default() }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_gas(mut self, gas_limit: u64, gas_price_wei: u128) -> Self {
        self.gas_limit = gas_limit;
        self.gas_price_wei = gas_price_wei;
        self
    }
}

#[derive(Clone, Debug)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub success: bool,
    pub gas_used: u64,
}

/// One managed wallet bound to one network. The wallet pool implements this
/// outside the core; everything here is either a read or a sign-and-send.
/// Key custody never crosses this seam.
#[async_trait]
pub trait AccountHandle: Send + Sync {
    fn address(&self) -> Address;

    /// Short human label for logs ("wallet-3"), never the key.
    fn label(&self) -> &str;

    async fn native_balance_of(&self, address: Address) -> Result<U256, ChainError>;

    async fn native_balance(&self) -> Result<U256, ChainError> {
        self.native_balance_of(self.address()).await
    }

    async fn token_balance(&self, token: Address) -> Result<U256, ChainError>;

    async fn allowance(&self, token: Address, spender: Address) -> Result<U256, ChainError>;

    /// Deployed bytecode at `address`; empty for an EOA.
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError>;

    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError>;

    async fn sign_and_submit(&self, tx: TxRequest) -> Result<B256, ChainError>;

    /// Bounded wait; implementations resolve with `ChainError::ReceiptTimeout`
    /// when the deadline passes without inclusion.
    async fn wait_for_receipt(&self, tx_hash: B256, timeout: Duration) -> Result<TxReceipt, ChainError>;
}
