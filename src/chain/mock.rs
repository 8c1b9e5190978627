use crate::chain::account::{AccountHandle, TxReceipt, TxRequest};
use crate::error::ChainError;
use crate::routing::encoder::approveCall;
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted account handle for tests. Balances, code, and allowances are
/// plain maps; every submission is recorded and its receipt outcome comes
/// from a script (missing entries confirm successfully). Approvals are
/// applied to the allowance map on submission so idempotence is observable.
#[derive(Debug)]
pub struct MockAccount {
    address: Address,
    label: String,
    natives: Mutex<HashMap<Address, U256>>,
    tokens: Mutex<HashMap<Address, U256>>,
    code: Mutex<HashMap<Address, Bytes>>,
    tx_counts: Mutex<HashMap<Address, u64>>,
    allowances: Mutex<HashMap<(Address, Address), U256>>,
    submissions: Mutex<Vec<TxRequest>>,
    outcome_script: Mutex<VecDeque<bool>>,
    receipts: Mutex<HashMap<B256, bool>>,
    next_hash: Mutex<u64>,
}

impl MockAccount {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            label: "mock".to_string(),
            natives: Mutex::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
            code: Mutex::new(HashMap::new()),
            tx_counts: Mutex::new(HashMap::new()),
            allowances: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            outcome_script: Mutex::new(VecDeque::new()),
            receipts: Mutex::new(HashMap::new()),
            next_hash: Mutex::new(0),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn set_native_balance(&self, wei: U256) {
        self.natives.lock().unwrap().insert(self.address, wei);
    }

    pub fn set_native_balance_of(&self, address: Address, wei: U256) {
        self.natives.lock().unwrap().insert(address, wei);
    }

    pub fn set_token_balance(&self, token: Address, units: U256) {
        self.tokens.lock().unwrap().insert(token, units);
    }

    pub fn set_code(&self, address: Address, code: Bytes) {
        self.code.lock().unwrap().insert(address, code);
    }

    pub fn set_transaction_count(&self, address: Address, count: u64) {
        self.tx_counts.lock().unwrap().insert(address, count);
    }

    pub fn set_allowance(&self, token: Address, spender: Address, amount: U256) {
        self.allowances.lock().unwrap().insert((token, spender), amount);
    }

    /// Queue receipt outcomes for the next submissions, in order.
    pub fn script_receipt_outcomes(&self, outcomes: impl IntoIterator<Item = bool>) {
        self.outcome_script.lock().unwrap().extend(outcomes);
    }

    pub fn submissions(&self) -> Vec<TxRequest> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    /// Submissions whose calldata starts with the ERC-20 approve selector.
    pub fn approval_count(&self) -> usize {
        self.submissions.lock().unwrap().iter().filter(|tx| tx.data.starts_with(&approveCall::SELECTOR)).count()
    }
}

#[async_trait]
impl AccountHandle for MockAccount {
    fn address(&self) -> Address {
        self.address
    }

    fn label(&self) -> &str {
        &self.label
    }

    async fn native_balance_of(&self, address: Address) -> Result<U256, ChainError> {
        Ok(self.natives.lock().unwrap().get(&address).copied().unwrap_or(U256::ZERO))
    }

    async fn token_balance(&self, token: Address) -> Result<U256, ChainError> {
        Ok(self.tokens.lock().unwrap().get(&token).copied().unwrap_or(U256::ZERO))
    }

    async fn allowance(&self, token: Address, spender: Address) -> Result<U256, ChainError> {
        Ok(self.allowances.lock().unwrap().get(&(token, spender)).copied().unwrap_or(U256::ZERO))
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        Ok(self.code.lock().unwrap().get(&address).cloned().unwrap_or_default())
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError> {
        Ok(self.tx_counts.lock().unwrap().get(&address).copied().unwrap_or(0))
    }

    async fn sign_and_submit(&self, tx: TxRequest) -> Result<B256, ChainError> {
        let success = self.outcome_script.lock().unwrap().pop_front().unwrap_or(true);

        if success {
            if let Ok(call) = approveCall::abi_decode(&tx.data) {
                self.allowances.lock().unwrap().insert((tx.to, call.spender), call.amount);
            }
        }

        let mut counter = self.next_hash.lock().unwrap();
        *counter += 1;
        let hash = B256::from(U256::from(*counter));
        drop(counter);

        self.receipts.lock().unwrap().insert(hash, success);
        self.submissions.lock().unwrap().push(tx);
        Ok(hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256, _timeout: Duration) -> Result<TxReceipt, ChainError> {
        match self.receipts.lock().unwrap().get(&tx_hash) {
            Some(&success) => Ok(TxReceipt { tx_hash, success, gas_used: 21_000 }),
            None => Err(ChainError::ReceiptTimeout(tx_hash)),
        }
    }
}
