use alloy_primitives::B256;
use thiserror::Error;

/// Failures surfaced by the chain collaborators (account handle, gas oracle).
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("timed out waiting for receipt of {0}")]
    ReceiptTimeout(B256),
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),
    #[error("account unavailable: {0}")]
    AccountUnavailable(String),
}

/// Operation-level failure taxonomy. Every variant reaches the scheduler
/// boundary as a `false` outcome plus this reason; only log severity differs.
#[derive(Debug, Error)]
pub enum OpError {
    /// Configuration gap: nothing is wired up for this action on this network.
    #[error("unsupported on {network}: {what}")]
    Unsupported { network: String, what: String },

    /// Expected outcome on drained test wallets, not a fault.
    #[error("no balance: {0}")]
    NoBalance(String),

    /// Balance exists but is below the policy minimum.
    #[error("below minimum: {0}")]
    BelowMinimum(String),

    #[error("allowance denied for {asset} -> {spender}")]
    AllowanceDenied { asset: String, spender: String },

    #[error("transaction {0} reverted on-chain")]
    Reverted(B256),

    /// Transient transport-level failure, retriable by a later cycle.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Internal inconsistency; indicates a bug rather than chain weather.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl OpError {
    /// Whether the scheduler should log this at warn (environmental) or
    /// error (programming fault) severity.
    pub fn is_fault(&self) -> bool {
        matches!(self, OpError::Invariant(_))
    }

    /// Expected outcomes are logged at info and never counted as alarming.
    pub fn is_expected(&self) -> bool {
        matches!(self, OpError::NoBalance(_) | OpError::BelowMinimum(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_split() {
        assert!(OpError::Invariant("x".into()).is_fault());
        assert!(!OpError::NoBalance("x".into()).is_fault());
        assert!(OpError::NoBalance("x".into()).is_expected());
        assert!(OpError::BelowMinimum("x".into()).is_expected());
        assert!(!OpError::Reverted(B256::ZERO).is_expected());
    }

    #[test]
    fn test_chain_error_wraps() {
        let err: OpError = ChainError::Rpc("boom".into()).into();
        assert!(matches!(err, OpError::Chain(_)));
        assert!(err.to_string().contains("boom"));
    }
}
