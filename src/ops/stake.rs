use crate::chain::AccountHandle;
use crate::error::OpError;
use crate::ops::scheduler::ActionExecutor;
use crate::registry::{NetworkDescriptor, Token};
use async_trait::async_trait;
use rand::Rng;
use tracing::info;

/// Staking rehearsal: sizes a stake like the real flow would but submits
/// nothing, because no staking contract is deployed on the target networks
/// yet. Balance checks and sizing stay honest so the switch to a live
/// contract is a payload change only.
pub struct StakeExecutor {
    percent_min: f64,
    percent_max: f64,
}

impl Default for StakeExecutor {
    fn default() -> Self {
        Self { percent_min: 0.10, percent_max: 0.30 }
    }
}

impl StakeExecutor {
    pub fn new(percent_min: f64, percent_max: f64) -> Self {
        Self { percent_min, percent_max }
    }
}

#[async_trait]
impl ActionExecutor for StakeExecutor {
    fn name(&self) -> &'static str {
        "stake"
    }

    async fn execute(&self, account: &dyn AccountHandle, network: &NetworkDescriptor) -> Result<(), OpError> {
        let balance = account.native_balance().await?;
        if balance.is_zero() {
            return Err(OpError::NoBalance(format!("wallet {} has nothing to stake on {}", account.label(), network.name)));
        }

        let fraction = rand::thread_rng().gen_range(self.percent_min..=self.percent_max);
        let amount_f = Token::to_float(balance, 18) * fraction;

        info!(
            network = %network.name,
            wallet = account.label(),
            amount = format!("{amount_f:.6} {}", network.native_symbol),
            "stake rehearsed, no staking contract deployed yet"
        );
        Ok(())
    }
}
