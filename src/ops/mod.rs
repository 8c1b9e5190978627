pub mod allowance;
pub mod amount;
pub mod config;
pub mod lending;
pub mod scheduler;
pub mod stake;
pub mod stats;
pub mod subscribe;
pub mod swap;
pub mod transfer;

pub use allowance::AllowanceManager;
pub use amount::{AmountPolicy, choose_amount, resolve_decimals};
pub use config::{AmountSection, ConfirmationConfig, CyclerConfig, PacingConfig};
pub use lending::{LendingExecutor, LendingMode, TokenRange, default_token_ranges};
pub use scheduler::{ActionExecutor, Operation, Scheduler, SchedulerBuilder, weighted_choice};
pub use stake::StakeExecutor;
pub use stats::{OpCounters, StatsAggregator, StatsSnapshot};
pub use subscribe::{SubscriptionExecutor, SubscriptionTarget};
pub use swap::{BalanceSnapshot, SwapEngine};
pub use transfer::{RecipientSource, StaticRecipients, TransferExecutor};
