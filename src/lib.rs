// Layered Architecture
pub mod registry;  // Catalog Layer: network descriptors, classes, tokens
pub mod chain;     // Chain Layer: account handles, fee policy, test mocks
pub mod routing;   // Routing Layer: router families, route specs, encoding
pub mod ops;       // Operations Layer: scheduler, swap engine, executors

// Common utilities and types
pub mod utils;

pub mod constants;
pub mod error;

// Re-export key components from each layer
pub use chain::{AccountHandle, FeePolicy, GasOracle, MockAccount, TxReceipt, TxRequest};
pub use error::{ChainError, OpError};
pub use ops::{
    ActionExecutor, AllowanceManager, AmountPolicy, BalanceSnapshot, CyclerConfig, LendingExecutor, Operation, PacingConfig,
    Scheduler, SchedulerBuilder, StakeExecutor, StatsAggregator, StatsSnapshot, SubscriptionExecutor, SubscriptionTarget,
    SwapEngine, TransferExecutor, weighted_choice,
};
pub use registry::{ActionKind, NetworkClass, NetworkDescriptor, NetworkRegistry, Token, WeightTable};
pub use routing::{
    HOP_ROWS, Hop, MAX_HOPS, ROUTE_CAPACITY, RouteResolver, RouteSpec, RouterCommand, RouterFamily, SwapIntent, SwapPlan,
};
pub use utils::{AddressClass, AddressClassCache, LoadConfigError};
