pub mod account;
pub mod gas;
pub mod mock;

pub use account::{AccountHandle, TxReceipt, TxRequest};
pub use gas::{FeePolicy, GasOracle};
pub use mock::MockAccount;
