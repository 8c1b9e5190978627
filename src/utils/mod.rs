pub mod address_cache;
pub mod config_loader;

pub use address_cache::{AddressClass, AddressClassCache, ClassCacheStats};
pub use config_loader::*;
