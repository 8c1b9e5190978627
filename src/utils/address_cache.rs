use crate::chain::AccountHandle;
use crate::error::ChainError;
use alloy_primitives::Address;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressClass {
    Contract,
    Eoa,
}

#[derive(Debug, Default)]
pub struct ClassCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
}

/// Owned cache mapping addresses to their on-chain classification. The
/// classification never changes on the managed networks, so entries have no
/// TTL. Created once and passed to whichever executor needs it.
#[derive(Debug, Default)]
pub struct AddressClassCache {
    classes: DashMap<Address, AddressClass>,
    pub stats: ClassCacheStats,
}

impl AddressClassCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: Address) -> Option<AddressClass> {
        match self.classes.get(&address) {
            Some(class) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(*class)
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, address: Address, class: AddressClass) {
        self.classes.insert(address, class);
    }

    /// Cached classification, fetching the deployed code on a miss.
    pub async fn classify(&self, account: &dyn AccountHandle, address: Address) -> Result<AddressClass, ChainError> {
        if let Some(class) = self.get(address) {
            return Ok(class);
        }
        let code = account.code_at(address).await?;
        let class = if code.is_empty() { AddressClass::Eoa } else { AddressClass::Contract };
        self.classes.insert(address, class);
        Ok(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockAccount;
    use alloy_primitives::{Bytes, U256};

    #[tokio::test]
    async fn test_classify_and_cache() {
        let account = MockAccount::new(Address::repeat_byte(1));
        let contract = Address::repeat_byte(2);
        let eoa = Address::repeat_byte(3);
        account.set_code(contract, Bytes::from(vec![0x60, 0x80]));
        account.set_native_balance_of(eoa, U256::from(1));

        let cache = AddressClassCache::new();
        assert_eq!(cache.classify(&account, contract).await.unwrap(), AddressClass::Contract);
        assert_eq!(cache.classify(&account, eoa).await.unwrap(), AddressClass::Eoa);

        // second pass hits the cache
        assert_eq!(cache.classify(&account, contract).await.unwrap(), AddressClass::Contract);
        assert_eq!(cache.stats.hits.load(Ordering::Relaxed), 1);
        assert_eq!(cache.len(), 2);
    }
}
