use crate::registry::class::NetworkClass;
use crate::registry::token::Token;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static description of one managed network. Descriptors come out of the
/// TOML configuration already validated; the registry only catalogs them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub name: String,
    pub chain_id: u64,
    pub rpc_endpoint: String,
    pub native_symbol: String,
    #[serde(default)]
    pub explorer: Option<String>,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub contracts: HashMap<String, Address>,
    /// Resolved from the chain id when the descriptor enters the registry.
    #[serde(default, skip_serializing)]
    pub class: NetworkClass,
}

impl NetworkDescriptor {
    pub fn new(name: impl Into<String>, chain_id: u64, rpc_endpoint: impl Into<String>, native_symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain_id,
            rpc_endpoint: rpc_endpoint.into(),
            native_symbol: native_symbol.into(),
            explorer: None,
            tokens: Vec::new(),
            contracts: HashMap::new(),
            class: NetworkClass::from_chain_id(chain_id),
        }
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.tokens.push(token);
        self
    }

    pub fn with_contract(mut self, key: impl Into<String>, address: Address) -> Self {
        self.contracts.insert(key.into(), address);
        self
    }

    /// Configured contract address, or the caller's hardcoded fallback.
    pub fn contract_or(&self, key: &str, fallback: Address) -> Address {
        self.contracts.get(key).copied().unwrap_or(fallback)
    }

    pub fn contract(&self, key: &str) -> Option<Address> {
        self.contracts.get(key).copied()
    }

    pub fn token_by_symbol(&self, symbol: &str) -> Option<&Token> {
        let want = symbol.to_lowercase();
        self.tokens.iter().find(|t| t.get_symbol().to_lowercase() == want)
    }
}

/// Catalog of managed networks with tolerant lookup: queries match by chain
/// id, by exact normalized name, or by substring containment in either
/// direction ("pharos testnet" finds "Pharos", and vice versa).
#[derive(Clone, Debug, Default)]
pub struct NetworkRegistry {
    networks: Vec<NetworkDescriptor>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace(['-', '_', ' '], "")
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mut descriptor: NetworkDescriptor) {
        descriptor.class = NetworkClass::from_chain_id(descriptor.chain_id);
        self.networks.push(descriptor);
    }

    pub fn from_descriptors(descriptors: Vec<NetworkDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.insert(descriptor);
        }
        registry
    }

    pub fn get(&self, query: &str) -> Option<&NetworkDescriptor> {
        if let Ok(chain_id) = query.trim().parse::<u64>() {
            if let Some(found) = self.get_by_chain_id(chain_id) {
                return Some(found);
            }
        }

        let want = normalize(query);
        if want.is_empty() {
            return None;
        }
        if let Some(exact) = self.networks.iter().find(|n| normalize(&n.name) == want) {
            return Some(exact);
        }
        self.networks.iter().find(|n| {
            let have = normalize(&n.name);
            have.contains(&want) || want.contains(&have)
        })
    }

    pub fn get_by_chain_id(&self, chain_id: u64) -> Option<&NetworkDescriptor> {
        self.networks.iter().find(|n| n.chain_id == chain_id)
    }

    pub fn tokens_for(&self, query: &str) -> &[Token] {
        self.get(query).map(|n| n.tokens.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
