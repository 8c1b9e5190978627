use alloy_primitives::{Address, U256, utils::Unit};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// ERC-20 (or native) asset as listed in a network descriptor. Decimals stay
/// optional: test-network token lists are frequently incomplete and the
/// fallback decision belongs to the amount policy, not the catalog.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Token {
    address: Address,
    symbol: Option<String>,
    decimals: Option<u8>,
    /// Pool or pair contract this token trades through on its home network,
    /// when the router family needs one spelled out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pool: Option<Address>,
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Token {}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address.cmp(&other.address)
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Token {
    pub fn new(address: Address) -> Token {
        Token { address, ..Token::default() }
    }

    pub fn new_with_data(address: Address, symbol: Option<String>, decimals: Option<u8>) -> Token {
        Token { address, symbol, decimals, pool: None }
    }

    pub fn with_pool(mut self, pool: Address) -> Token {
        self.pool = Some(pool);
        self
    }

    pub fn pool(&self) -> Option<Address> {
        self.pool
    }

    // For testing purposes
    pub fn random() -> Token {
        Token::new(Address::random())
    }

    // For testing purposes
    pub fn repeat_byte(byte: u8) -> Token {
        Token::new(Address::repeat_byte(byte))
    }

    pub fn get_address(&self) -> Address {
        self.address
    }

    pub fn get_symbol(&self) -> String {
        self.symbol.clone().unwrap_or(self.address.to_string())
    }

    pub fn decimals(&self) -> Option<u8> {
        self.decimals
    }

    pub fn is_native(&self) -> bool {
        self.address.is_zero()
    }

    pub fn exp(decimals: u8) -> U256 {
        if decimals == 18 { Unit::ETHER.wei() } else { U256::from(10).pow(U256::from(decimals)) }
    }

    /// Smallest units -> human units, given resolved decimals.
    pub fn to_float(value: U256, decimals: u8) -> f64 {
        if decimals == 0 {
            return u64::try_from(value).map(|v| v as f64).unwrap_or(0f64);
        }
        let divider = Self::exp(decimals);
        let ret = value.div_rem(divider);

        let div = u64::try_from(ret.0);
        let rem = u64::try_from(ret.1);

        if div.is_err() || rem.is_err() {
            0f64
        } else {
            div.unwrap_or_default() as f64 + ((rem.unwrap_or_default() as f64) / (10u64.pow(decimals as u32) as f64))
        }
    }

    /// Human units -> smallest units, flooring any sub-unit residue.
    pub fn from_float(value: f64, decimals: u8) -> U256 {
        if value <= 0.0 || !value.is_finite() {
            return U256::ZERO;
        }
        let whole = value.floor();
        let frac = value - whole;
        let scale = 10u64.pow(decimals.min(18) as u32) as f64;
        let frac_units = U256::from((frac * scale).floor() as u128);
        let whole_units = U256::from(whole as u128) * Self::exp(decimals.min(18));
        if decimals > 18 {
            // Scale the 18-decimal intermediate up without losing the fraction.
            (whole_units + frac_units) * U256::from(10).pow(U256::from(decimals - 18))
        } else {
            whole_units + frac_units
        }
    }
}
