use alloy_primitives::{Address, U256, address};

/// Zero address stands in for the native coin everywhere inside the crate.
pub const NATIVE: Address = Address::ZERO;

/// Placeholder some router families use for the native coin on the wire.
pub const ROUTER_NATIVE_PLACEHOLDER: Address = address!("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Canonical wrapped-native deployment shared by the OP-stack style testnets.
pub const WRAPPED_NATIVE: Address = address!("0x4200000000000000000000000000000000000006");

pub const MAX_ALLOWANCE: U256 = U256::MAX;

/// Aave-style variable interest rate mode.
pub const VARIABLE_INTEREST_MODE: u8 = 2;

#[non_exhaustive]
pub struct ChainId;

impl ChainId {
    pub const RISE: u64 = 11_155_931;
    pub const OPN: u64 = 984;
    pub const PHAROS: u64 = 688_689;
    pub const ARC: u64 = 5_042_002;
}

/// Fallback contract addresses used when the network configuration omits
/// the corresponding entry.
#[non_exhaustive]
pub struct FallbackContract;

impl FallbackContract {
    // Rise: single-hop AMM adapter router plus its mix adapter
    pub const AMM_ADAPTER_ROUTER: Address = address!("0x5eC9BEaCe4a0f46F77945D54511e2b454cb8F38E");
    pub const AMM_MIX_ADAPTER: Address = address!("0x4f8c8e05e946de09d768d062c5e969d1c8920c72");

    // OPN: minimal path router
    pub const MINIMAL_PATH_ROUTER: Address = address!("0xb489bce5c9c9364da2d1d1bc5ce4274f63141885");

    // Pharos: padded multi-hop pool router and the lending pool
    pub const PADDED_POOL_ROUTER: Address = address!("0x1E656B2C6B6e91ef6E6A2B16475Df7b7D223e3c2");
    pub const LENDING_POOL: Address = address!("0x62e72185f7deabda9f6a3df3b23d67530b42eff6");
}

/// Raw function selectors for contracts whose ABI is called by selector.
#[non_exhaustive]
pub struct Selector;

impl Selector {
    pub const SUBSCRIBE: [u8; 4] = [0xef, 0x27, 0x20, 0x20];
    pub const SUPPLY: [u8; 4] = [0x61, 0x7b, 0xa0, 0x37];
    pub const BORROW: [u8; 4] = [0xa4, 0x15, 0xbc, 0xad];
}

/// Conservative gas limits per operation shape, applied when no estimate
/// is available.
#[non_exhaustive]
pub struct GasLimit;

impl GasLimit {
    pub const TRANSFER: u64 = 21_000;
    pub const APPROVE: u64 = 45_000;
    pub const SWAP: u64 = 200_000;
    pub const LENDING: u64 = 350_000;
    pub const SUBSCRIBE: u64 = 150_000;
}

pub const GWEI: u128 = 1_000_000_000;

/// Native balance kept back on gas-reserved chains, in wei (0.02 coin).
pub const NATIVE_GAS_RESERVE_WEI: u128 = 20_000_000_000_000_000;

/// Swap deadline horizon in seconds.
pub const SWAP_DEADLINE_SECS: u64 = 1_200;
