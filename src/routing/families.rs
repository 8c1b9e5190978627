use crate::constants::ChainId;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The four mutually incompatible router protocols behind the resolver.
/// Exactly one family is primary per chain; the binding happens once, here.
#[derive(Copy, Clone, Debug, Display, PartialEq, Hash, Eq, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouterFamily {
    /// Single-hop AMM adapter router (mixSwap-style argument arrays).
    AmmAdapter,
    /// Padded multi-hop pool router (fixed 11-slot route, 5-row matrix).
    PaddedPool,
    /// Command-based router driven by opcode bytes plus ABI blobs.
    Universal,
    /// Exact-in path router with separate wrap handling.
    MinimalPath,
}

impl RouterFamily {
    pub fn for_chain(chain_id: u64) -> Option<Self> {
        match chain_id {
            ChainId::RISE => Some(RouterFamily::AmmAdapter),
            ChainId::PHAROS => Some(RouterFamily::PaddedPool),
            ChainId::ARC => Some(RouterFamily::Universal),
            ChainId::OPN => Some(RouterFamily::MinimalPath),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_family_per_chain() {
        assert_eq!(RouterFamily::for_chain(ChainId::RISE), Some(RouterFamily::AmmAdapter));
        assert_eq!(RouterFamily::for_chain(ChainId::PHAROS), Some(RouterFamily::PaddedPool));
        assert_eq!(RouterFamily::for_chain(ChainId::ARC), Some(RouterFamily::Universal));
        assert_eq!(RouterFamily::for_chain(ChainId::OPN), Some(RouterFamily::MinimalPath));
        assert_eq!(RouterFamily::for_chain(1), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(RouterFamily::AmmAdapter.to_string(), "AMM_ADAPTER");
        assert_eq!(RouterFamily::PaddedPool.to_string(), "PADDED_POOL");
    }
}
