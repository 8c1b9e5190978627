use crate::constants::ChainId;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The four schedulable action kinds. Composite kinds resolve to a concrete
/// operation only inside the scheduler, with a coin flip.
#[derive(Clone, Copy, Debug, Display, EnumString, EnumIter, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    #[strum(serialize = "transfer")]
    #[serde(rename = "transfer")]
    Transfer,
    #[strum(serialize = "swap")]
    #[serde(rename = "swap")]
    Swap,
    #[strum(serialize = "subscribe_stake")]
    #[serde(rename = "subscribe_stake")]
    SubscribeOrStake,
    #[strum(serialize = "lend_borrow")]
    #[serde(rename = "lend_borrow")]
    LendOrBorrow,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [ActionKind::Transfer, ActionKind::Swap, ActionKind::SubscribeOrStake, ActionKind::LendOrBorrow];
}

/// Relative selection weights for the four action kinds on one network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTable {
    #[serde(default)]
    pub transfer: u32,
    #[serde(default)]
    pub swap: u32,
    #[serde(default)]
    pub subscribe_stake: u32,
    #[serde(default)]
    pub lend_borrow: u32,
}

impl WeightTable {
    pub const fn new(transfer: u32, swap: u32, subscribe_stake: u32, lend_borrow: u32) -> Self {
        Self { transfer, swap, subscribe_stake, lend_borrow }
    }

    pub fn get(&self, kind: ActionKind) -> u32 {
        match kind {
            ActionKind::Transfer => self.transfer,
            ActionKind::Swap => self.swap,
            ActionKind::SubscribeOrStake => self.subscribe_stake,
            ActionKind::LendOrBorrow => self.lend_borrow,
        }
    }

    pub fn entries(&self) -> [(ActionKind, u32); 4] {
        [
            (ActionKind::Transfer, self.transfer),
            (ActionKind::Swap, self.swap),
            (ActionKind::SubscribeOrStake, self.subscribe_stake),
            (ActionKind::LendOrBorrow, self.lend_borrow),
        ]
    }

    pub fn total(&self) -> u64 {
        self.transfer as u64 + self.swap as u64 + self.subscribe_stake as u64 + self.lend_borrow as u64
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

/// Behavioral classification of a network, resolved exactly once from the
/// chain id when a descriptor enters the registry. Downstream code matches
/// on the tag and never re-inspects network names.
#[derive(Clone, Copy, Debug, Default, Display, EnumString, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkClass {
    #[strum(serialize = "lending_oriented")]
    LendingOriented,
    #[strum(serialize = "transfer_oriented")]
    TransferOriented,
    #[strum(serialize = "swap_oriented")]
    SwapOriented,
    #[default]
    #[strum(serialize = "unclassified")]
    Unclassified,
}

impl NetworkClass {
    pub fn from_chain_id(chain_id: u64) -> Self {
        match chain_id {
            ChainId::PHAROS => NetworkClass::LendingOriented,
            ChainId::RISE => NetworkClass::TransferOriented,
            ChainId::OPN | ChainId::ARC => NetworkClass::SwapOriented,
            _ => NetworkClass::Unclassified,
        }
    }

    /// Weight table installed when a network has no explicit override.
    /// Unclassified networks get an even four-way split.
    pub fn default_weights(&self) -> WeightTable {
        match self {
            NetworkClass::LendingOriented => WeightTable::new(0, 0, 30, 70),
            NetworkClass::TransferOriented => WeightTable::new(100, 0, 0, 0),
            NetworkClass::SwapOriented => WeightTable::new(20, 80, 0, 0),
            NetworkClass::Unclassified => WeightTable::new(25, 25, 25, 25),
        }
    }
}
