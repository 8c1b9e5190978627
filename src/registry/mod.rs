pub mod class;
pub mod network;
pub mod token;

pub use class::{ActionKind, NetworkClass, WeightTable};
pub use network::{NetworkDescriptor, NetworkRegistry};
pub use token::Token;
