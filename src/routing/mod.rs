pub mod commands;
pub mod encoder;
pub mod families;
pub mod resolver;
pub mod route_spec;

pub use commands::{RouterCommand, lower_program};
pub use families::RouterFamily;
pub use resolver::{RouteResolver, SwapIntent, SwapPlan};
pub use route_spec::{HOP_COLS, HOP_ROWS, Hop, MAX_HOPS, ROUTE_CAPACITY, RouteError, RouteSpec};
