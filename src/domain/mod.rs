//! Domain layer - models and contracts independent of alloy transports

pub mod abi;
pub mod chain;
