//! Ethereum infrastructure - Alloy provider and wallet implementations

mod provider;
mod wallet;

pub use provider::AlloyChainClient;
pub use wallet::{LocalWallet, NoWallet};
