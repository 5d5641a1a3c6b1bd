//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - ABI loading, argument coercion and result formatting
//! - Alloy-based chain and wallet clients

pub mod abi;
pub mod ethereum;

pub use abi::{AbiLoader, LoadedContract};
pub use ethereum::{AlloyChainClient, LocalWallet, NoWallet};
