//! ABI domain models
//!
//! This module defines the display model derived from a contract ABI,
//! independent of how the ABI text was obtained.

mod binding;
mod function;
mod registry;
mod types;

pub use binding::ArgumentBinding;
pub use function::{FunctionDescriptor, FunctionKind, ParamSpec};
pub use registry::FunctionTable;
pub use types::{ParamType, TupleField};
