//! ABI infrastructure - loading, argument coercion and result formatting

pub mod coercer;
pub mod formatter;
mod loader;

pub use coercer::{coerce, coerce_arguments};
pub use formatter::{format_fixed, format_result, format_units, format_value};
pub use loader::{AbiLoader, LoadedContract};
