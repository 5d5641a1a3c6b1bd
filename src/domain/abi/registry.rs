//! Function table - dispatches loaded functions by selector

use std::collections::HashMap;

use super::{FunctionDescriptor, FunctionKind};
use crate::error::{PlaygroundError, Result};

/// Functions of one loaded contract, in ABI order, indexed by selector
#[derive(Debug, Default, Clone)]
pub struct FunctionTable {
    functions: Vec<FunctionDescriptor>,
    by_selector: HashMap<[u8; 4], usize>,
}

impl FunctionTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a function descriptor
    ///
    /// Note: First function for a given selector wins (no overwrite).
    /// Returns false when the entry was dropped as a duplicate.
    pub fn insert(&mut self, function: FunctionDescriptor) -> bool {
        if self.by_selector.contains_key(&function.selector) {
            return false;
        }
        self.by_selector
            .insert(function.selector, self.functions.len());
        self.functions.push(function);
        true
    }

    /// Look up a function by selector
    pub fn lookup(&self, selector: [u8; 4]) -> Option<&FunctionDescriptor> {
        self.by_selector
            .get(&selector)
            .and_then(|&idx| self.functions.get(idx))
    }

    /// Look up a function by selector hex string (e.g., "0xa9059cbb")
    pub fn lookup_hex(&self, selector_hex: &str) -> Option<&FunctionDescriptor> {
        let normalized = selector_hex
            .strip_prefix("0x")
            .or_else(|| selector_hex.strip_prefix("0X"))
            .unwrap_or(selector_hex);

        if normalized.len() != 8 {
            return None;
        }

        let bytes = hex::decode(normalized).ok()?;
        let selector: [u8; 4] = bytes.try_into().ok()?;
        self.lookup(selector)
    }

    /// Resolve a user reference: a selector, a full signature, or a bare name
    ///
    /// A bare name shared by several overloads is ambiguous and must be
    /// given as a signature or selector instead.
    pub fn find(&self, reference: &str) -> Result<&FunctionDescriptor> {
        let reference = reference.trim();

        if let Some(function) = self.lookup_hex(reference) {
            return Ok(function);
        }
        if let Some(function) = self.functions.iter().find(|f| f.signature == reference) {
            return Ok(function);
        }

        let mut matches = self.functions.iter().filter(|f| f.name == reference);
        match (matches.next(), matches.next()) {
            (Some(function), None) => Ok(function),
            (Some(_), Some(_)) => Err(PlaygroundError::validation(format!(
                "Function '{}' is overloaded; select it by signature or selector",
                reference
            ))),
            (None, _) => Err(PlaygroundError::validation(format!(
                "Unknown function: {}",
                reference
            ))),
        }
    }

    /// Read functions in ABI order
    pub fn reads(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.of_kind(FunctionKind::Read)
    }

    /// Write functions in ABI order
    pub fn writes(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.of_kind(FunctionKind::Write)
    }

    /// Get the number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn of_kind(&self, kind: FunctionKind) -> impl Iterator<Item = &FunctionDescriptor> {
        self.functions.iter().filter(move |f| f.kind == kind)
    }
}
