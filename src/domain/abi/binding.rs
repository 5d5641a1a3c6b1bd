//! User-entered argument values for the selected function

use std::collections::BTreeMap;

/// Raw parameter values keyed by parameter name (or `param<index>`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentBinding {
    values: BTreeMap<String, String>,
}

impl ArgumentBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value, replacing any previous value for the key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key`, treating an empty string as absent
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bound `(key, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ArgumentBinding {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut binding = Self::new();
        for (key, value) in iter {
            binding.set(key, value);
        }
        binding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_absent() {
        let binding: ArgumentBinding = [("owner", ""), ("amount", "5")].into_iter().collect();
        assert_eq!(binding.get("owner"), Some(""));
        assert_eq!(binding.non_empty("owner"), None);
        assert_eq!(binding.non_empty("amount"), Some("5"));
    }
}
