#![allow(dead_code)]

//! Unit price lookups.
//!
//! A price table is a flat map from key to a non-negative amount in SEK.
//! Missing keys price at 0; there is no way to tell "unset" from a genuine
//! zero price, which is exactly the contract the calculator relies on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    entries: BTreeMap<String, f64>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut table = Self::new();
        for (key, price) in entries {
            table.insert(key, price);
        }
        table
    }

    /// Stores a price. Non-finite amounts are dropped so a lookup can never
    /// leak NaN into a quote.
    pub fn insert(&mut self, key: impl Into<String>, price: f64) {
        if price.is_finite() {
            self.entries.insert(key.into(), price);
        }
    }

    /// Unit price for `key`, 0 when absent.
    pub fn lookup(&self, key: &str) -> f64 {
        self.entries.get(key).copied().unwrap_or(0.0)
    }

    /// Lookup with an optional material scope. With a material the key is the
    /// composite `{material}_{key}`; without one the flat key is used as-is.
    pub fn lookup_scoped(&self, material: Option<&str>, key: &str) -> f64 {
        match material {
            Some(material) => self.lookup(&format!("{material}_{key}")),
            None => self.lookup(key),
        }
    }

    /// A copy of this table with `overrides` shadowing entries key-by-key.
    pub fn with_overrides(&self, overrides: &BTreeMap<String, f64>) -> PriceTable {
        let mut merged = self.clone();
        for (key, price) in overrides {
            merged.insert(key.clone(), *price);
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_prices_at_zero() {
        let table = PriceTable::new();
        assert_eq!(table.lookup("p_lucka_u1000"), 0.0);
    }

    #[test]
    fn scoped_lookup_uses_composite_key() {
        let table = PriceTable::from_entries([
            ("p_innerdor".to_string(), 900.0),
            ("ek_p_innerdor".to_string(), 1400.0),
        ]);
        assert_eq!(table.lookup_scoped(None, "p_innerdor"), 900.0);
        assert_eq!(table.lookup_scoped(Some("ek"), "p_innerdor"), 1400.0);
        // An unknown material misses and resolves to 0, never an error.
        assert_eq!(table.lookup_scoped(Some("teak"), "p_innerdor"), 0.0);
    }

    #[test]
    fn non_finite_prices_are_dropped() {
        let mut table = PriceTable::new();
        table.insert("p_stol", f64::NAN);
        table.insert("p_bord", f64::INFINITY);
        assert!(table.is_empty());
    }

    #[test]
    fn overrides_shadow_without_mutating_base() {
        let base = PriceTable::from_entries([("p_karm".to_string(), 500.0)]);
        let mut overrides = BTreeMap::new();
        overrides.insert("p_karm".to_string(), 650.0);
        overrides.insert("p_sidoljus".to_string(), 300.0);

        let merged = base.with_overrides(&overrides);
        assert_eq!(merged.lookup("p_karm"), 650.0);
        assert_eq!(merged.lookup("p_sidoljus"), 300.0);
        assert_eq!(base.lookup("p_karm"), 500.0);
    }
}
