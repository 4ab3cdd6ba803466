#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::entities::EngineConfig;
use super::fields::{FieldSnapshot, FieldValue};
use super::price_table::PriceTable;

/// Where the session's price table came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceOrigin {
    Network,
    DiskCache,
    Embedded,
}

impl PriceOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            PriceOrigin::Network => "Hämtad från server",
            PriceOrigin::DiskCache => "Offline-cache",
            PriceOrigin::Embedded => "Inbyggd prislista",
        }
    }
}

/// Load state of the one-shot price fetch. Until it resolves the calculator
/// runs against an empty table and every output is a structurally correct
/// zero/placeholder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PriceStatus {
    #[default]
    Pending,
    Loaded {
        origin: PriceOrigin,
        fetched_at: SystemTime,
    },
    Failed,
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Current raw form values. The compute cycle reads these through an
    /// immutable snapshot, never the widgets.
    pub fields: FieldSnapshot,
    /// Price table as loaded for this session, read-only once set.
    pub base_prices: PriceTable,
    /// User-edited unit prices, shadowing the loaded table key-by-key.
    pub price_overrides: BTreeMap<String, f64>,
    pub config: EngineConfig,
    /// Optional URL of the external price JSON; unset means offline only.
    pub price_url: Option<String>,
    pub price_status: PriceStatus,
}

impl AppState {
    pub fn set_field(&mut self, id: &str, value: FieldValue) {
        self.fields.set(id, value);
    }

    /// The table the engine actually computes against.
    pub fn effective_prices(&self) -> PriceTable {
        self.base_prices.with_overrides(&self.price_overrides)
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.fields = persisted.fields;
        self.price_overrides = persisted.price_overrides;
        self.config = persisted.config;
        self.price_url = persisted.price_url;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            fields: self.fields.clone(),
            price_overrides: self.price_overrides.clone(),
            config: self.config.clone(),
            price_url: self.price_url.clone(),
        }
    }
}

/// Everything restored verbatim on the next launch: raw field values, price
/// overrides and the policy knobs. Computed amounts are never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub fields: FieldSnapshot,
    #[serde(default)]
    pub price_overrides: BTreeMap<String, f64>,
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub price_url: Option<String>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            fields: FieldSnapshot::new(),
            price_overrides: BTreeMap::new(),
            config: EngineConfig::default(),
            price_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_state_round_trips_raw_values() {
        let mut state = AppState::default();
        state.set_field("stol", FieldValue::text("3"));
        state.set_field("spec_utv", FieldValue::flag(true));
        state.price_overrides.insert("p_stol".to_string(), 175.0);
        state.price_url = Some("https://priser.example.se/priser.json".to_string());

        let json = serde_json::to_string(&state.to_persisted()).unwrap();
        let restored: PersistedState = serde_json::from_str(&json).unwrap();

        let mut fresh = AppState::default();
        fresh.apply_persisted(restored);
        assert_eq!(fresh.fields, state.fields);
        assert_eq!(fresh.price_overrides, state.price_overrides);
        assert_eq!(fresh.price_url, state.price_url);
    }

    #[test]
    fn effective_prices_overlay_the_loaded_table() {
        let mut state = AppState::default();
        state.base_prices = PriceTable::from_entries([("p_stol".to_string(), 150.0)]);
        state.price_overrides.insert("p_stol".to_string(), 200.0);

        assert_eq!(state.effective_prices().lookup("p_stol"), 200.0);
        assert_eq!(state.base_prices.lookup("p_stol"), 150.0);
    }
}
