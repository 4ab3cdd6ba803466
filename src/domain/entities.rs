#![allow(dead_code)]

//! Quote domain types.
//!
//! Everything here is derived fresh on every compute cycle and never mutated
//! in place; a cycle produces one immutable [`QuoteResult`].

use serde::{Deserialize, Serialize};

/// Shape of the custom-dimension job. A panel is priced on a single face,
/// anything else on the full box surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    #[default]
    Panel,
    Furniture,
}

impl ShapeType {
    /// Maps the raw `spec_typ` selector value. Unknown input falls back to
    /// the panel formula, matching the form's default selection.
    pub fn from_field(raw: &str) -> Self {
        match raw.trim() {
            "mobel" => ShapeType::Furniture,
            _ => ShapeType::Panel,
        }
    }

    pub fn field_value(self) -> &'static str {
        match self {
            ShapeType::Panel => "skiva",
            ShapeType::Furniture => "mobel",
        }
    }

    pub fn area_price_key(self) -> &'static str {
        match self {
            ShapeType::Panel => "p_spec_skiva_m2",
            ShapeType::Furniture => "p_spec_mobel_m2",
        }
    }
}

/// One priced catalog row: quantity times unit price.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    pub id: &'static str,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

impl LineItem {
    /// Lines without a positive quantity render as a placeholder, not 0 kr.
    pub fn display(&self) -> bool {
        self.quantity > 0.0
    }
}

/// A fixed-price add-on billed as count times unit price.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtraLine {
    pub field: String,
    pub count: i64,
    pub unit_price: f64,
    pub amount: f64,
}

/// Outcome of the custom-dimension sub-calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct SpecialResult {
    pub shape: ShapeType,
    pub count: i64,
    /// Painted surface in m², already scaled by count.
    pub area_m2: f64,
    pub side_count: u8,
    pub subtotal: f64,
}

/// All aggregate amounts of one compute cycle, in SEK.
#[derive(Clone, Debug, PartialEq)]
pub struct TotalsResult {
    pub material_subtotal: f64,
    pub special_subtotal: f64,
    /// Material plus special, before extras.
    pub belopp: f64,
    pub extras_subtotal: f64,
    pub pre_discount_subtotal: f64,
    pub discount_percent: i64,
    pub discount_amount: f64,
    pub post_discount_subtotal: f64,
    /// Post-discount total at the fixed ROT ratio, shown alongside VAT.
    pub reduced_ratio_total: f64,
    pub vat_rate: f64,
    pub vat_inclusive_total: f64,
}

/// Fully determined output of one compute cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteResult {
    pub lines: Vec<LineItem>,
    pub special: SpecialResult,
    pub extras: Vec<ExtraLine>,
    pub totals: TotalsResult,
}

/// Side-surcharge policy for the custom-dimension job. The two deployed
/// rules differ steeply (10 %/side vs 100 %/side), so the rate is explicit
/// configuration rather than a hardcoded branch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SideSurcharge {
    /// Percent per selected side read from the price table (value 10 means
    /// 10 % per side).
    RateKey { key: String },
    /// Fixed multiplier per selected side; 1.0 reproduces the 100 %/side rule.
    PerSide { rate: f64 },
}

/// How the VAT rate is obtained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VatPolicy {
    /// A numeric percent field (25 means 25 %).
    PercentField { field: String },
    /// A checkbox implying a fixed rate when set, 0 when not.
    Toggle { field: String, rate: f64 },
}

/// One configured extra, e.g. prep work or travel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtraSpec {
    pub field: String,
    pub price_key: String,
    pub label: String,
}

impl ExtraSpec {
    pub fn new(field: &str, price_key: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            price_key: price_key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Behavioral knobs of the calculator. Defaults match the workshop's live
/// form: flat price keys, table-driven side rate, VAT percent field, travel
/// billed per visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// When set, line-item prices use composite `{material}_p_{item}` keys
    /// with the material read from this field.
    pub material_field: Option<String>,
    pub side_surcharge: SideSurcharge,
    pub vat: VatPolicy,
    pub extras: Vec<ExtraSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            material_field: None,
            side_surcharge: SideSurcharge::RateKey {
                key: "p_paslag_side_pct".to_string(),
            },
            vat: VatPolicy::PercentField {
                field: "vat".to_string(),
            },
            extras: vec![
                ExtraSpec::new("spackling", "p_spackling", "Spackling"),
                ExtraSpec::new("stallkostnad", "p_stallkostnad", "Ställkostnad"),
                ExtraSpec::new("besok", "p_besok", "Resor/besök"),
            ],
        }
    }
}

impl EngineConfig {
    /// Preset for the material-keyed deployment: composite price keys,
    /// full surcharge per side, fixed-rate VAT toggle, colour extra instead
    /// of travel.
    pub fn material_keyed(material_field: &str) -> Self {
        Self {
            material_field: Some(material_field.to_string()),
            side_surcharge: SideSurcharge::PerSide { rate: 1.0 },
            vat: VatPolicy::Toggle {
                field: "moms".to_string(),
                rate: 0.25,
            },
            extras: vec![
                ExtraSpec::new("spackling", "p_spackling", "Spackling"),
                ExtraSpec::new("stallkostnad", "p_stallkostnad", "Ställkostnad"),
                ExtraSpec::new("kulor", "p_kulor", "Kulörtillägg"),
            ],
        }
    }
}
