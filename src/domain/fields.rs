#![allow(dead_code)]

//! Raw form values and their numeric coercion rules.
//!
//! Every field referenced by the calculator either resolves to a value or
//! behaves as zero/false. Parsing never fails: garbage input is worth 0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A raw value as entered in the form: free text or a checkbox state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn flag(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Immutable capture of the form's field values for one compute cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    #[serde(flatten)]
    values: BTreeMap<String, FieldValue>,
}

impl FieldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: impl Into<String>, value: FieldValue) {
        self.values.insert(id.into(), value);
    }

    pub fn set_text(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.set(id, FieldValue::Text(value.into()));
    }

    pub fn set_flag(&mut self, id: impl Into<String>, value: bool) {
        self.set(id, FieldValue::Flag(value));
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// Raw text of a field, `""` when absent or a checkbox.
    pub fn text(&self, id: &str) -> &str {
        match self.values.get(id) {
            Some(FieldValue::Text(value)) => value.as_str(),
            _ => "",
        }
    }

    /// Parses a field as a finite float. Missing fields, checkboxes,
    /// unparseable or non-finite input all read as 0.
    pub fn read_number(&self, id: &str) -> f64 {
        self.text(id)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }

    /// `read_number` truncated toward zero. Negative input passes through;
    /// callers accept negative quantities as valid.
    pub fn read_int(&self, id: &str) -> i64 {
        self.read_number(id).trunc() as i64
    }

    pub fn read_flag(&self, id: &str) -> bool {
        matches!(self.values.get(id), Some(FieldValue::Flag(true)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for FieldSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
