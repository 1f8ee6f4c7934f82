//! Serializable option snapshots used for history and generic configuration.

use std::collections::BTreeMap;

use crate::foundation::{
    core::Rgba,
    error::{RetouchError, RetouchResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<f64>),
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for OptionValue {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<f64>> for OptionValue {
    fn from(v: Vec<f64>) -> Self {
        Self::List(v)
    }
}

impl From<[f32; 2]> for OptionValue {
    fn from(v: [f32; 2]) -> Self {
        Self::List(v.iter().map(|c| f64::from(*c)).collect())
    }
}

impl From<Rgba> for OptionValue {
    fn from(c: Rgba) -> Self {
        Self::List(c.to_array().iter().map(|v| f64::from(*v)).collect())
    }
}

/// Option name to value. Ordered so that serialized snapshots are stable.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// Typed access to an [`OptionMap`] for one operation.
///
/// Every getter returns `Ok(None)` when the key is absent and a `Validation` error when the
/// value has the wrong shape.
pub struct OptionReader<'a> {
    operation: &'static str,
    map: &'a OptionMap,
}

impl<'a> OptionReader<'a> {
    /// Fails on keys outside `known`.
    pub fn new(
        operation: &'static str,
        map: &'a OptionMap,
        known: &[&str],
    ) -> RetouchResult<Self> {
        if let Some(key) = map.keys().find(|k| !known.contains(&k.as_str())) {
            return Err(RetouchError::validation(format!(
                "{operation}: unknown option '{key}'"
            )));
        }
        Ok(Self { operation, map })
    }

    fn mismatch(&self, key: &str, expected: &str) -> RetouchError {
        RetouchError::validation(format!(
            "{}: option '{key}' must be {expected}",
            self.operation
        ))
    }

    pub fn number(&self, key: &str) -> RetouchResult<Option<f32>> {
        match self.map.get(key) {
            None => Ok(None),
            Some(OptionValue::Number(v)) if v.is_finite() => Ok(Some(*v as f32)),
            Some(_) => Err(self.mismatch(key, "a finite number")),
        }
    }

    pub fn bool(&self, key: &str) -> RetouchResult<Option<bool>> {
        match self.map.get(key) {
            None => Ok(None),
            Some(OptionValue::Bool(v)) => Ok(Some(*v)),
            Some(_) => Err(self.mismatch(key, "a boolean")),
        }
    }

    pub fn text(&self, key: &str) -> RetouchResult<Option<&'a str>> {
        match self.map.get(key) {
            None => Ok(None),
            Some(OptionValue::Text(v)) => Ok(Some(v.as_str())),
            Some(_) => Err(self.mismatch(key, "a string")),
        }
    }

    /// Normalized `[x, y]` pair.
    pub fn point(&self, key: &str) -> RetouchResult<Option<[f32; 2]>> {
        match self.map.get(key) {
            None => Ok(None),
            Some(OptionValue::List(v)) if v.len() == 2 && v.iter().all(|c| c.is_finite()) => {
                Ok(Some([v[0] as f32, v[1] as f32]))
            }
            Some(_) => Err(self.mismatch(key, "a list of two numbers")),
        }
    }

    pub fn color(&self, key: &str) -> RetouchResult<Option<Rgba>> {
        match self.map.get(key) {
            None => Ok(None),
            Some(OptionValue::List(v)) => Rgba::from_slice(v)
                .map(Some)
                .map_err(|_| self.mismatch(key, "3 or 4 colour channels in [0, 1]")),
            Some(_) => Err(self.mismatch(key, "a colour list")),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/options.rs"]
mod tests;
