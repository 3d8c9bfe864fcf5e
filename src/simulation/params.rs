//! Flat key–value parameter intake
//!
//! Kind selection and per-kind numeric overrides (pendulum length, spring
//! constant, RNG seed, ...) arrive from the request layer as a flat map. Missing
//! keys fall back to the documented default of the kind; present keys must hold
//! finite numbers inside the kind's valid domain.

use std::collections::BTreeMap;

use crate::error::{LabError, Result};

/// Numeric overrides for one experiment session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentParams {
    values: BTreeMap<String, f32>,
}

impl ExperimentParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: f32) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn set(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), value);
    }

    /// Parse `key=value` pairs such as `length=2.5`
    pub fn parse_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, raw) = pair
                .split_once('=')
                .ok_or_else(|| LabError::invalid_parameter(pair, "expected key=value"))?;
            let key = key.trim();
            let value = raw.trim().parse::<f32>().map_err(|_| {
                LabError::invalid_parameter(key, format!("`{}` is not a number", raw.trim()))
            })?;
            params.set(key, value);
        }
        Ok(params)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Finite value for `key`, or `default` when absent
    pub fn get_or(&self, key: &str, default: f32) -> Result<f32> {
        match self.values.get(key) {
            Some(&value) if value.is_finite() => Ok(value),
            Some(&value) => Err(LabError::invalid_parameter(
                key,
                format!("{} is not finite", value),
            )),
            None => {
                log::debug!("parameter `{}` absent, using default {}", key, default);
                Ok(default)
            }
        }
    }

    /// Like [`get_or`](Self::get_or) but the value must be strictly positive
    pub fn positive_or(&self, key: &str, default: f32) -> Result<f32> {
        let value = self.get_or(key, default)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(LabError::invalid_parameter(
                key,
                format!("{} must be greater than zero", value),
            ))
        }
    }

    pub fn non_negative_or(&self, key: &str, default: f32) -> Result<f32> {
        let value = self.get_or(key, default)?;
        if value >= 0.0 {
            Ok(value)
        } else {
            Err(LabError::invalid_parameter(
                key,
                format!("{} must not be negative", value),
            ))
        }
    }

    /// Integer seed for deterministic randomized layouts
    pub fn seed_or(&self, key: &str, default: u64) -> Result<u64> {
        match self.values.get(key) {
            None => Ok(default),
            Some(&value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => {
                Ok(value as u64)
            }
            Some(&value) => Err(LabError::invalid_parameter(
                key,
                format!("{} is not a non-negative integer", value),
            )),
        }
    }
}

impl<'a> FromIterator<(&'a str, f32)> for ExperimentParams {
    fn from_iter<T: IntoIterator<Item = (&'a str, f32)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}
