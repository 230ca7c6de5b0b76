mod aliases;
mod coerce;

use std::collections::HashMap;

use anyhow::{Result, bail};
use tracing::trace;

pub use aliases::{load_alias_tsv, load_builtin_aliases, merge_aliases};
pub use coerce::RawValue;

pub const HOSPITAL_DAYS_FEATURE: &str = "Hospital days before ICU admission";

/// Accepted spellings of the hospital-days field, highest priority first.
pub const HOSPITAL_DAYS_KEYS: [&str; 3] = ["hospital-days", "hospital_days", "hospitalDays"];

pub type Payload = HashMap<String, RawValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDef {
    pub key: String,
    pub feature: String,
}

#[derive(Debug, Clone)]
pub struct FeatureSchema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            bail!("feature list is empty");
        }
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                bail!("feature {} has an empty name", i);
            }
            if let Some(first) = index.insert(name.clone(), i) {
                bail!(
                    "duplicate feature '{}' at position {} (first at {})",
                    name,
                    i,
                    first
                );
            }
        }
        Ok(Self { names, index })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// One model input row. Always holds exactly the schema's columns, in order.
#[derive(Debug, Clone)]
pub struct FeatureRow<'a> {
    schema: &'a FeatureSchema,
    values: Vec<i64>,
}

impl<'a> FeatureRow<'a> {
    pub fn zeros(schema: &'a FeatureSchema) -> Self {
        Self {
            schema,
            values: vec![0; schema.len()],
        }
    }

    /// Returns false when the schema has no such feature.
    pub fn set(&mut self, feature: &str, value: i64) -> bool {
        match self.schema.position(feature) {
            Some(pos) => {
                self.values[pos] = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, feature: &str) -> Option<i64> {
        self.schema.position(feature).map(|pos| self.values[pos])
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.schema
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn to_f64(&self) -> Vec<f64> {
        self.values.iter().map(|&v| v as f64).collect()
    }
}

#[derive(Debug, Clone)]
pub struct FeatureMapper {
    aliases: Vec<AliasDef>,
}

impl FeatureMapper {
    pub fn new(aliases: Vec<AliasDef>) -> Self {
        Self { aliases }
    }

    pub fn builtin() -> Self {
        Self::new(load_builtin_aliases())
    }

    pub fn aliases(&self) -> &[AliasDef] {
        &self.aliases
    }

    /// Aliases whose target feature is absent from `schema`.
    pub fn unresolved<'s>(&'s self, schema: &FeatureSchema) -> Vec<&'s AliasDef> {
        self.aliases
            .iter()
            .filter(|a| schema.position(&a.feature).is_none())
            .collect()
    }

    pub fn build_row<'a>(&self, schema: &'a FeatureSchema, payload: &Payload) -> FeatureRow<'a> {
        let mut row = FeatureRow::zeros(schema);

        let hospital_days = resolve_hospital_days(payload);
        row.set(HOSPITAL_DAYS_FEATURE, hospital_days);

        for alias in &self.aliases {
            if HOSPITAL_DAYS_KEYS.contains(&alias.key.as_str()) {
                continue;
            }
            if let Some(raw) = payload.get(&alias.key) {
                row.set(&alias.feature, coerce_or_zero(&alias.key, raw));
            }
        }

        row
    }
}

/// First non-blank spelling wins. Negative counts are clamped to 0.
fn resolve_hospital_days(payload: &Payload) -> i64 {
    for key in HOSPITAL_DAYS_KEYS {
        match payload.get(key) {
            Some(raw) if !raw.is_blank() => return coerce_or_zero(key, raw).max(0),
            _ => {}
        }
    }
    0
}

fn coerce_or_zero(key: &str, raw: &RawValue) -> i64 {
    raw.to_int().unwrap_or_else(|| {
        trace!(key, value = ?raw, "non-integer field defaulted to 0");
        0
    })
}
