use std::collections::BTreeMap;

use intrin_core::{as_count, codes, kind_name, value_label, ErrorInfo, IntrinError, Value};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::declaration::IntrinsicDeclaration;

/// Initial resource data accepted when an interface is created.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceSeed {
    /// Entries of a name to count mapping.
    Mapping(Vec<(Value, Value)>),
    /// A list of `(name, count)` pairs.
    Pairs(Vec<(Value, Value)>),
}

impl ResourceSeed {
    /// Classifies dynamic seed data. Only the overall shape is checked here;
    /// individual entries are filtered when the seed is applied.
    pub fn from_value(value: &Value) -> Result<Self, IntrinError> {
        match value {
            Value::Object(map) => Ok(ResourceSeed::Mapping(
                map.iter()
                    .map(|(key, count)| (Value::String(key.clone()), count.clone()))
                    .collect(),
            )),
            Value::Array(items) => {
                let mut pairs = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    match item {
                        Value::Array(pair) if pair.len() == 2 => {
                            pairs.push((pair[0].clone(), pair[1].clone()))
                        }
                        other => {
                            return Err(malformed_shape(other).with_index(idx));
                        }
                    }
                }
                Ok(ResourceSeed::Pairs(pairs))
            }
            other => Err(malformed_shape(other).into_error()),
        }
    }

    pub fn from_map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        ResourceSeed::Mapping(
            entries
                .into_iter()
                .map(|(name, count)| (Value::String(name.into()), Value::from(count)))
                .collect(),
        )
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        ResourceSeed::Pairs(
            pairs
                .into_iter()
                .map(|(name, count)| (Value::String(name.into()), Value::from(count)))
                .collect(),
        )
    }

    fn entries(&self) -> &[(Value, Value)] {
        match self {
            ResourceSeed::Mapping(entries) | ResourceSeed::Pairs(entries) => entries,
        }
    }
}

struct MalformedShape(ErrorInfo);

impl MalformedShape {
    fn with_index(self, idx: usize) -> IntrinError {
        IntrinError::Resource(self.0.with_context("index", idx.to_string()))
    }

    fn into_error(self) -> IntrinError {
        IntrinError::Resource(self.0)
    }
}

fn malformed_shape(found: &Value) -> MalformedShape {
    MalformedShape(
        ErrorInfo::new(
            codes::MALFORMED_RESOURCE_SHAPE,
            format!(
                "resources must be a mapping of name to count or a list of (name, count) pairs, found {}",
                kind_name(found)
            ),
        )
        .with_context("found", kind_name(found))
        .with_hint("use {\"name\": count} or [[\"name\", count], ...]"),
    )
}

/// Declared capacity per resource name. Purely descriptive: nothing is
/// decremented or enforced against it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceLedger {
    capacities: BTreeMap<String, u64>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_capacity(&mut self, name: impl Into<String>, count: u64) {
        self.capacities.insert(name.into(), count);
    }

    /// Bulk upsert. Entries whose key is not a string or whose count is not a
    /// non-negative integer are dropped; returns how many were kept.
    pub fn set_capacities_from_mapping<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let mut kept = 0;
        for (key, count) in entries {
            match (&key, as_count(&count)) {
                (Value::String(name), Some(count)) => {
                    self.capacities.insert(name.clone(), count);
                    kept += 1;
                }
                _ => {
                    warn!(
                        key = %value_label(&key),
                        count = %value_label(&count),
                        "dropping malformed resource entry"
                    );
                }
            }
        }
        kept
    }

    pub fn apply_seed(&mut self, seed: &ResourceSeed) -> usize {
        self.set_capacities_from_mapping(seed.entries().iter().cloned())
    }

    pub fn capacity(&self, name: &str) -> Option<u64> {
        self.capacities.get(name).copied()
    }

    pub fn capacities(&self) -> &BTreeMap<String, u64> {
        &self.capacities
    }

    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    /// Declared capacity against summed consumption, for every resource that
    /// is either declared or consumed.
    pub fn usage<'a, I>(&self, declarations: I) -> Vec<ResourceUsage>
    where
        I: IntoIterator<Item = &'a IntrinsicDeclaration>,
    {
        let mut consumed: BTreeMap<&str, u64> = self
            .capacities
            .keys()
            .map(|name| (name.as_str(), 0))
            .collect();
        for declaration in declarations {
            for resource in declaration.consumes() {
                *consumed.entry(resource.name.as_str()).or_default() += resource.count;
            }
        }
        consumed
            .into_iter()
            .map(|(name, total)| self.usage_of(name, total))
            .collect()
    }

    /// Usage row for one resource given its summed consumption. Consumption of
    /// an undeclared resource is always over capacity.
    pub fn usage_of(&self, name: &str, consumed: u64) -> ResourceUsage {
        let capacity = self.capacity(name);
        ResourceUsage {
            name: name.to_string(),
            capacity,
            consumed,
            over_capacity: capacity.map_or(consumed > 0, |cap| consumed > cap),
        }
    }
}

/// One row of [`ResourceLedger::usage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub name: String,
    pub capacity: Option<u64>,
    pub consumed: u64,
    pub over_capacity: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pairs_with_wrong_arity_are_malformed() {
        let err = ResourceSeed::from_value(&json!([["a", 1], ["b"]])).unwrap_err();
        assert!(err.is(codes::MALFORMED_RESOURCE_SHAPE));
        assert_eq!(err.info().context["index"], "1");
    }

    #[test]
    fn scalar_seed_names_both_shapes() {
        let err = ResourceSeed::from_value(&json!("resource_A")).unwrap_err();
        assert!(err.info().message.contains("mapping of name to count"));
        assert!(err.info().message.contains("(name, count) pairs"));
        assert_eq!(err.info().context["found"], "string");
    }

    #[test]
    fn undeclared_consumption_counts_as_over_capacity() {
        let mut ledger = ResourceLedger::new();
        ledger.set_capacity("resource_A", 2);
        let decl = IntrinsicDeclaration::new(
            "iface_mma".to_string(),
            crate::Artifact::new("desc"),
            crate::Artifact::new("impl"),
            vec![
                crate::Resource::new("resource_A", 1),
                crate::Resource::new("resource_B", 1),
            ],
        );
        let usage = ledger.usage([&decl]);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].name, "resource_A");
        assert!(!usage[0].over_capacity);
        assert_eq!(usage[1].capacity, None);
        assert!(usage[1].over_capacity);
    }

    #[test]
    fn single_resource_rows() {
        let mut ledger = ResourceLedger::new();
        ledger.set_capacity("resource_A", 2);
        assert!(!ledger.usage_of("resource_A", 2).over_capacity);
        assert!(ledger.usage_of("resource_A", 3).over_capacity);
        assert!(!ledger.usage_of("resource_B", 0).over_capacity);
        let row = ledger.usage_of("resource_B", 1);
        assert_eq!(row.capacity, None);
        assert!(row.over_capacity);
    }
}
