use serde::Serialize;
use std::collections::BTreeMap;

/// Field names owned by the typed record fields
const CORE_FIELDS: [&str; 4] = ["price", "name", "brand", "model"];

/// Fields extracted from one product detail page
///
/// Every field is optional. Absent fields are left out of the JSON entirely,
/// so an empty record serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    /// Price in the smallest currency unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Specification table entries keyed by lower-cased header
    #[serde(flatten)]
    pub specs: BTreeMap<String, String>,
}

impl ProductRecord {
    /// Adds a specification entry, replacing any earlier value for the key
    ///
    /// Returns false if the key names a core field; those entries are dropped.
    pub fn insert_spec(&mut self, key: String, value: String) -> bool {
        if CORE_FIELDS.contains(&key.as_str()) {
            return false;
        }
        self.specs.insert(key, value);
        true
    }

    /// Returns true if no field was extracted
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.name.is_none()
            && self.brand.is_none()
            && self.model.is_none()
            && self.specs.is_empty()
    }

    /// Number of populated fields
    pub fn field_count(&self) -> usize {
        [
            self.price.is_some(),
            self.name.is_some(),
            self.brand.is_some(),
            self.model.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
            + self.specs.len()
    }
}
