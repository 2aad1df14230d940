//! Entradas de metadata categorizadas y el mapa ordenado que produce el extractor.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

use super::category::{Category, RiskLevel};

/// Un par clave/valor ya clasificado.
///
/// Solo se construye desde [`crate::analysis::RiskScorer::entry`], que deriva
/// `risk_level` de la categoría; las entradas deserializadas se revalidan
/// antes de puntuarse.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    key: String,
    value: String,
    category: Category,
    risk_level: RiskLevel,
}

impl MetadataEntry {
    pub(crate) fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        category: Category,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            category,
            risk_level,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }
}

/// Recorta `value` a `max_chars` caracteres respetando los límites UTF-8.
///
/// Devuelve el valor resultante y si hubo recorte.
pub fn truncate_value(value: &str, max_chars: usize) -> (String, bool) {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (value[..byte_index].to_string(), true),
        None => (value.to_string(), false),
    }
}

/// Metadata cruda tal como la entrega el extractor, en orden de inserción.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawMetadata {
    fields: Vec<(String, String)>,
}

impl RawMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta un campo; si la clave ya existe se sustituye su valor en su posición original.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, current)) => *current = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = RawMetadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

impl From<BTreeMap<String, String>> for RawMetadata {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

/// Un `HashMap` no tiene orden definido, así que se ordena por clave.
impl From<HashMap<String, String>> for RawMetadata {
    fn from(map: HashMap<String, String>) -> Self {
        let sorted: BTreeMap<String, String> = map.into_iter().collect();
        sorted.into()
    }
}

impl Serialize for RawMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
