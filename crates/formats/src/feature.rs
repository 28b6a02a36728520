use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::geometry::Geometry;

/// One tabular record: column name to raw cell text.
pub type Row = BTreeMap<String, String>;

/// String-valued property bag of a feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts JSON properties; strings are kept verbatim, nulls dropped,
    /// anything else stored as its JSON text.
    pub fn from_json(map: &Map<String, Value>) -> Self {
        let mut out = BTreeMap::new();
        for (k, v) in map {
            match v {
                Value::Null => {}
                Value::String(s) => {
                    out.insert(k.clone(), s.clone());
                }
                other => {
                    out.insert(k.clone(), other.to_string());
                }
            }
        }
        Self(out)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Copies every field of `row` over the existing values.
    pub fn merge(&mut self, row: &Row) {
        for (k, v) in row {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    /// `None` for null geometries.
    pub geometry: Option<Geometry>,
    pub properties: Properties,
}

impl Feature {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The `field` value of every feature, in feature order.
    pub fn values<'a>(&'a self, field: &'a str) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.features.iter().map(move |f| f.property(field))
    }
}
