use serde::Serialize;

use super::catalog::{ConstraintInfo, IndexInfo, ProcedureInfo};
use super::value::Record;

/// Everything the extractor learned about one database.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaSummary {
    pub database: DatabaseInfo,
    pub labels: Vec<LabelInfo>,
    pub relationships: Vec<RelationshipInfo>,
    pub indexes: Vec<IndexInfo>,
    pub constraints: Vec<ConstraintInfo>,
    pub procedures: Vec<ProcedureInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    /// Kernel version, "Unknown" when the components procedure is unavailable
    pub version: String,
    pub name: String,
    pub size: Option<String>,
}

impl Default for DatabaseInfo {
    fn default() -> Self {
        Self {
            version: "Unknown".to_string(),
            name: "neo4j".to_string(),
            size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyInfo {
    pub name: String,
    pub data_type: String,
    pub is_primary_key: bool,
}

impl PropertyInfo {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_primary_key: name == "id",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelInfo {
    pub name: String,
    pub properties: Vec<PropertyInfo>,
    pub node_count: i64,
    pub samples: Vec<Record>,
}

impl LabelInfo {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: Vec::new(),
            node_count: 0,
            samples: Vec::new(),
        }
    }
}

/// A (source label, target label) pair observed for a relationship type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub source: String,
    pub target: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipInfo {
    pub rel_type: String,
    pub properties: Vec<PropertyInfo>,
    pub count: i64,
    /// Most frequent pair first
    pub endpoints: Vec<Endpoint>,
}

impl RelationshipInfo {
    pub fn empty(rel_type: &str) -> Self {
        Self {
            rel_type: rel_type.to_string(),
            properties: Vec::new(),
            count: 0,
            endpoints: Vec::new(),
        }
    }

    pub fn primary_endpoint(&self) -> Option<&Endpoint> {
        self.endpoints.first()
    }

    pub fn sources(&self) -> Vec<&str> {
        distinct(self.endpoints.iter().map(|e| e.source.as_str()))
    }

    pub fn targets(&self) -> Vec<&str> {
        distinct(self.endpoints.iter().map(|e| e.target.as_str()))
    }
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

/// Infers property names and types from sampled rows.
///
/// Keys keep first-seen order. The type comes from the first non-null value;
/// a key that is null in every row is reported as "Null".
pub fn infer_properties(samples: &[Record]) -> Vec<PropertyInfo> {
    let mut properties: Vec<PropertyInfo> = Vec::new();

    for sample in samples {
        for (key, value) in sample {
            match properties.iter_mut().find(|p| &p.name == key) {
                Some(existing) => {
                    if existing.data_type == "Null" && !value.is_null() {
                        existing.data_type = value.type_name();
                    }
                }
                None => properties.push(PropertyInfo::new(key, &value.type_name())),
            }
        }
    }

    properties
}

/// Sorted union of keys across sample rows; the column set of a sample table.
pub fn sample_columns(samples: &[Record]) -> Vec<&str> {
    let mut columns: Vec<&str> = samples
        .iter()
        .flat_map(|s| s.keys().map(String::as_str))
        .collect();
    columns.sort_unstable();
    columns.dedup();
    columns
}
