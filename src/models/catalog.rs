use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IndexKind {
    /// Default index kind since Neo4j 5
    Range,
    Text,
    Point,
    Fulltext,
    /// Token lookup index over labels or relationship types
    Lookup,
    Vector,
    /// Legacy 4.x index kind
    Btree,
    Other(String),
}

impl FromStr for IndexKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "RANGE" => Ok(IndexKind::Range),
            "TEXT" => Ok(IndexKind::Text),
            "POINT" => Ok(IndexKind::Point),
            "FULLTEXT" => Ok(IndexKind::Fulltext),
            "LOOKUP" => Ok(IndexKind::Lookup),
            "VECTOR" => Ok(IndexKind::Vector),
            "BTREE" => Ok(IndexKind::Btree),
            other => Ok(IndexKind::Other(other.to_string())),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Range => f.write_str("RANGE"),
            IndexKind::Text => f.write_str("TEXT"),
            IndexKind::Point => f.write_str("POINT"),
            IndexKind::Fulltext => f.write_str("FULLTEXT"),
            IndexKind::Lookup => f.write_str("LOOKUP"),
            IndexKind::Vector => f.write_str("VECTOR"),
            IndexKind::Btree => f.write_str("BTREE"),
            IndexKind::Other(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConstraintKind {
    Unique,
    NodeKey,
    Existence,
    PropertyType,
    Other(String),
}

impl FromStr for ConstraintKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        let kind = match upper.as_str() {
            "UNIQUENESS" | "NODE_PROPERTY_UNIQUENESS" | "RELATIONSHIP_PROPERTY_UNIQUENESS"
            | "RELATIONSHIP_UNIQUENESS" => ConstraintKind::Unique,
            "NODE_KEY" | "RELATIONSHIP_KEY" => ConstraintKind::NodeKey,
            "NODE_PROPERTY_EXISTENCE" | "RELATIONSHIP_PROPERTY_EXISTENCE" => {
                ConstraintKind::Existence
            }
            "NODE_PROPERTY_TYPE" | "RELATIONSHIP_PROPERTY_TYPE" => ConstraintKind::PropertyType,
            _ => ConstraintKind::Other(upper),
        };
        Ok(kind)
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Unique => f.write_str("UNIQUE"),
            ConstraintKind::NodeKey => f.write_str("KEY"),
            ConstraintKind::Existence => f.write_str("EXISTENCE"),
            ConstraintKind::PropertyType => f.write_str("PROPERTY TYPE"),
            ConstraintKind::Other(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexInfo {
    pub name: String,
    pub kind: IndexKind,
    /// NODE or RELATIONSHIP
    pub entity_type: String,
    pub labels_or_types: Vec<String>,
    pub properties: Vec<String>,
    pub uniqueness: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstraintInfo {
    pub name: String,
    pub kind: ConstraintKind,
    pub entity_type: String,
    pub labels_or_types: Vec<String>,
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcedureInfo {
    /// Fully qualified, e.g. `apoc.meta.schema`
    pub name: String,
    pub signature: String,
    pub description: String,
}

impl ProcedureInfo {
    pub fn in_namespace(&self, prefixes: &[String]) -> bool {
        prefixes.is_empty() || prefixes.iter().any(|p| self.name.starts_with(p.as_str()))
    }
}
