//! The fixed battery of read-only introspection statements.

use super::connection::Statement;
use crate::utils::escape::cypher_identifier;

pub fn kernel_version() -> Statement {
    Statement::new(
        "CALL dbms.components() YIELD name, versions \
         WHERE name = 'Neo4j Kernel' RETURN versions[0] AS version",
        &["version"],
    )
}

pub fn database_name() -> Statement {
    Statement::new("CALL db.info() YIELD name RETURN name", &["name"])
}

pub fn database_size(db_name: &str) -> Statement {
    Statement::new(
        "CALL dbms.database.size() YIELD database, totalSize \
         WHERE database = $db_name RETURN totalSize",
        &["totalSize"],
    )
    .param("db_name", db_name)
}

pub fn labels() -> Statement {
    Statement::new(
        "CALL db.labels() YIELD label RETURN label ORDER BY label",
        &["label"],
    )
}

pub fn relationship_types() -> Statement {
    Statement::new(
        "CALL db.relationshipTypes() YIELD relationshipType \
         RETURN relationshipType ORDER BY relationshipType",
        &["relationshipType"],
    )
}

pub fn label_count(label: &str) -> Statement {
    Statement::new(
        format!(
            "MATCH (n:{}) RETURN count(n) AS count",
            cypher_identifier(label)
        ),
        &["count"],
    )
}

pub fn label_samples(label: &str, limit: usize) -> Statement {
    Statement::new(
        format!(
            "MATCH (n:{}) RETURN properties(n) AS props LIMIT $limit",
            cypher_identifier(label)
        ),
        &["props"],
    )
    .param("limit", limit as i64)
}

pub fn relationship_count(rel_type: &str) -> Statement {
    Statement::new(
        format!(
            "MATCH ()-[r:{}]->() RETURN count(r) AS count",
            cypher_identifier(rel_type)
        ),
        &["count"],
    )
}

/// Observed (source label, target label) pairs, most frequent first.
pub fn relationship_endpoints(rel_type: &str, limit: usize) -> Statement {
    Statement::new(
        format!(
            "MATCH (a)-[r:{}]->(b) \
             UNWIND labels(a) AS source \
             UNWIND labels(b) AS target \
             RETURN source, target, count(*) AS count \
             ORDER BY count DESC, source, target \
             LIMIT $limit",
            cypher_identifier(rel_type)
        ),
        &["source", "target", "count"],
    )
    .param("limit", limit as i64)
}

pub fn relationship_samples(rel_type: &str, limit: usize) -> Statement {
    Statement::new(
        format!(
            "MATCH ()-[r:{}]->() RETURN properties(r) AS props LIMIT $limit",
            cypher_identifier(rel_type)
        ),
        &["props"],
    )
    .param("limit", limit as i64)
}

/// `YIELD *` keeps this working across server versions; absent columns come back null.
pub fn indexes() -> Statement {
    Statement::new(
        "SHOW INDEXES YIELD * RETURN * ORDER BY name",
        &[
            "name",
            "type",
            "entityType",
            "labelsOrTypes",
            "properties",
            "uniqueness",
            "owningConstraint",
        ],
    )
}

pub fn constraints() -> Statement {
    Statement::new(
        "SHOW CONSTRAINTS YIELD * RETURN * ORDER BY name",
        &["name", "type", "entityType", "labelsOrTypes", "properties"],
    )
}

pub fn procedures() -> Statement {
    Statement::new(
        "SHOW PROCEDURES YIELD name, signature, description \
         RETURN name, signature, description ORDER BY name",
        &["name", "signature", "description"],
    )
}
