//! In-memory query runner and fixtures for tests.

use std::cell::RefCell;

use super::connection::{QueryRunner, Statement};
use crate::error::{Result, XrayError};
use crate::models::{
    Endpoint, LabelInfo, PropertyInfo, PropertyValue, Record, RelationshipInfo, SchemaSummary,
};

pub fn record(pairs: &[(&str, PropertyValue)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Answers statements by substring match on their Cypher text; unmatched
/// statements return no rows.
#[derive(Default)]
pub struct FakeRunner {
    responses: Vec<(String, Vec<Record>)>,
    failures: Vec<String>,
    seen: RefCell<Vec<Statement>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, needle: &str, rows: Vec<Record>) -> Self {
        self.responses.push((needle.to_string(), rows));
        self
    }

    pub fn fail(mut self, needle: &str) -> Self {
        self.failures.push(needle.to_string());
        self
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.seen.borrow().clone()
    }

    /// Person (3 nodes), Company (0 nodes), WORKS_AT (3 edges, Person -> Company).
    pub fn person_company() -> Self {
        let person = |name: &str, age: i64| {
            record(&[(
                "props",
                PropertyValue::Map(record(&[("name", name.into()), ("age", age.into())])),
            )])
        };
        let since = |year: i64| {
            record(&[(
                "props",
                PropertyValue::Map(record(&[("since", year.into())])),
            )])
        };

        Self::new()
            .respond(
                "dbms.components()",
                vec![record(&[("version", "5.20.0".into())])],
            )
            .respond("db.info()", vec![record(&[("name", "neo4j".into())])])
            .respond(
                "db.labels()",
                vec![
                    record(&[("label", "Company".into())]),
                    record(&[("label", "Person".into())]),
                ],
            )
            .respond(
                "db.relationshipTypes()",
                vec![record(&[("relationshipType", "WORKS_AT".into())])],
            )
            .respond(
                "MATCH (n:`Person`) RETURN count",
                vec![record(&[("count", 3_i64.into())])],
            )
            .respond(
                "MATCH (n:`Company`) RETURN count",
                vec![record(&[("count", 0_i64.into())])],
            )
            .respond(
                "MATCH (n:`Person`) RETURN properties",
                vec![person("Alice", 34), person("Bob", 41), person("Carol", 29)],
            )
            .respond(
                "[r:`WORKS_AT`]->() RETURN count",
                vec![record(&[("count", 3_i64.into())])],
            )
            .respond(
                "(a)-[r:`WORKS_AT`]->(b)",
                vec![record(&[
                    ("source", "Person".into()),
                    ("target", "Company".into()),
                    ("count", 3_i64.into()),
                ])],
            )
            .respond(
                "[r:`WORKS_AT`]->() RETURN properties",
                vec![since(2019), since(2021), since(2023)],
            )
    }
}

impl QueryRunner for FakeRunner {
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Record>> {
        self.seen.borrow_mut().push(statement.clone());

        if self
            .failures
            .iter()
            .any(|needle| statement.cypher.contains(needle.as_str()))
        {
            return Err(XrayError::query(&statement.cypher, "simulated failure"));
        }

        Ok(self
            .responses
            .iter()
            .find(|(needle, _)| statement.cypher.contains(needle.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}

/// The summary the extractor builds from `FakeRunner::person_company`.
pub fn person_company_summary() -> SchemaSummary {
    let person_sample = |name: &str, age: i64| record(&[("age", age.into()), ("name", name.into())]);

    SchemaSummary {
        labels: vec![
            LabelInfo::empty("Company"),
            LabelInfo {
                name: "Person".to_string(),
                properties: vec![
                    PropertyInfo::new("age", "Integer"),
                    PropertyInfo::new("name", "String"),
                ],
                node_count: 3,
                samples: vec![
                    person_sample("Alice", 34),
                    person_sample("Bob", 41),
                    person_sample("Carol", 29),
                ],
            },
        ],
        relationships: vec![RelationshipInfo {
            rel_type: "WORKS_AT".to_string(),
            properties: vec![PropertyInfo::new("since", "Integer")],
            count: 3,
            endpoints: vec![Endpoint {
                source: "Person".to_string(),
                target: "Company".to_string(),
                count: 3,
            }],
        }],
        ..SchemaSummary::default()
    }
}
