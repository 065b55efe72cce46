use std::future::Future;
use tracing::{debug, info, warn};

use super::connection::{QueryRunner, Statement};
use super::queries;
use crate::config::AuditConfig;
use crate::error::Result;
use crate::models::{
    infer_properties, ConstraintInfo, ConstraintKind, DatabaseInfo, Endpoint, IndexInfo,
    IndexKind, LabelInfo, ProcedureInfo, PropertyValue, Record, RelationshipInfo, SchemaSummary,
};

/// Runs the introspection battery against one connection and assembles a
/// `SchemaSummary`.
///
/// Label and relationship queries are required: the first failure aborts the
/// extraction so an audit is never silently incomplete. Database info and the
/// index, constraint and procedure catalogs depend on server edition and
/// version, so their failures are logged and leave defaults behind.
pub struct MetadataExtractor<'a, R: QueryRunner> {
    runner: &'a R,
    config: &'a AuditConfig,
}

impl<'a, R: QueryRunner> MetadataExtractor<'a, R> {
    pub fn new(runner: &'a R, config: &'a AuditConfig) -> Self {
        Self { runner, config }
    }

    pub async fn extract(&self) -> Result<SchemaSummary> {
        info!("Reading database info");
        let database = self.database_info().await;

        info!("Extracting node labels");
        let labels = self.labels().await?;

        info!("Extracting relationship types");
        let relationships = self.relationships().await?;

        info!("Reading index, constraint and procedure catalogs");
        let indexes = best_effort("indexes", self.indexes()).await;
        let constraints = best_effort("constraints", self.constraints()).await;
        let procedures = best_effort("procedures", self.procedures()).await;

        info!(
            labels = labels.len(),
            relationship_types = relationships.len(),
            indexes = indexes.len(),
            constraints = constraints.len(),
            procedures = procedures.len(),
            "Extraction complete"
        );

        Ok(SchemaSummary {
            database,
            labels,
            relationships,
            indexes,
            constraints,
            procedures,
        })
    }

    pub async fn database_info(&self) -> DatabaseInfo {
        let mut info = DatabaseInfo::default();

        if let Some(version) =
            best_effort("kernel version", self.first_value(queries::kernel_version(), "version"))
                .await
                .and_then(|v| v.as_str().map(str::to_string))
        {
            info.version = version;
        }

        if let Some(name) =
            best_effort("database name", self.first_value(queries::database_name(), "name"))
                .await
                .and_then(|v| v.as_str().map(str::to_string))
        {
            info.name = name;
        }

        info.size = best_effort(
            "database size",
            self.first_value(queries::database_size(&info.name), "totalSize"),
        )
        .await
        .filter(|v| !v.is_null())
        .map(|v| v.to_string());

        info
    }

    pub async fn labels(&self) -> Result<Vec<LabelInfo>> {
        let names = self.names(queries::labels(), "label").await?;
        let mut labels = Vec::with_capacity(names.len());
        for name in &names {
            labels.push(self.label_info(name).await?);
        }
        Ok(labels)
    }

    pub async fn label_info(&self, label: &str) -> Result<LabelInfo> {
        let node_count = self.count(queries::label_count(label)).await?;
        if node_count == 0 {
            debug!(label, "Label has no nodes");
            return Ok(LabelInfo::empty(label));
        }

        let samples = self
            .property_samples(queries::label_samples(label, self.config.sample_limit))
            .await?;
        let properties = infer_properties(&samples);
        debug!(label, node_count, samples = samples.len(), "Label extracted");

        Ok(LabelInfo {
            name: label.to_string(),
            properties,
            node_count,
            samples,
        })
    }

    pub async fn relationships(&self) -> Result<Vec<RelationshipInfo>> {
        let names = self
            .names(queries::relationship_types(), "relationshipType")
            .await?;
        let mut relationships = Vec::with_capacity(names.len());
        for name in &names {
            relationships.push(self.relationship_info(name).await?);
        }
        Ok(relationships)
    }

    pub async fn relationship_info(&self, rel_type: &str) -> Result<RelationshipInfo> {
        let count = self.count(queries::relationship_count(rel_type)).await?;
        if count == 0 {
            debug!(rel_type, "Relationship type has no instances");
            return Ok(RelationshipInfo::empty(rel_type));
        }

        let limit = self.config.sample_limit;
        let mut endpoints: Vec<Endpoint> = self
            .runner
            .fetch(&queries::relationship_endpoints(rel_type, limit))
            .await?
            .iter()
            .filter_map(|record| {
                Some(Endpoint {
                    source: string_field(record, "source")?,
                    target: string_field(record, "target")?,
                    count: int_field(record, "count"),
                })
            })
            .collect();
        endpoints.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.source.cmp(&b.source))
                .then_with(|| a.target.cmp(&b.target))
        });
        endpoints.truncate(limit);

        let samples = self
            .property_samples(queries::relationship_samples(rel_type, limit))
            .await?;
        debug!(rel_type, count, endpoints = endpoints.len(), "Relationship type extracted");

        Ok(RelationshipInfo {
            rel_type: rel_type.to_string(),
            properties: infer_properties(&samples),
            count,
            endpoints,
        })
    }

    pub async fn indexes(&self) -> Result<Vec<IndexInfo>> {
        let records = self.runner.fetch(&queries::indexes()).await?;
        Ok(records
            .iter()
            .map(|record| {
                let uniqueness = string_field(record, "uniqueness").or_else(|| {
                    record
                        .get("owningConstraint")
                        .filter(|v| !v.is_null())
                        .map(|_| "UNIQUE".to_string())
                });
                IndexInfo {
                    name: string_field(record, "name").unwrap_or_default(),
                    kind: index_kind(record),
                    entity_type: string_field(record, "entityType").unwrap_or_default(),
                    labels_or_types: list_field(record, "labelsOrTypes"),
                    properties: list_field(record, "properties"),
                    uniqueness,
                }
            })
            .collect())
    }

    pub async fn constraints(&self) -> Result<Vec<ConstraintInfo>> {
        let records = self.runner.fetch(&queries::constraints()).await?;
        Ok(records
            .iter()
            .map(|record| ConstraintInfo {
                name: string_field(record, "name").unwrap_or_default(),
                kind: constraint_kind(record),
                entity_type: string_field(record, "entityType").unwrap_or_default(),
                labels_or_types: list_field(record, "labelsOrTypes"),
                properties: list_field(record, "properties"),
            })
            .collect())
    }

    pub async fn procedures(&self) -> Result<Vec<ProcedureInfo>> {
        let records = self.runner.fetch(&queries::procedures()).await?;
        Ok(records
            .iter()
            .map(|record| ProcedureInfo {
                name: string_field(record, "name").unwrap_or_default(),
                signature: string_field(record, "signature").unwrap_or_default(),
                description: string_field(record, "description").unwrap_or_default(),
            })
            .filter(|p| p.in_namespace(&self.config.procedure_prefixes))
            .collect())
    }

    async fn names(&self, statement: Statement, column: &str) -> Result<Vec<String>> {
        let records = self.runner.fetch(&statement).await?;
        Ok(records
            .iter()
            .filter_map(|record| string_field(record, column))
            .collect())
    }

    async fn count(&self, statement: Statement) -> Result<i64> {
        Ok(self
            .first_value(statement, "count")
            .await?
            .and_then(|v| v.as_i64())
            .unwrap_or(0))
    }

    async fn first_value(&self, statement: Statement, column: &str) -> Result<Option<PropertyValue>> {
        let records = self.runner.fetch(&statement).await?;
        Ok(records
            .into_iter()
            .next()
            .and_then(|mut record| record.remove(column)))
    }

    /// Fetches `properties(...)` maps, never keeping more than the sample limit.
    async fn property_samples(&self, statement: Statement) -> Result<Vec<Record>> {
        let records = self.runner.fetch(&statement).await?;
        Ok(records
            .into_iter()
            .take(self.config.sample_limit)
            .filter_map(|mut record| record.remove("props").and_then(PropertyValue::into_map))
            .collect())
    }
}

async fn best_effort<T: Default>(what: &str, fut: impl Future<Output = Result<T>>) -> T {
    match fut.await {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not read {}: {}", what, e);
            T::default()
        }
    }
}

fn string_field(record: &Record, column: &str) -> Option<String> {
    record
        .get(column)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn int_field(record: &Record, column: &str) -> i64 {
    record.get(column).and_then(|v| v.as_i64()).unwrap_or(0)
}

fn list_field(record: &Record, column: &str) -> Vec<String> {
    record
        .get(column)
        .map(PropertyValue::string_list)
        .unwrap_or_default()
}

fn index_kind(record: &Record) -> IndexKind {
    let raw = string_field(record, "type").unwrap_or_default();
    raw.parse().unwrap_or(IndexKind::Other(raw))
}

fn constraint_kind(record: &Record) -> ConstraintKind {
    let raw = string_field(record, "type").unwrap_or_default();
    raw.parse().unwrap_or(ConstraintKind::Other(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XrayError;
    use crate::neo4j::testing::{record, FakeRunner};

    fn config(sample_limit: usize) -> AuditConfig {
        AuditConfig {
            sample_limit,
            ..AuditConfig::default()
        }
    }

    #[tokio::test]
    async fn test_person_company_scenario() {
        let runner = FakeRunner::person_company();
        let config = AuditConfig::default();
        let summary = MetadataExtractor::new(&runner, &config)
            .extract()
            .await
            .unwrap();

        assert_eq!(summary.database.version, "5.20.0");
        assert_eq!(summary.database.name, "neo4j");

        let names: Vec<_> = summary.labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Company", "Person"]);

        let company = &summary.labels[0];
        assert_eq!(company.node_count, 0);
        assert!(company.properties.is_empty());
        assert!(company.samples.is_empty());

        let person = &summary.labels[1];
        assert_eq!(person.node_count, 3);
        assert_eq!(person.samples.len(), 3);
        let types: Vec<_> = person
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.data_type.as_str()))
            .collect();
        assert_eq!(types, vec![("age", "Integer"), ("name", "String")]);

        assert_eq!(summary.relationships.len(), 1);
        let works_at = &summary.relationships[0];
        assert_eq!(works_at.count, 3);
        let primary = works_at.primary_endpoint().unwrap();
        assert_eq!(primary.source, "Person");
        assert_eq!(primary.target, "Company");
        assert_eq!(works_at.properties[0].name, "since");
    }

    #[tokio::test]
    async fn test_sample_limit_is_enforced() {
        let rows: Vec<Record> = (0..25_i64)
            .map(|i| {
                record(&[(
                    "props",
                    PropertyValue::Map(record(&[("n", PropertyValue::Integer(i))])),
                )])
            })
            .collect();
        let runner = FakeRunner::new()
            .respond("db.labels()", vec![record(&[("label", "Big".into())])])
            .respond(
                "MATCH (n:`Big`) RETURN count",
                vec![record(&[("count", 25_i64.into())])],
            )
            .respond("MATCH (n:`Big`) RETURN properties", rows);

        for limit in [1, 5, 10, 30] {
            let config = config(limit);
            let labels = MetadataExtractor::new(&runner, &config)
                .labels()
                .await
                .unwrap();
            assert!(labels[0].samples.len() <= limit);
            assert_eq!(labels[0].samples.len(), limit.min(25));
        }

        let limits: Vec<_> = runner
            .statements()
            .into_iter()
            .filter(|s| s.cypher.contains("properties(n)"))
            .map(|s| s.params)
            .collect();
        assert_eq!(limits[0], vec![("limit", PropertyValue::Integer(1))]);
    }

    #[tokio::test]
    async fn test_zero_instance_relationship_type_is_kept() {
        let runner = FakeRunner::new()
            .respond(
                "db.relationshipTypes()",
                vec![record(&[("relationshipType", "OLD_LINK".into())])],
            )
            .respond(
                "[r:`OLD_LINK`]->() RETURN count",
                vec![record(&[("count", 0_i64.into())])],
            );
        let config = AuditConfig::default();
        let rels = MetadataExtractor::new(&runner, &config)
            .relationships()
            .await
            .unwrap();

        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].rel_type, "OLD_LINK");
        assert_eq!(rels[0].count, 0);
        assert!(rels[0].endpoints.is_empty());
    }

    #[tokio::test]
    async fn test_label_query_failure_aborts() {
        let runner = FakeRunner::person_company().fail("MATCH (n:`Person`) RETURN count");
        let config = AuditConfig::default();
        let err = MetadataExtractor::new(&runner, &config)
            .extract()
            .await
            .unwrap_err();
        assert!(matches!(err, XrayError::Query { .. }));
    }

    #[tokio::test]
    async fn test_catalog_failures_are_soft() {
        let runner = FakeRunner::person_company()
            .fail("SHOW INDEXES")
            .fail("SHOW PROCEDURES")
            .fail("dbms.components()");
        let config = AuditConfig::default();
        let summary = MetadataExtractor::new(&runner, &config)
            .extract()
            .await
            .unwrap();
        assert!(summary.indexes.is_empty());
        assert!(summary.procedures.is_empty());
        assert_eq!(summary.database.version, "Unknown");
        assert_eq!(summary.labels.len(), 2);
    }

    #[tokio::test]
    async fn test_indexes_and_constraints() {
        let runner = FakeRunner::new()
            .respond(
                "SHOW INDEXES",
                vec![
                    record(&[
                        ("name", "person_name".into()),
                        ("type", "RANGE".into()),
                        ("entityType", "NODE".into()),
                        ("labelsOrTypes", PropertyValue::List(vec!["Person".into()])),
                        ("properties", PropertyValue::List(vec!["name".into()])),
                        ("uniqueness", PropertyValue::Null),
                        ("owningConstraint", "person_name_unique".into()),
                    ]),
                    record(&[
                        ("name", "label_lookup".into()),
                        ("type", "LOOKUP".into()),
                        ("entityType", "NODE".into()),
                        ("labelsOrTypes", PropertyValue::Null),
                        ("properties", PropertyValue::Null),
                    ]),
                ],
            )
            .respond(
                "SHOW CONSTRAINTS",
                vec![record(&[
                    ("name", "person_name_unique".into()),
                    ("type", "UNIQUENESS".into()),
                    ("entityType", "NODE".into()),
                    ("labelsOrTypes", PropertyValue::List(vec!["Person".into()])),
                    ("properties", PropertyValue::List(vec!["name".into()])),
                ])],
            );
        let config = AuditConfig::default();
        let extractor = MetadataExtractor::new(&runner, &config);

        let indexes = extractor.indexes().await.unwrap();
        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes[0].kind, IndexKind::Range);
        assert_eq!(indexes[0].uniqueness.as_deref(), Some("UNIQUE"));
        assert_eq!(indexes[0].properties, vec!["name"]);
        assert_eq!(indexes[1].kind, IndexKind::Lookup);
        assert!(indexes[1].labels_or_types.is_empty());

        let constraints = extractor.constraints().await.unwrap();
        assert_eq!(constraints[0].kind, ConstraintKind::Unique);
        assert_eq!(constraints[0].labels_or_types, vec!["Person"]);
    }

    #[tokio::test]
    async fn test_procedures_filtered_by_prefix() {
        let procedure = |name: &str| {
            record(&[
                ("name", name.into()),
                ("signature", format!("{name}() :: ()").into()),
                ("description", "".into()),
            ])
        };
        let runner = FakeRunner::new().respond(
            "SHOW PROCEDURES",
            vec![
                procedure("apoc.help"),
                procedure("db.labels"),
                procedure("gds.pageRank.stream"),
            ],
        );

        let config = AuditConfig::default();
        let procs = MetadataExtractor::new(&runner, &config)
            .procedures()
            .await
            .unwrap();
        let names: Vec<_> = procs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["apoc.help", "gds.pageRank.stream"]);

        let config = AuditConfig {
            procedure_prefixes: Vec::new(),
            ..AuditConfig::default()
        };
        let procs = MetadataExtractor::new(&runner, &config)
            .procedures()
            .await
            .unwrap();
        assert_eq!(procs.len(), 3);
    }

    #[tokio::test]
    async fn test_endpoints_sorted_by_frequency() {
        let runner = FakeRunner::new()
            .respond(
                "[r:`LINKS`]->() RETURN count",
                vec![record(&[("count", 7_i64.into())])],
            )
            .respond(
                "(a)-[r:`LINKS`]->(b)",
                vec![
                    record(&[
                        ("source", "A".into()),
                        ("target", "B".into()),
                        ("count", 2_i64.into()),
                    ]),
                    record(&[
                        ("source", "C".into()),
                        ("target", "D".into()),
                        ("count", 5_i64.into()),
                    ]),
                ],
            );
        let config = AuditConfig::default();
        let rel = MetadataExtractor::new(&runner, &config)
            .relationship_info("LINKS")
            .await
            .unwrap();
        assert_eq!(rel.primary_endpoint().unwrap().source, "C");
        assert_eq!(rel.sources(), vec!["C", "A"]);
        assert!(rel.properties.is_empty());
    }
}
