use neo4rs::{BoltType, ConfigBuilder, DeError, Graph, Query, Row};
use std::sync::Arc;
use tracing::{debug, info};

use super::convert::from_bolt;
use crate::error::{Result, XrayError};
use crate::models::{PropertyValue, Record};
use crate::utils::uri::{parse_neo4j_uri, redact};

/// Resolved connection parameters: explicit flags win over URI-embedded credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: Option<String>,
}

impl ConnectionSettings {
    pub fn resolve(
        raw_uri: &str,
        user: Option<&str>,
        password: Option<&str>,
        database: Option<&str>,
    ) -> Result<Self> {
        let parsed = parse_neo4j_uri(raw_uri)?;

        let user = user.map(str::to_string).or(parsed.user);
        let password = password.map(str::to_string).or(parsed.password);

        match (user, password) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => Ok(Self {
                uri: parsed.uri,
                user,
                password,
                database: database.map(str::to_string),
            }),
            _ => Err(XrayError::Config(
                "Username and password are required. Provide them in the URI or using --user and --password"
                    .to_string(),
            )),
        }
    }
}

/// A read-only introspection query with the columns it returns.
#[derive(Debug, Clone)]
pub struct Statement {
    pub cypher: String,
    pub params: Vec<(&'static str, PropertyValue)>,
    pub columns: &'static [&'static str],
}

impl Statement {
    pub fn new(cypher: impl Into<String>, columns: &'static [&'static str]) -> Self {
        Self {
            cypher: cypher.into(),
            params: Vec::new(),
            columns,
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<PropertyValue>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    fn to_query(&self) -> Query {
        let mut query = Query::new(self.cypher.clone());
        for (key, value) in &self.params {
            query = match value {
                PropertyValue::String(s) => query.param(key, s.as_str()),
                PropertyValue::Integer(i) => query.param(key, *i),
                PropertyValue::Float(f) => query.param(key, *f),
                PropertyValue::Boolean(b) => query.param(key, *b),
                _ => query,
            };
        }
        query
    }
}

/// Runs a statement and returns one record per row.
///
/// This is the only database operation the extractor needs.
pub trait QueryRunner {
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Record>>;
}

/// Owns the driver for one audit run. Dropping it closes the pool.
#[derive(Clone)]
pub struct Neo4jConnection {
    graph: Arc<Graph>,
}

impl Neo4jConnection {
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let mut config_builder = ConfigBuilder::default()
            .uri(&settings.uri)
            .user(&settings.user)
            .password(&settings.password);

        if let Some(ref db_name) = settings.database {
            config_builder = config_builder.db(db_name.as_str());
        }

        let neo4j_config = config_builder
            .build()
            .map_err(|e| XrayError::Connection(format!("invalid configuration: {e}")))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| XrayError::Connection(format!("{}: {}", redact(&settings.uri), e)))?;

        let connection = Self {
            graph: Arc::new(graph),
        };
        connection.verify_connectivity().await?;

        info!(uri = %redact(&settings.uri), user = %settings.user, "Connected to Neo4j");
        Ok(connection)
    }

    /// Authentication and reachability errors surface on the first query, so
    /// they are reported as connection failures here.
    pub async fn verify_connectivity(&self) -> Result<()> {
        let query = Query::new("RETURN 1 AS test".to_string());
        let mut result = self
            .graph
            .execute(query)
            .await
            .map_err(|e| XrayError::Connection(e.to_string()))?;
        while result
            .next()
            .await
            .map_err(|e| XrayError::Connection(e.to_string()))?
            .is_some()
        {}
        Ok(())
    }
}

impl QueryRunner for Neo4jConnection {
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Record>> {
        debug!(query = %statement.cypher.trim(), "Running introspection query");

        let mut result = self
            .graph
            .execute(statement.to_query())
            .await
            .map_err(|e| XrayError::query(&statement.cypher, e))?;

        let mut records = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| XrayError::query(&statement.cypher, e))?
        {
            let mut record = Record::new();
            for column in statement.columns {
                let value = column_value(&row, column).map_err(|e| {
                    XrayError::query(&statement.cypher, format!("column '{column}': {e}"))
                })?;
                record.insert((*column).to_string(), value);
            }
            records.push(record);
        }

        debug!(rows = records.len(), "Query finished");
        Ok(records)
    }
}

/// Columns a server version does not return are recorded as null; any other
/// decoding failure is an error.
fn column_value(row: &Row, column: &str) -> std::result::Result<PropertyValue, DeError> {
    match row.get::<BoltType>(column) {
        Ok(value) => Ok(from_bolt(value)),
        Err(DeError::NoSuchProperty) => Ok(PropertyValue::Null),
        Err(e) => Err(e),
    }
}
