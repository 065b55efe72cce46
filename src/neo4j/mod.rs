pub mod connection;
pub mod convert;
pub mod extractor;
pub mod queries;

#[cfg(test)]
pub mod testing;

pub use connection::{ConnectionSettings, Neo4jConnection};
pub use extractor::MetadataExtractor;
