pub mod ref_resolve;
pub mod schema;

use crate::error::{LoadError, ParseError};
use crate::model::SchemaDocument;
use ref_resolve::RefResolver;
use schema::Schema;

/// Parse a schema document from YAML.
pub fn from_yaml(input: &str) -> Result<Schema, ParseError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Parse a schema document from JSON.
pub fn from_json(input: &str) -> Result<Schema, ParseError> {
    Ok(serde_json::from_str(input)?)
}

/// Parse a JSON document and lower it into a schema graph.
pub fn load_json(input: &str) -> Result<SchemaDocument, LoadError> {
    let root = from_json(input)?;
    Ok(RefResolver::new().build(&root)?)
}

/// Parse a YAML document and lower it into a schema graph.
pub fn load_yaml(input: &str) -> Result<SchemaDocument, LoadError> {
    let root = from_yaml(input)?;
    Ok(RefResolver::new().build(&root)?)
}
