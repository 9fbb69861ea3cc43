use std::collections::HashSet;

use heck::ToPascalCase;
use indexmap::IndexMap;

use crate::config::NamingConfig;
use crate::error::NamingError;
use crate::model::{SchemaGraph, SchemaId};

/// Extension key that pins a schema's type name.
pub const TYPE_NAME_EXTENSION: &str = "x-typeName";

/// Produces a unique, valid identifier for a schema.
pub trait TypeNameGenerator {
    fn generate(
        &self,
        graph: &SchemaGraph,
        schema: SchemaId,
        type_name_hint: Option<&str>,
        reserved_type_names: &HashSet<String>,
    ) -> Result<String, NamingError>;
}

/// Names a schema after its `x-typeName`, its title, or the hint, in that order.
#[derive(Debug, Clone, Default)]
pub struct DefaultTypeNameGenerator {
    reserved_type_names: HashSet<String>,
    type_name_mappings: IndexMap<String, String>,
}

impl DefaultTypeNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NamingConfig) -> Self {
        Self {
            reserved_type_names: config.reserved_type_names.iter().cloned().collect(),
            type_name_mappings: config.type_name_mappings.clone(),
        }
    }

    pub fn with_reserved_type_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_type_names
            .extend(names.into_iter().map(Into::into));
        self
    }

    fn base_name(&self, graph: &SchemaGraph, schema: SchemaId, hint: Option<&str>) -> String {
        let node = graph.node(schema);
        let pinned = node
            .extension_data
            .get(TYPE_NAME_EXTENSION)
            .and_then(|v| v.as_str());
        let hint = hint
            .map(|h| h.rsplit(['.', '/']).next().unwrap_or(h))
            .filter(|h| !h.trim().is_empty());

        pinned
            .or(node.title.as_deref().filter(|t| !t.trim().is_empty()))
            .or(hint)
            .map(to_type_identifier)
            .unwrap_or_else(|| "Anonymous".to_string())
    }
}

impl TypeNameGenerator for DefaultTypeNameGenerator {
    fn generate(
        &self,
        graph: &SchemaGraph,
        schema: SchemaId,
        type_name_hint: Option<&str>,
        reserved_type_names: &HashSet<String>,
    ) -> Result<String, NamingError> {
        let base = self.base_name(graph, schema, type_name_hint);
        let base = match self.type_name_mappings.get(&base) {
            Some(mapped) if is_valid_identifier(mapped) => mapped.clone(),
            Some(mapped) => {
                return Err(NamingError::InvalidMapping {
                    from: base,
                    to: mapped.clone(),
                });
            }
            None => base,
        };

        let taken =
            |name: &str| reserved_type_names.contains(name) || self.reserved_type_names.contains(name);
        if !taken(&base) {
            return Ok(base);
        }
        let mut i = 2;
        loop {
            let candidate = format!("{base}{i}");
            if !taken(&candidate) {
                return Ok(candidate);
            }
            i += 1;
        }
    }
}

/// Convert an arbitrary string into a PascalCase identifier.
pub fn to_type_identifier(name: &str) -> String {
    let pascal = sanitize_identifier(name).to_pascal_case();
    if pascal.is_empty() {
        return "Anonymous".to_string();
    }
    if pascal.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{pascal}");
    }
    pascal
}

pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Replace runs of non-alphanumeric characters with a single separator.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    result
}
