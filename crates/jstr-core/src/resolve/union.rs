use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ResolveError;
use crate::model::{SchemaGraph, SchemaId};

use super::resolver::TypeResolver;

/// One member of a rendered union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumerationItem {
    pub name: String,
    pub value: String,
}

/// Rendering view of a schema whose `oneOf` alternatives are type references.
#[derive(Debug, Clone)]
pub struct UnionTemplateModel {
    name: String,
    schema: SchemaId,
}

impl UnionTemplateModel {
    pub fn new(name: impl Into<String>, schema: SchemaId) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    /// Property schemas carry their description on the property instead.
    pub fn has_description(&self, graph: &SchemaGraph) -> bool {
        let node = graph.node(self.schema);
        !node.is_property
            && node
                .description
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty())
    }

    /// The description on a single line.
    pub fn description(&self, graph: &SchemaGraph) -> Option<String> {
        graph
            .node(self.schema)
            .description
            .as_deref()
            .map(|d| d.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join(" "))
    }

    pub fn extension_data<'a>(&self, graph: &'a SchemaGraph) -> &'a IndexMap<String, serde_json::Value> {
        &graph.node(self.schema).extension_data
    }

    /// Resolve each non-null `oneOf` entry in declaration order. Both the
    /// name and the value of a variant are the resolved type name.
    pub fn variants<R>(&self, resolver: &mut R) -> Result<Vec<EnumerationItem>, ResolveError>
    where
        R: TypeResolver + ?Sized,
    {
        let alternatives: Vec<SchemaId> = resolver
            .registry()
            .graph()
            .node(self.schema)
            .one_of
            .iter()
            .flatten()
            .copied()
            .collect();

        alternatives
            .into_iter()
            .map(|alternative| {
                let type_name = resolver.resolve(alternative, false, None)?;
                Ok(EnumerationItem {
                    name: type_name.clone(),
                    value: type_name,
                })
            })
            .collect()
    }
}
