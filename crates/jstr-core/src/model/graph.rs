use crate::config::SchemaType;

use super::node::{Discriminator, Items, JsonType, SchemaId, SchemaNode};

/// Arena of schema nodes. Nodes are never removed, so a [`SchemaId`] stays
/// valid for the lifetime of the graph.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    nodes: Vec<SchemaNode>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SchemaNode) -> SchemaId {
        self.nodes.push(node);
        SchemaId(self.nodes.len() - 1)
    }

    /// Add a `$ref` node pointing at `target`.
    pub fn add_reference(&mut self, target: SchemaId) -> SchemaId {
        self.add(SchemaNode {
            reference: Some(target),
            ..SchemaNode::default()
        })
    }

    pub fn node(&self, id: SchemaId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: SchemaId) -> &mut SchemaNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SchemaId> + '_ {
        (0..self.nodes.len()).map(SchemaId)
    }

    /// Follow the reference chain starting at `id`.
    ///
    /// A reference cycle stops after every node has been visited once and
    /// yields the node reached at that point.
    pub fn actual_schema(&self, id: SchemaId) -> SchemaId {
        let mut current = id;
        for _ in 0..self.nodes.len() {
            match self.node(current).reference {
                Some(target) => current = target,
                None => break,
            }
        }
        current
    }

    pub fn has_reference(&self, id: SchemaId) -> bool {
        self.node(id).reference.is_some()
    }

    pub fn has_no_type(&self, id: SchemaId) -> bool {
        self.node(id).has_no_type()
    }

    pub fn is_object(&self, id: SchemaId) -> bool {
        self.node(id).has_type(JsonType::Object)
    }

    pub fn is_array(&self, id: SchemaId) -> bool {
        self.node(id).has_type(JsonType::Array)
    }

    pub fn is_tuple(&self, id: SchemaId) -> bool {
        self.is_array(id) && matches!(self.node(id).items, Some(Items::Tuple(_)))
    }

    pub fn is_enumeration(&self, id: SchemaId) -> bool {
        !self.node(id).enumeration.is_empty()
    }

    /// An object without declared properties whose values are described by
    /// `additionalProperties` or `patternProperties`.
    pub fn is_dictionary(&self, id: SchemaId) -> bool {
        let node = self.node(id);
        self.is_object(id)
            && node.properties.is_empty()
            && (node.additional_properties_schema.is_some() || !node.pattern_properties.is_empty())
    }

    /// An open schema that accepts any value.
    pub fn is_any_type(&self, id: SchemaId) -> bool {
        let node = self.node(id);
        (node.has_no_type() || node.has_type(JsonType::Object))
            && node.reference.is_none()
            && node.all_of.is_empty()
            && node.any_of.is_empty()
            && node.one_of.is_empty()
            && node.properties.is_empty()
            && node.pattern_properties.is_empty()
            && node.allow_additional_properties
            && node.additional_properties_schema.is_none()
            && node.enumeration.is_empty()
            && node.discriminator.is_none()
    }

    /// Whether the schema admits `null` under the given dialect.
    pub fn is_nullable(&self, id: SchemaId, dialect: SchemaType) -> bool {
        let node = self.node(id);
        if node.enumeration.iter().any(|e| e.is_null()) {
            return true;
        }
        if node.has_type(JsonType::Null) {
            return true;
        }
        if node.has_no_type()
            && node.one_of.iter().any(|entry| match entry {
                Some(alternative) => self.is_nullable(*alternative, dialect),
                None => true,
            })
        {
            return true;
        }
        match dialect {
            SchemaType::JsonSchema => false,
            SchemaType::Swagger2 => node.x_nullable == Some(true),
            SchemaType::OpenApi3 => node.nullable == Some(true),
        }
    }

    /// The discriminator declared on the node itself, or on the node it references.
    pub fn actual_discriminator(&self, id: SchemaId) -> Option<&Discriminator> {
        self.node(id)
            .discriminator
            .as_ref()
            .or_else(|| self.node(self.actual_schema(id)).discriminator.as_ref())
    }
}
