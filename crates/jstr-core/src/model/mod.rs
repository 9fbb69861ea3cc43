pub mod graph;
pub mod node;

pub use graph::SchemaGraph;
pub use node::{Discriminator, EnumValue, Items, JsonType, SchemaId, SchemaNode};

/// A loaded schema document: the node arena plus the id of the root schema.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub graph: SchemaGraph,
    pub root: SchemaId,
}

impl SchemaDocument {
    /// Definitions declared directly on the root schema.
    pub fn root_definitions(&self) -> &indexmap::IndexMap<String, SchemaId> {
        &self.graph.node(self.root).definitions
    }
}
