pub mod config;
pub mod error;
pub mod model;
pub mod parse;
pub mod resolve;

pub use model::{SchemaDocument, SchemaGraph, SchemaId};
pub use resolve::{TypeRegistry, TypeResolver};

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that produce files from a loaded schema document.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        document: SchemaDocument,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
