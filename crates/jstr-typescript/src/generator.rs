use jstr_core::config::JstrConfig;
use jstr_core::error::ResolveError;
use jstr_core::{CodeGenerator, GeneratedFile, SchemaDocument, TypeResolver};
use log::debug;
use thiserror::Error;

use crate::emitters;
use crate::resolver::TypeScriptTypeResolver;

#[derive(Debug, Error)]
pub enum TypeScriptError {
    #[error("type resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("template render failed: {0}")]
    Template(#[from] minijinja::Error),
}

/// TypeScript declaration generator.
pub struct TypeScriptGenerator;

impl TypeScriptGenerator {
    /// Register the document's definitions, and the root itself when it is a
    /// type, returning the resolver that holds the resulting names.
    pub fn resolve_document(
        document: SchemaDocument,
        config: &JstrConfig,
    ) -> Result<TypeScriptTypeResolver, ResolveError> {
        let root = document.root;
        let definitions = document.root_definitions().clone();
        let mut resolver = TypeScriptTypeResolver::new(
            document.graph,
            config.resolver.clone(),
            config.typescript.clone(),
        );

        resolver.register_schema_definitions(&definitions)?;
        if resolver.is_definition_type_schema(root) && !resolver.registry().graph().is_any_type(root) {
            let name = resolver.get_or_generate_type_name(root, Some(&config.typescript.root_type_name))?;
            debug!("document root is named {name}");
        }
        Ok(resolver)
    }
}

impl CodeGenerator for TypeScriptGenerator {
    type Config = JstrConfig;
    type Error = TypeScriptError;

    fn generate(
        &self,
        document: SchemaDocument,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error> {
        let mut resolver = Self::resolve_document(document, config)?;
        Ok(vec![GeneratedFile {
            path: "types.ts".to_string(),
            content: emitters::types::emit_types(&mut resolver)?,
        }])
    }
}
