use jstr_core::config::ResolverSettings;
use jstr_core::error::ResolveError;
use jstr_core::{SchemaDocument, SchemaId, TypeRegistry, TypeResolver};

/// Minimal target that spells primitives by their JSON type name.
pub struct NameResolver {
    registry: TypeRegistry,
}

impl NameResolver {
    pub fn new(document: SchemaDocument) -> Self {
        Self::with_settings(document, ResolverSettings::default())
    }

    pub fn with_settings(document: SchemaDocument, settings: ResolverSettings) -> Self {
        Self {
            registry: TypeRegistry::new(document.graph, settings),
        }
    }
}

impl TypeResolver for NameResolver {
    fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    fn resolve(
        &mut self,
        schema: SchemaId,
        is_nullable: bool,
        type_name_hint: Option<&str>,
    ) -> Result<String, ResolveError> {
        let resolvable = self.get_resolvable_schema(schema);
        let graph = self.registry().graph();
        let actual = graph.actual_schema(resolvable);
        let is_named = self.generates_type(schema) || graph.is_enumeration(actual);
        let is_dictionary = graph.is_dictionary(actual);
        let primitive = graph
            .node(actual)
            .primary_type()
            .map(|t| format!("{t:?}").to_lowercase());

        let name = if is_named {
            self.get_or_generate_type_name(schema, type_name_hint)?
        } else if is_dictionary {
            let value = self.resolve_dictionary_value_type(actual, "any")?;
            format!("map<{value}>")
        } else {
            primitive.unwrap_or_else(|| "any".to_string())
        };

        Ok(if is_nullable {
            format!("{name} | null")
        } else {
            name
        })
    }
}

/// Load a fixture and register every root definition.
pub fn registered(json: &str) -> (NameResolver, SchemaDocument) {
    let document = jstr_core::parse::load_json(json).unwrap();
    let mut resolver = NameResolver::new(document.clone());
    let definitions = document.root_definitions().clone();
    resolver.register_schema_definitions(&definitions).unwrap();
    (resolver, document)
}

/// The name cache as `(definition key, type name)` pairs where the schema
/// is a root definition.
pub fn named_definitions(resolver: &NameResolver, document: &SchemaDocument) -> Vec<(String, String)> {
    document
        .root_definitions()
        .iter()
        .filter_map(|(key, id)| {
            resolver
                .registry()
                .type_name(*id)
                .map(|name| (key.clone(), name.to_string()))
        })
        .collect()
}
