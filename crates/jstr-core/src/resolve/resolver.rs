use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::error::ResolveError;
use crate::model::SchemaId;

use super::registry::TypeRegistry;

/// Maps schemas to type expressions of one target language.
///
/// Implementors supply [`resolve`](TypeResolver::resolve) and access to their
/// [`TypeRegistry`]; registration, classification, and name caching are
/// shared through the provided methods.
pub trait TypeResolver {
    fn registry(&self) -> &TypeRegistry;

    fn registry_mut(&mut self) -> &mut TypeRegistry;

    /// Resolve `schema` to a type expression for a usage site.
    ///
    /// `is_nullable` only changes the usage-site expression; the named type
    /// behind it is the same either way.
    fn resolve(
        &mut self,
        schema: SchemaId,
        is_nullable: bool,
        type_name_hint: Option<&str>,
    ) -> Result<String, ResolveError>;

    /// Every schema named so far, in assignment order.
    fn types(&self) -> &IndexMap<SchemaId, String> {
        self.registry().types()
    }

    fn try_resolve(
        &mut self,
        schema: Option<SchemaId>,
        type_name_hint: Option<&str>,
    ) -> Result<Option<String>, ResolveError> {
        schema
            .map(|schema| self.resolve(schema, false, type_name_hint))
            .transpose()
    }

    /// Name `schema` after stripping nullability and references, registering
    /// its nested definitions first. Repeated calls return the cached name.
    fn get_or_generate_type_name(
        &mut self,
        schema: SchemaId,
        type_name_hint: Option<&str>,
    ) -> Result<String, ResolveError> {
        let schema = {
            let unwrapped = self.remove_nullability(schema);
            self.registry().graph().actual_schema(unwrapped)
        };
        if let Some(name) = self.registry().type_name(schema) {
            return Ok(name.to_string());
        }

        if self.registry_mut().begin_registration(schema) {
            let definitions = self.registry().graph().node(schema).definitions.clone();
            let registered = self.register_schema_definitions(&definitions);
            self.registry_mut().end_registration(schema);
            registered?;
        }

        Ok(self.registry_mut().assign_type_name(schema, type_name_hint)?)
    }

    /// Name every definition that should become a type, using the definition
    /// key as the hint.
    fn register_schema_definitions(
        &mut self,
        definitions: &IndexMap<String, SchemaId>,
    ) -> Result<(), ResolveError> {
        for (name, definition) in definitions {
            let schema = self.registry().graph().actual_schema(*definition);
            if !self.is_definition_type_schema(schema) {
                continue;
            }

            let target = self.registry_mut().prepare_definition(schema);
            if target != schema {
                debug!("definition {name} is named through its inheritance wrapper {target}");
            }
            self.get_or_generate_type_name(target, Some(name))?;
        }
        Ok(())
    }

    fn remove_nullability(&self, schema: SchemaId) -> SchemaId {
        self.registry().remove_nullability(schema)
    }

    /// The schema that carries type identity: `schema` itself when its target
    /// is a definition type, otherwise the dereferenced target.
    fn get_resolvable_schema(&self, schema: SchemaId) -> SchemaId {
        let schema = self.remove_nullability(schema);
        let actual = self.registry().graph().actual_schema(schema);
        if self.is_definition_type_schema(actual) {
            schema
        } else {
            actual
        }
    }

    /// Whether `schema` produces a named type (class, enum, union, ...)
    /// rather than an inline expression.
    fn generates_type(&self, schema: SchemaId) -> bool {
        let schema = self.get_resolvable_schema(schema);
        let graph = self.registry().graph();
        graph.has_reference(schema)
            || (graph.is_object(schema) && !graph.is_dictionary(schema) && !graph.is_any_type(schema))
    }

    fn is_definition_type_schema(&self, schema: SchemaId) -> bool {
        self.registry().is_definition_type_schema(schema)
    }

    /// Value type of a dictionary schema, or `fallback_type` when it cannot
    /// be narrowed to a single type.
    fn resolve_dictionary_value_type(
        &mut self,
        schema: SchemaId,
        fallback_type: &str,
    ) -> Result<String, ResolveError> {
        let dialect = self.registry().settings().schema_type;
        let graph = self.registry().graph();
        let node = graph.node(schema);

        if let Some(additional) = node.additional_properties_schema {
            let is_nullable = graph.is_nullable(graph.actual_schema(additional), dialect);
            return self.resolve(additional, is_nullable, None);
        }

        if !node.allow_additional_properties && !node.pattern_properties.is_empty() {
            let patterns: Vec<(SchemaId, bool)> = node
                .pattern_properties
                .values()
                .map(|p| (*p, graph.is_nullable(*p, dialect)))
                .collect();
            let mut value_types = IndexSet::new();
            for (pattern, is_nullable) in patterns {
                value_types.insert(self.resolve(pattern, is_nullable, None)?);
            }
            if value_types.len() == 1
                && let Some(value_type) = value_types.pop()
            {
                return Ok(value_type);
            }
        }

        Ok(fallback_type.to_string())
    }

    /// Key type of a dictionary schema (`x-dictionaryKey`), or `fallback_type`.
    fn resolve_dictionary_key_type(
        &mut self,
        schema: SchemaId,
        fallback_type: &str,
    ) -> Result<String, ResolveError> {
        let dialect = self.registry().settings().schema_type;
        let graph = self.registry().graph();
        let dictionary_key = graph.node(schema).dictionary_key;
        match dictionary_key {
            Some(key) => {
                let is_nullable = graph.is_nullable(graph.actual_schema(key), dialect);
                self.resolve(key, is_nullable, None)
            }
            None => Ok(fallback_type.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverSettings;
    use crate::model::{JsonType, SchemaGraph, SchemaNode};

    struct Names(TypeRegistry);

    impl TypeResolver for Names {
        fn registry(&self) -> &TypeRegistry {
            &self.0
        }

        fn registry_mut(&mut self) -> &mut TypeRegistry {
            &mut self.0
        }

        fn resolve(
            &mut self,
            schema: SchemaId,
            _is_nullable: bool,
            type_name_hint: Option<&str>,
        ) -> Result<String, ResolveError> {
            self.get_or_generate_type_name(schema, type_name_hint)
        }
    }

    #[test]
    fn test_generates_type() {
        let mut graph = SchemaGraph::new();
        let string = graph.add(SchemaNode::of_type(JsonType::String));
        let null = graph.add(SchemaNode::of_type(JsonType::Null));
        let object = graph.add(SchemaNode {
            properties: [("name".to_string(), string)].into_iter().collect(),
            ..SchemaNode::of_type(JsonType::Object)
        });
        let dictionary = graph.add(SchemaNode {
            additional_properties_schema: Some(string),
            ..SchemaNode::of_type(JsonType::Object)
        });
        let open_object = graph.add(SchemaNode::of_type(JsonType::Object));
        let reference = graph.add_reference(object);
        let dictionary_reference = graph.add_reference(dictionary);
        let nullable_reference = graph.add(SchemaNode {
            one_of: vec![Some(null), Some(reference)],
            ..SchemaNode::default()
        });
        let names = Names(TypeRegistry::new(graph, ResolverSettings::default()));

        assert!(names.generates_type(reference));
        assert!(names.generates_type(object));
        assert!(names.generates_type(nullable_reference));
        assert!(!names.generates_type(dictionary));
        assert!(!names.generates_type(dictionary_reference));
        assert!(!names.generates_type(open_object));
        assert!(!names.generates_type(string));
        assert_eq!(names.get_resolvable_schema(nullable_reference), reference);
    }
}
