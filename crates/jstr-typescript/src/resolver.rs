use std::collections::HashMap;

use jstr_core::config::{NullValue, ResolverSettings, TypeScriptOptions};
use jstr_core::error::ResolveError;
use jstr_core::model::{Items, JsonType};
use jstr_core::{SchemaGraph, SchemaId, TypeRegistry, TypeResolver};

/// Resolves schemas to TypeScript type expressions.
pub struct TypeScriptTypeResolver {
    registry: TypeRegistry,
    options: TypeScriptOptions,
    /// Arrays and dictionaries being spelled inline, with the hint of the
    /// outermost usage.
    expanding: HashMap<SchemaId, Option<String>>,
}

impl TypeScriptTypeResolver {
    pub fn new(graph: SchemaGraph, settings: ResolverSettings, options: TypeScriptOptions) -> Self {
        Self::with_registry(TypeRegistry::new(graph, settings), options)
    }

    pub fn with_registry(registry: TypeRegistry, options: TypeScriptOptions) -> Self {
        Self {
            registry,
            options,
            expanding: HashMap::new(),
        }
    }

    pub fn options(&self) -> &TypeScriptOptions {
        &self.options
    }

    fn null_keyword(&self) -> &'static str {
        match self.options.null_value {
            NullValue::Null => "null",
            NullValue::Undefined => "undefined",
        }
    }

    /// The expression for a non-nullable usage of `schema`.
    fn resolve_expression(
        &mut self,
        schema: SchemaId,
        type_name_hint: Option<&str>,
    ) -> Result<String, ResolveError> {
        let resolvable = self.get_resolvable_schema(schema);
        let graph = self.registry().graph();
        let actual = graph.actual_schema(resolvable);

        // A discriminated definition is used through its synthesized wrapper.
        if let Some(wrapper) = self.registry().inheritance_wrapper(actual) {
            return self.get_or_generate_type_name(wrapper, type_name_hint);
        }
        if graph.is_any_type(actual) && !graph.has_reference(resolvable) {
            return Ok("any".to_string());
        }
        if self.generates_type(schema) || graph.is_enumeration(actual) {
            return self.get_or_generate_type_name(schema, type_name_hint);
        }

        if graph.is_array(actual) || graph.is_dictionary(actual) {
            if let Some(name) = self.registry().type_name(actual) {
                return Ok(name.to_string());
            }
            // Reached again while spelling itself: only a name can stop the expansion.
            if let Some(outer_hint) = self.expanding.get(&actual) {
                let hint = self
                    .definition_key(actual)
                    .or_else(|| outer_hint.clone())
                    .or_else(|| type_name_hint.map(str::to_string));
                return self.get_or_generate_type_name(actual, hint.as_deref());
            }

            self.expanding
                .insert(actual, type_name_hint.map(str::to_string));
            let expression = self.container_expression(actual);
            self.expanding.remove(&actual);
            let expression = expression?;
            return Ok(match self.registry().type_name(actual) {
                Some(name) => name.to_string(),
                None => expression,
            });
        }

        let node = graph.node(actual);
        match node.primary_type() {
            Some(JsonType::Integer | JsonType::Number) => Ok("number".to_string()),
            Some(JsonType::Boolean) => Ok("boolean".to_string()),
            Some(JsonType::String) => Ok("string".to_string()),
            Some(JsonType::File | JsonType::Object | JsonType::Array | JsonType::Null) => {
                Ok("any".to_string())
            }
            None if node.has_type(JsonType::Null) => Ok("null".to_string()),
            None if !node.one_of.is_empty() => {
                let alternatives = node.one_of.clone();
                self.resolve_inline_union(&alternatives)
            }
            None if !node.any_of.is_empty() => {
                let alternatives: Vec<Option<SchemaId>> =
                    node.any_of.iter().copied().map(Some).collect();
                self.resolve_inline_union(&alternatives)
            }
            None => Ok("any".to_string()),
        }
    }

    /// The body of a named array or dictionary. Recursive uses are spelled by name.
    pub(crate) fn alias_target(&mut self, schema: SchemaId) -> Result<String, ResolveError> {
        self.expanding.insert(schema, None);
        let expression = self.container_expression(schema);
        self.expanding.remove(&schema);
        expression
    }

    fn container_expression(&mut self, schema: SchemaId) -> Result<String, ResolveError> {
        let graph = self.registry().graph();
        if graph.is_array(schema) {
            return match graph.node(schema).items.clone() {
                Some(Items::Tuple(items)) => {
                    let members = items
                        .into_iter()
                        .map(|item| self.resolve_member(item))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(format!("[{}]", members.join(", ")))
                }
                Some(Items::Single(item)) => {
                    let element = self.resolve_member(item)?;
                    if element.contains('|') {
                        Ok(format!("({element})[]"))
                    } else {
                        Ok(format!("{element}[]"))
                    }
                }
                None => Ok("any[]".to_string()),
            };
        }

        let key = self.resolve_dictionary_key_type(schema, "string")?;
        let value = self.resolve_dictionary_value_type(schema, "any")?;
        Ok(if key == "string" || key == "number" {
            format!("{{ [key: {key}]: {value}; }}")
        } else {
            format!("{{ [key in {key}]?: {value}; }}")
        })
    }

    /// The key `schema` is declared under in some `definitions` section.
    fn definition_key(&self, schema: SchemaId) -> Option<String> {
        let graph = self.registry().graph();
        graph.ids().find_map(|id| {
            graph
                .node(id)
                .definitions
                .iter()
                .find(|(_, definition)| graph.actual_schema(**definition) == schema)
                .map(|(key, _)| key.clone())
        })
    }

    /// An element of an array or tuple, nullable when its schema is.
    fn resolve_member(&mut self, schema: SchemaId) -> Result<String, ResolveError> {
        let dialect = self.registry().settings().schema_type;
        let graph = self.registry().graph();
        let is_nullable = graph.is_nullable(graph.actual_schema(schema), dialect);
        self.resolve(schema, is_nullable, None)
    }

    fn resolve_inline_union(
        &mut self,
        alternatives: &[Option<SchemaId>],
    ) -> Result<String, ResolveError> {
        let mut members: Vec<String> = Vec::new();
        for alternative in alternatives {
            let member = match alternative {
                Some(schema) => self.resolve(*schema, false, None)?,
                None => "null".to_string(),
            };
            if !members.contains(&member) {
                members.push(member);
            }
        }
        Ok(members.join(" | "))
    }
}

impl TypeResolver for TypeScriptTypeResolver {
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
        let expression = self.resolve_expression(schema, type_name_hint)?;
        let null = self.null_keyword();
        if !is_nullable || expression == "any" || expression == null {
            return Ok(expression);
        }
        Ok(format!("{expression} | {null}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jstr_core::model::SchemaNode;

    fn resolver(graph: SchemaGraph) -> TypeScriptTypeResolver {
        TypeScriptTypeResolver::new(graph, ResolverSettings::default(), TypeScriptOptions::default())
    }

    #[test]
    fn test_primitives() {
        let mut graph = SchemaGraph::new();
        let integer = graph.add(SchemaNode::of_type(JsonType::Integer));
        let number = graph.add(SchemaNode::of_type(JsonType::Number));
        let boolean = graph.add(SchemaNode::of_type(JsonType::Boolean));
        let string = graph.add(SchemaNode::of_type(JsonType::String));
        let file = graph.add(SchemaNode::of_type(JsonType::File));
        let open = graph.add(SchemaNode::default());
        let mut ts = resolver(graph);

        assert_eq!(ts.resolve(integer, false, None).unwrap(), "number");
        assert_eq!(ts.resolve(number, false, None).unwrap(), "number");
        assert_eq!(ts.resolve(boolean, false, None).unwrap(), "boolean");
        assert_eq!(ts.resolve(string, false, None).unwrap(), "string");
        assert_eq!(ts.resolve(file, false, None).unwrap(), "any");
        assert_eq!(ts.resolve(open, false, None).unwrap(), "any");
        assert!(ts.types().is_empty());
    }

    #[test]
    fn test_nullable_usage() {
        let mut graph = SchemaGraph::new();
        let string = graph.add(SchemaNode::of_type(JsonType::String));
        let open = graph.add(SchemaNode::default());
        let mut ts = resolver(graph.clone());
        assert_eq!(ts.resolve(string, true, None).unwrap(), "string | null");
        assert_eq!(ts.resolve(open, true, None).unwrap(), "any");

        let mut ts = TypeScriptTypeResolver::new(
            graph,
            ResolverSettings::default(),
            TypeScriptOptions {
                null_value: NullValue::Undefined,
                ..TypeScriptOptions::default()
            },
        );
        assert_eq!(ts.resolve(string, true, None).unwrap(), "string | undefined");
    }

    #[test]
    fn test_arrays_and_tuples() {
        let mut graph = SchemaGraph::new();
        let string = graph.add(SchemaNode::of_type(JsonType::String));
        let nullable = graph.add(SchemaNode {
            types: vec![JsonType::Number, JsonType::Null],
            ..SchemaNode::default()
        });
        let list = graph.add(SchemaNode {
            items: Some(Items::Single(string)),
            ..SchemaNode::of_type(JsonType::Array)
        });
        let nullable_list = graph.add(SchemaNode {
            items: Some(Items::Single(nullable)),
            ..SchemaNode::of_type(JsonType::Array)
        });
        let untyped_list = graph.add(SchemaNode::of_type(JsonType::Array));
        let tuple = graph.add(SchemaNode {
            items: Some(Items::Tuple(vec![string, nullable])),
            ..SchemaNode::of_type(JsonType::Array)
        });
        let mut ts = resolver(graph);

        assert_eq!(ts.resolve(list, false, None).unwrap(), "string[]");
        assert_eq!(ts.resolve(nullable_list, false, None).unwrap(), "(number | null)[]");
        assert_eq!(ts.resolve(untyped_list, false, None).unwrap(), "any[]");
        assert_eq!(ts.resolve(tuple, false, None).unwrap(), "[string, number | null]");
    }

    #[test]
    fn test_dictionaries() {
        let mut graph = SchemaGraph::new();
        let integer = graph.add(SchemaNode::of_type(JsonType::Integer));
        let string = graph.add(SchemaNode::of_type(JsonType::String));
        let counts = graph.add(SchemaNode {
            additional_properties_schema: Some(integer),
            ..SchemaNode::of_type(JsonType::Object)
        });
        let mixed = graph.add(SchemaNode {
            allow_additional_properties: false,
            pattern_properties: [("^a".to_string(), integer), ("^b".to_string(), string)]
                .into_iter()
                .collect(),
            ..SchemaNode::of_type(JsonType::Object)
        });
        let mut ts = resolver(graph);

        assert_eq!(ts.resolve(counts, false, None).unwrap(), "{ [key: string]: number; }");
        assert_eq!(ts.resolve(mixed, false, None).unwrap(), "{ [key: string]: any; }");
    }

    #[test]
    fn test_objects_are_named() {
        let mut graph = SchemaGraph::new();
        let string = graph.add(SchemaNode::of_type(JsonType::String));
        let address = graph.add(SchemaNode {
            properties: [("street".to_string(), string)].into_iter().collect(),
            ..SchemaNode::of_type(JsonType::Object)
        });
        let reference = graph.add_reference(address);
        let mut ts = resolver(graph);

        assert_eq!(ts.resolve(address, false, Some("address")).unwrap(), "Address");
        assert_eq!(ts.resolve(reference, true, Some("other")).unwrap(), "Address | null");
        assert_eq!(ts.types().len(), 1);
    }

    #[test]
    fn test_recursive_containers_are_named() {
        let mut graph = SchemaGraph::new();
        let forest = graph.add(SchemaNode::of_type(JsonType::Array));
        let tree = graph.add_reference(forest);
        graph.node_mut(forest).items = Some(Items::Single(tree));
        let index = graph.add(SchemaNode::of_type(JsonType::Object));
        let entry = graph.add_reference(index);
        graph.node_mut(index).additional_properties_schema = Some(entry);
        let forest_usage = graph.add_reference(forest);
        let index_usage = graph.add_reference(index);
        let mut ts = resolver(graph);

        assert_eq!(ts.resolve(forest_usage, false, Some("forest")).unwrap(), "Forest");
        assert_eq!(ts.resolve(index_usage, true, Some("index")).unwrap(), "Index | null");
        assert_eq!(ts.alias_target(forest).unwrap(), "Forest[]");
        assert_eq!(ts.alias_target(index).unwrap(), "{ [key: string]: Index; }");
        assert_eq!(ts.types().values().collect::<Vec<_>>(), vec!["Forest", "Index"]);
    }

    #[test]
    fn test_inline_union() {
        let mut graph = SchemaGraph::new();
        let string = graph.add(SchemaNode::of_type(JsonType::String));
        let number = graph.add(SchemaNode::of_type(JsonType::Number));
        let union = graph.add(SchemaNode {
            one_of: vec![Some(string), None, Some(number)],
            ..SchemaNode::default()
        });
        let mut ts = resolver(graph);
        assert_eq!(ts.resolve(union, false, None).unwrap(), "string | null | number");
    }
}
