use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::config::{ResolverSettings, SchemaType};
use crate::error::NamingError;
use crate::model::{Discriminator, EnumValue, SchemaGraph, SchemaId, SchemaNode};

use super::name_generator::{DefaultTypeNameGenerator, TypeNameGenerator, is_valid_identifier};

/// State of one resolution session: the schema graph, the type name cache,
/// and the bookkeeping that keeps definition registration idempotent.
///
/// The cache only grows. Once a schema has a name it keeps it for the
/// lifetime of the registry.
pub struct TypeRegistry {
    graph: SchemaGraph,
    settings: ResolverSettings,
    name_generator: Box<dyn TypeNameGenerator>,
    generated_type_names: IndexMap<SchemaId, String>,
    reserved_type_names: HashSet<String>,
    /// Schemas whose nested definitions are currently being registered.
    registering: HashSet<SchemaId>,
    preprocessed: HashSet<SchemaId>,
    inheritance_wrappers: HashMap<SchemaId, SchemaId>,
    wrapped_definitions: HashMap<SchemaId, SchemaId>,
}

impl TypeRegistry {
    /// A registry using the [`DefaultTypeNameGenerator`] built from `settings.naming`.
    pub fn new(graph: SchemaGraph, settings: ResolverSettings) -> Self {
        let generator = DefaultTypeNameGenerator::from_config(&settings.naming);
        Self::with_name_generator(graph, settings, Box::new(generator))
    }

    pub fn with_name_generator(
        graph: SchemaGraph,
        settings: ResolverSettings,
        name_generator: Box<dyn TypeNameGenerator>,
    ) -> Self {
        Self {
            graph,
            settings,
            name_generator,
            generated_type_names: IndexMap::new(),
            reserved_type_names: HashSet::new(),
            registering: HashSet::new(),
            preprocessed: HashSet::new(),
            inheritance_wrappers: HashMap::new(),
            wrapped_definitions: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Every schema named so far, in assignment order.
    pub fn types(&self) -> &IndexMap<SchemaId, String> {
        &self.generated_type_names
    }

    pub fn type_name(&self, schema: SchemaId) -> Option<&str> {
        self.generated_type_names.get(&schema).map(String::as_str)
    }

    /// The wrapper synthesized for a discriminated definition, if any.
    pub fn inheritance_wrapper(&self, schema: SchemaId) -> Option<SchemaId> {
        self.inheritance_wrappers.get(&schema).copied()
    }

    /// The discriminated definition that `wrapper` was synthesized for.
    pub fn wrapped_definition(&self, wrapper: SchemaId) -> Option<SchemaId> {
        self.wrapped_definitions.get(&wrapper).copied()
    }

    /// Return the cached name of `schema` or ask the name generator for a new one.
    pub(crate) fn assign_type_name(
        &mut self,
        schema: SchemaId,
        type_name_hint: Option<&str>,
    ) -> Result<String, NamingError> {
        if let Some(name) = self.generated_type_names.get(&schema) {
            trace!("cache hit for {schema}: {name}");
            return Ok(name.clone());
        }

        let name = self.name_generator.generate(
            &self.graph,
            schema,
            type_name_hint,
            &self.reserved_type_names,
        )?;
        if !is_valid_identifier(&name) {
            return Err(NamingError::InvalidIdentifier(name));
        }
        if !self.reserved_type_names.insert(name.clone()) {
            return Err(NamingError::Collision(name));
        }
        debug!("assigned type name {name} to {schema}");
        self.generated_type_names.insert(schema, name.clone());
        Ok(name)
    }

    /// Mark `schema` as having its definitions registered. Returns `false`
    /// when that is already in progress further up the stack.
    pub(crate) fn begin_registration(&mut self, schema: SchemaId) -> bool {
        self.registering.insert(schema)
    }

    pub(crate) fn end_registration(&mut self, schema: SchemaId) {
        self.registering.remove(&schema);
    }

    /// Remove a nullable `oneOf` wrapper.
    ///
    /// Enumerations without a type and discriminated objects keep their
    /// wrapper. Otherwise, when exactly one `oneOf` alternative is not
    /// nullable, that alternative is the real type.
    pub fn remove_nullability(&self, schema: SchemaId) -> SchemaId {
        let graph = &self.graph;
        if graph.has_no_type(schema) && graph.is_enumeration(schema) {
            return schema;
        }
        if graph.is_object(schema) && graph.actual_discriminator(schema).is_some() {
            return schema;
        }

        let mut alternatives = self.non_nullable_one_of(schema);
        match (alternatives.next(), alternatives.next()) {
            (Some(only), None) => only,
            _ => schema,
        }
    }

    /// Whether a schema found among definitions should get its own type.
    pub fn is_definition_type_schema(&self, schema: SchemaId) -> bool {
        let graph = &self.graph;
        if graph.is_any_type(schema) && self.settings.inline_named_any {
            return false;
        }

        !graph.is_tuple(schema)
            && !graph.is_dictionary(schema)
            && !graph.is_array(schema)
            && (graph.is_enumeration(schema) || graph.has_no_type(schema) || graph.is_object(schema))
    }

    /// Rewrite a definition before it is named and return the schema that
    /// should carry the definition's name.
    ///
    /// Runs once per schema; later calls return the earlier result.
    pub(crate) fn prepare_definition(&mut self, schema: SchemaId) -> SchemaId {
        if let Some(wrapper) = self.inheritance_wrapper(schema) {
            return wrapper;
        }
        if !self.preprocessed.insert(schema) {
            return schema;
        }

        self.expand_one_of_enumeration(schema);
        match self.synthesize_inheritance(schema) {
            Some(wrapper) => {
                self.inheritance_wrappers.insert(schema, wrapper);
                self.wrapped_definitions.insert(wrapper, schema);
                wrapper
            }
            None => schema,
        }
    }

    /// A type-less schema with several non-nullable alternatives is an
    /// enumeration of those alternatives.
    fn expand_one_of_enumeration(&mut self, schema: SchemaId) {
        if !self.graph.has_no_type(schema) || self.non_nullable_one_of(schema).count() <= 1 {
            return;
        }

        let members: Vec<EnumValue> = self
            .graph
            .node(schema)
            .one_of
            .iter()
            .map(|entry| match entry {
                Some(alternative) => EnumValue::Schema(*alternative),
                None => EnumValue::Literal(serde_json::Value::Null),
            })
            .collect();
        debug!(
            "{schema}: reading {} oneOf alternatives as enumeration members",
            members.len()
        );
        self.graph.node_mut(schema).enumeration.extend(members);
    }

    /// Reshape a discriminated `oneOf` into inheritance: a new wrapper schema
    /// composes every mapped subtype plus the original schema, and each
    /// subtype's discriminator maps its value back to the wrapper.
    ///
    /// Subtypes are shared with the original hierarchy. A discriminator value
    /// that already points elsewhere is overwritten.
    fn synthesize_inheritance(&mut self, schema: SchemaId) -> Option<SchemaId> {
        let discriminator = self.graph.actual_discriminator(schema)?.clone();
        if self.graph.node(schema).one_of.is_empty() {
            return None;
        }

        let wrapper = self.graph.add(SchemaNode::default());
        for (value, subtype) in &discriminator.mapping {
            let subtype = self.graph.actual_schema(*subtype);
            self.graph.node_mut(wrapper).all_of.push(subtype);

            let inherited = self
                .graph
                .node_mut(subtype)
                .discriminator
                .get_or_insert_with(|| Discriminator::new(discriminator.property_name.clone()));
            if let Some(previous) = inherited.mapping.insert(value.clone(), wrapper)
                && previous != wrapper
            {
                warn!(
                    "discriminator value {value:?} on {subtype} remapped from {previous} to {wrapper}"
                );
            }
        }
        self.graph.node_mut(wrapper).all_of.push(schema);
        debug!(
            "{schema}: synthesized inheritance wrapper {wrapper} over {} subtypes",
            discriminator.mapping.len()
        );
        Some(wrapper)
    }

    fn non_nullable_one_of(&self, schema: SchemaId) -> impl Iterator<Item = SchemaId> + '_ {
        self.graph
            .node(schema)
            .one_of
            .iter()
            .flatten()
            .copied()
            .filter(|alternative| !self.graph.is_nullable(*alternative, SchemaType::JsonSchema))
    }
}
