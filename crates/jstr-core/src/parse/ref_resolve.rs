use std::collections::HashMap;

use indexmap::IndexMap;
use log::trace;

use super::schema::{AdditionalProperties, DiscriminatorSpec, ItemsOrTuple, Schema, SchemaOrRef};
use crate::error::ReferenceError;
use crate::model::{
    Discriminator, EnumValue, Items, SchemaDocument, SchemaGraph, SchemaId, SchemaNode,
};

/// Lowers a parsed document into a [`SchemaGraph`], turning every `$ref`
/// into a reference node.
///
/// Every definition is allocated before anything is lowered, so references
/// (including cyclic ones) always find their target by JSON pointer.
pub struct RefResolver {
    graph: SchemaGraph,
    pointers: HashMap<String, SchemaId>,
    /// Definition names of the root schema, for bare names in discriminator mappings.
    root_names: HashMap<String, SchemaId>,
}

impl Default for RefResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RefResolver {
    pub fn new() -> Self {
        Self {
            graph: SchemaGraph::new(),
            pointers: HashMap::new(),
            root_names: HashMap::new(),
        }
    }

    /// Lower `root` and everything reachable from it.
    pub fn build(mut self, root: &Schema) -> Result<SchemaDocument, ReferenceError> {
        let root_id = self.graph.add(SchemaNode::default());
        self.pointers.insert("#".to_string(), root_id);
        self.reserve_definitions(root, "#");
        for (section, entries) in root.definition_sections() {
            for name in entries.keys() {
                let pointer = format!("#/{section}/{}", escape_pointer(name));
                if let Some(&id) = self.pointers.get(&pointer) {
                    self.root_names.entry(name.clone()).or_insert(id);
                }
            }
        }

        let node = self.lower_schema(root, "#", false)?;
        *self.graph.node_mut(root_id) = node;

        Ok(SchemaDocument {
            graph: self.graph,
            root: root_id,
        })
    }

    /// Allocate a node for every definition below `schema`, keyed by JSON pointer.
    fn reserve_definitions(&mut self, schema: &Schema, pointer: &str) {
        for (section, entries) in schema.definition_sections() {
            for (name, entry) in entries {
                let child_pointer = format!("{pointer}/{section}/{}", escape_pointer(name));
                let id = self.graph.add(SchemaNode::default());
                trace!("reserved {child_pointer} as {id}");
                self.pointers.insert(child_pointer.clone(), id);
                if let SchemaOrRef::Schema(inner) = entry {
                    self.reserve_definitions(inner, &child_pointer);
                }
            }
        }
        for (child, child_pointer) in child_schemas(schema, pointer) {
            if let SchemaOrRef::Schema(inner) = child {
                self.reserve_definitions(inner, &child_pointer);
            }
        }
    }

    fn lower_schema(
        &mut self,
        schema: &Schema,
        pointer: &str,
        is_property: bool,
    ) -> Result<SchemaNode, ReferenceError> {
        let mut node = SchemaNode {
            types: schema
                .schema_type
                .as_ref()
                .map(|t| t.to_vec())
                .unwrap_or_default(),
            format: schema.format.clone(),
            title: schema.title.clone(),
            description: schema.description.clone(),
            nullable: schema.nullable,
            x_nullable: schema.x_nullable,
            required: schema.required.clone(),
            enumeration: schema
                .enum_values
                .iter()
                .cloned()
                .map(EnumValue::Literal)
                .collect(),
            extension_data: schema
                .extra
                .iter()
                .filter(|(key, _)| key.starts_with("x-"))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            is_property,
            ..SchemaNode::default()
        };

        // Definitions were reserved up front; fill their nodes in place.
        for (section, entries) in schema.definition_sections() {
            for (name, entry) in entries {
                let child_pointer = format!("{pointer}/{section}/{}", escape_pointer(name));
                let id = self
                    .pointers
                    .get(&child_pointer)
                    .copied()
                    .ok_or_else(|| ReferenceError::RefTargetNotFound(child_pointer.clone()))?;
                let lowered = match entry {
                    SchemaOrRef::Ref { ref_path } => SchemaNode {
                        reference: Some(self.lookup(ref_path)?),
                        ..SchemaNode::default()
                    },
                    SchemaOrRef::Schema(inner) => self.lower_schema(inner, &child_pointer, false)?,
                };
                *self.graph.node_mut(id) = lowered;
                node.definitions.entry(name.clone()).or_insert(id);
            }
        }

        for (name, prop) in &schema.properties {
            let child_pointer = format!("{pointer}/properties/{}", escape_pointer(name));
            let id = self.lower_child(prop, &child_pointer, true)?;
            node.properties.insert(name.clone(), id);
        }

        for (pattern, prop) in &schema.pattern_properties {
            let child_pointer = format!("{pointer}/patternProperties/{}", escape_pointer(pattern));
            let id = self.lower_child(prop, &child_pointer, false)?;
            node.pattern_properties.insert(pattern.clone(), id);
        }

        match &schema.additional_properties {
            Some(AdditionalProperties::Bool(allowed)) => {
                node.allow_additional_properties = *allowed;
            }
            Some(AdditionalProperties::Schema(s)) => {
                let child_pointer = format!("{pointer}/additionalProperties");
                node.additional_properties_schema = Some(self.lower_child(s, &child_pointer, false)?);
            }
            None => {}
        }

        if let Some(ref key) = schema.dictionary_key {
            let child_pointer = format!("{pointer}/x-dictionaryKey");
            node.dictionary_key = Some(self.lower_child(key, &child_pointer, false)?);
        }

        node.items = match &schema.items {
            Some(ItemsOrTuple::Single(item)) => {
                let child_pointer = format!("{pointer}/items");
                Some(Items::Single(self.lower_child(item, &child_pointer, false)?))
            }
            Some(ItemsOrTuple::Tuple(items)) => {
                let mut ids = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    ids.push(self.lower_child(item, &format!("{pointer}/items/{i}"), false)?);
                }
                Some(Items::Tuple(ids))
            }
            None => None,
        };

        for (i, sub) in schema.all_of.iter().enumerate() {
            let id = self.lower_child(sub, &format!("{pointer}/allOf/{i}"), false)?;
            node.all_of.push(id);
        }
        for (i, sub) in schema.any_of.iter().enumerate() {
            let id = self.lower_child(sub, &format!("{pointer}/anyOf/{i}"), false)?;
            node.any_of.push(id);
        }
        for (i, sub) in schema.one_of.iter().enumerate() {
            let id = match sub {
                Some(sub) => Some(self.lower_child(sub, &format!("{pointer}/oneOf/{i}"), false)?),
                None => None,
            };
            node.one_of.push(id);
        }

        node.discriminator = match &schema.discriminator {
            Some(DiscriminatorSpec::PropertyName(name)) => Some(Discriminator::new(name.clone())),
            Some(DiscriminatorSpec::Object(d)) => Some(self.lower_discriminator(
                &d.property_name,
                &d.mapping,
                &schema.one_of,
            )?),
            None => None,
        };

        Ok(node)
    }

    fn lower_child(
        &mut self,
        child: &SchemaOrRef,
        pointer: &str,
        is_property: bool,
    ) -> Result<SchemaId, ReferenceError> {
        match child {
            SchemaOrRef::Ref { ref_path } => {
                let target = self.lookup(ref_path)?;
                let id = self.graph.add_reference(target);
                self.graph.node_mut(id).is_property = is_property;
                Ok(id)
            }
            SchemaOrRef::Schema(schema) => {
                let node = self.lower_schema(schema, pointer, is_property)?;
                Ok(self.graph.add(node))
            }
        }
    }

    /// Mapping values may be pointers or bare definition names. Without an
    /// explicit mapping, each `$ref` alternative is keyed by its definition name.
    fn lower_discriminator(
        &self,
        property_name: &str,
        mapping: &IndexMap<String, String>,
        one_of: &[Option<SchemaOrRef>],
    ) -> Result<Discriminator, ReferenceError> {
        let mut discriminator = Discriminator::new(property_name);
        if mapping.is_empty() {
            for entry in one_of.iter().flatten() {
                if let SchemaOrRef::Ref { ref_path } = entry {
                    let name = ref_path.rsplit('/').next().unwrap_or(ref_path);
                    discriminator
                        .mapping
                        .insert(unescape_pointer(name), self.lookup(ref_path)?);
                }
            }
            return Ok(discriminator);
        }
        for (value, target) in mapping {
            let id = if target.starts_with('#') {
                self.lookup(target)?
            } else {
                self.root_names
                    .get(target)
                    .copied()
                    .ok_or_else(|| ReferenceError::RefTargetNotFound(target.clone()))?
            };
            discriminator.mapping.insert(value.clone(), id);
        }
        Ok(discriminator)
    }

    fn lookup(&self, ref_path: &str) -> Result<SchemaId, ReferenceError> {
        if !ref_path.starts_with('#') {
            return Err(ReferenceError::InvalidRefFormat(ref_path.to_string()));
        }
        let pointer = ref_path.trim_end_matches('/');
        self.pointers
            .get(pointer)
            .copied()
            .ok_or_else(|| ReferenceError::RefTargetNotFound(ref_path.to_string()))
    }
}

/// Sub-schemas that may themselves declare definitions, with their pointers.
fn child_schemas<'a>(schema: &'a Schema, pointer: &str) -> Vec<(&'a SchemaOrRef, String)> {
    let mut children = Vec::new();
    for (name, prop) in &schema.properties {
        children.push((prop, format!("{pointer}/properties/{}", escape_pointer(name))));
    }
    for (pattern, prop) in &schema.pattern_properties {
        children.push((
            prop,
            format!("{pointer}/patternProperties/{}", escape_pointer(pattern)),
        ));
    }
    if let Some(AdditionalProperties::Schema(ref s)) = schema.additional_properties {
        children.push((s.as_ref(), format!("{pointer}/additionalProperties")));
    }
    match &schema.items {
        Some(ItemsOrTuple::Single(item)) => children.push((item.as_ref(), format!("{pointer}/items"))),
        Some(ItemsOrTuple::Tuple(items)) => {
            for (i, item) in items.iter().enumerate() {
                children.push((item, format!("{pointer}/items/{i}")));
            }
        }
        None => {}
    }
    for (i, sub) in schema.all_of.iter().enumerate() {
        children.push((sub, format!("{pointer}/allOf/{i}")));
    }
    for (i, sub) in schema.any_of.iter().enumerate() {
        children.push((sub, format!("{pointer}/anyOf/{i}")));
    }
    for (i, sub) in schema.one_of.iter().enumerate() {
        if let Some(sub) = sub {
            children.push((sub, format!("{pointer}/oneOf/{i}")));
        }
    }
    children
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn unescape_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
