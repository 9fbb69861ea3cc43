use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identity of a node in a [`SchemaGraph`](super::SchemaGraph).
///
/// Identity is positional: two `$ref` usages of the same definition are
/// different nodes whose `actual_schema` is the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SchemaId(pub(crate) usize);

impl SchemaId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A JSON Schema `type` keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    /// Swagger 2 file upload.
    File,
}

/// `items` is either one schema for every element or a positional tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Items {
    Single(SchemaId),
    Tuple(Vec<SchemaId>),
}

/// A member of a schema's enumeration list.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumValue {
    Literal(serde_json::Value),
    /// A named alternative, added when a type-less `oneOf` is read as an enumeration.
    Schema(SchemaId),
}

impl EnumValue {
    pub fn is_null(&self) -> bool {
        matches!(self, EnumValue::Literal(serde_json::Value::Null))
    }
}

/// Marks a schema as the base of a closed polymorphic hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminator {
    pub property_name: String,
    pub mapping: IndexMap<String, SchemaId>,
}

impl Discriminator {
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            mapping: IndexMap::new(),
        }
    }
}

/// A node of the schema graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// Set when this node is a `$ref` to another node.
    pub reference: Option<SchemaId>,
    /// Declared JSON types; empty means no `type` keyword.
    pub types: Vec<JsonType>,
    pub format: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// OpenAPI 3 `nullable`.
    pub nullable: Option<bool>,
    /// Swagger 2 `x-nullable`.
    pub x_nullable: Option<bool>,
    pub properties: IndexMap<String, SchemaId>,
    pub required: Vec<String>,
    pub allow_additional_properties: bool,
    pub additional_properties_schema: Option<SchemaId>,
    pub pattern_properties: IndexMap<String, SchemaId>,
    pub dictionary_key: Option<SchemaId>,
    pub items: Option<Items>,
    pub all_of: Vec<SchemaId>,
    pub any_of: Vec<SchemaId>,
    /// `None` entries are literal `null`s in the document.
    pub one_of: Vec<Option<SchemaId>>,
    pub enumeration: Vec<EnumValue>,
    pub discriminator: Option<Discriminator>,
    pub definitions: IndexMap<String, SchemaId>,
    /// `x-*` keys carried through for templates.
    pub extension_data: IndexMap<String, serde_json::Value>,
    /// The node was declared as the value of an object property.
    pub is_property: bool,
}

impl Default for SchemaNode {
    fn default() -> Self {
        Self {
            reference: None,
            types: Vec::new(),
            format: None,
            title: None,
            description: None,
            nullable: None,
            x_nullable: None,
            properties: IndexMap::new(),
            required: Vec::new(),
            allow_additional_properties: true,
            additional_properties_schema: None,
            pattern_properties: IndexMap::new(),
            dictionary_key: None,
            items: None,
            all_of: Vec::new(),
            any_of: Vec::new(),
            one_of: Vec::new(),
            enumeration: Vec::new(),
            discriminator: None,
            definitions: IndexMap::new(),
            extension_data: IndexMap::new(),
            is_property: false,
        }
    }
}

impl SchemaNode {
    pub fn of_type(json_type: JsonType) -> Self {
        Self {
            types: vec![json_type],
            ..Self::default()
        }
    }

    pub fn has_type(&self, json_type: JsonType) -> bool {
        self.types.contains(&json_type)
    }

    pub fn has_no_type(&self) -> bool {
        self.types.is_empty()
    }

    /// The first declared type other than `null`.
    pub fn primary_type(&self) -> Option<JsonType> {
        self.types.iter().copied().find(|t| *t != JsonType::Null)
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}
