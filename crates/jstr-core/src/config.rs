use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.jstr.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JstrConfig {
    pub input: String,
    pub output: String,
    pub resolver: ResolverSettings,
    pub typescript: TypeScriptOptions,
}

impl Default for JstrConfig {
    fn default() -> Self {
        Self {
            input: "schema.json".to_string(),
            output: "src/generated".to_string(),
            resolver: ResolverSettings::default(),
            typescript: TypeScriptOptions::default(),
        }
    }
}

/// Settings shared by every target language's type resolver.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Inline named definitions that accept any value instead of giving them a type name.
    pub inline_named_any: bool,
    /// Dialect used when deciding whether a schema is nullable.
    pub schema_type: SchemaType,
    pub naming: NamingConfig,
}

/// The schema dialect, which changes how nullability is declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaType {
    /// `type: [..., "null"]` only.
    #[default]
    JsonSchema,
    /// Additionally honours `x-nullable: true`.
    Swagger2,
    /// Additionally honours `nullable: true`.
    OpenApi3,
}

/// Type naming options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Names that must never be assigned to a generated type (e.g. target-language builtins).
    pub reserved_type_names: Vec<String>,
    /// Map from a derived type name to a custom one.
    pub type_name_mappings: IndexMap<String, String>,
}

/// TypeScript output options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TypeScriptOptions {
    pub export_types: bool,
    pub null_value: NullValue,
    /// Hint used to name the document root when it is itself a type.
    pub root_type_name: String,
}

impl Default for TypeScriptOptions {
    fn default() -> Self {
        Self {
            export_types: true,
            null_value: NullValue::Null,
            root_type_name: "Root".to_string(),
        }
    }
}

/// How a nullable usage site is spelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullValue {
    #[default]
    Null,
    Undefined,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".jstr.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<JstrConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: JstrConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# jstr configuration
input: schema.json
output: src/generated

resolver:
  inline_named_any: false
  schema_type: json_schema   # json_schema | swagger2 | open_api3
  naming:
    reserved_type_names: []
    type_name_mappings: {}
      # LegacyName: ModernName

typescript:
  export_types: true
  null_value: "null"         # "null" | undefined
  root_type_name: Root
"#
}
