use jstr_core::config::{JstrConfig, ResolverSettings, SchemaType};
use jstr_core::{CodeGenerator, TypeResolver, parse};
use jstr_typescript::TypeScriptGenerator;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const SHAPES: &str = include_str!("fixtures/shapes.json");

fn openapi_config() -> JstrConfig {
    JstrConfig {
        resolver: ResolverSettings {
            schema_type: SchemaType::OpenApi3,
            ..ResolverSettings::default()
        },
        ..JstrConfig::default()
    }
}

fn generate(document: jstr_core::SchemaDocument, config: &JstrConfig) -> String {
    let files = TypeScriptGenerator.generate(document, config).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "types.ts");
    files[0].content.clone()
}

#[test]
fn discriminated_union_renders_as_type_alias() {
    let document = parse::load_json(
        r##"{
            "definitions": {
                "Cat": {
                    "type": "object",
                    "required": ["kind"],
                    "properties": {
                        "kind": { "type": "string" },
                        "name": { "type": ["string", "null"], "description": "Call */ name" }
                    }
                },
                "Dog": {
                    "type": "object",
                    "required": ["kind"],
                    "properties": { "kind": { "type": "string" } }
                },
                "Pet": {
                    "type": "object",
                    "description": "A cat\nor a dog.",
                    "discriminator": {
                        "propertyName": "kind",
                        "mapping": { "cat": "#/definitions/Cat", "dog": "#/definitions/Dog" }
                    },
                    "oneOf": [{ "$ref": "#/definitions/Cat" }, { "$ref": "#/definitions/Dog" }]
                },
                "Color": { "type": "string", "enum": ["red", "green"] },
                "Anything": {}
            }
        }"##,
    )
    .unwrap();

    let types = generate(document, &JstrConfig::default());
    insta::assert_snapshot!(types, @r#"
    // Generated by jstr. Do not edit.

    export interface Cat {
      kind: "cat";
      /** Call *\/ name */
      name?: string | null;
    }

    export interface Dog {
      kind: "dog";
    }

    /** A cat or a dog. */
    export type Pet = Cat | Dog;

    export type Color = "red" | "green";

    export type Anything = any;
    "#);
}

#[test]
fn openapi_document_renders_every_schema() {
    let document = parse::load_yaml(PETSTORE).unwrap();
    let types = generate(document, &openapi_config());

    assert!(types.contains("/** A pet in the store. Either a cat or a dog. */\nexport type Pet = Cat | Dog;"));
    assert!(types.contains("export interface Cat {\n  petType: \"Cat\";\n  indoor?: boolean;\n}"));
    assert!(types.contains("  tags?: string[];"));
    assert!(types.contains("export type Status = \"available\" | \"pending\" | \"sold\";"));

    assert!(types.contains("  /** Full name. */\n  name: string;"));
    assert!(types.contains("  nickname?: string | null;"));
    assert!(types.contains("  pets?: Pet[];"));
    assert!(types.contains("  address?: Address;"));
    assert!(types.contains("  scores?: { [key: string]: number; };"));
    assert!(types.contains("  \"content-type\"?: string;"));
    // Named while rendering Owner.
    assert!(types.contains("export interface Address {\n  street?: string;\n}"));
}

#[test]
fn nullable_keyword_follows_the_dialect() {
    let types = generate(parse::load_yaml(PETSTORE).unwrap(), &openapi_config());
    assert!(types.contains("  nickname?: string | null;"));

    let mut swagger = openapi_config();
    swagger.resolver.schema_type = SchemaType::Swagger2;
    let types = generate(parse::load_yaml(PETSTORE).unwrap(), &swagger);
    assert!(types.contains("  nickname?: string;"));

    // `nullable: true` is an OpenAPI keyword; plain JSON Schema ignores it.
    let types = generate(parse::load_yaml(PETSTORE).unwrap(), &JstrConfig::default());
    assert!(types.contains("  nickname?: string;"));
}

#[test]
fn type_less_one_of_renders_as_union() {
    let document = parse::load_json(SHAPES).unwrap();
    let types = generate(document, &JstrConfig::default());

    assert!(types.contains("/** Any shape we can draw. */\nexport type Shape = Circle | Square | Triangle;"));
    assert!(types.contains("export type MaybeShape = Circle | Square;"));
    assert!(types.contains("export interface Circle {\n  radius?: number;\n}"));
    assert!(types.contains("export type Color = \"red\" | \"green\" | \"blue\";"));
}

#[test]
fn export_keyword_is_optional() {
    let document = parse::load_json(SHAPES).unwrap();
    let mut config = JstrConfig::default();
    config.typescript.export_types = false;
    let types = generate(document, &config);

    assert!(types.contains("\ninterface Circle {"));
    assert!(!types.contains("export "));
}

#[test]
fn root_schema_is_named_after_its_title() {
    let document = parse::load_json(
        r##"{
            "title": "Settings",
            "type": "object",
            "properties": {
                "theme": { "$ref": "#/definitions/Theme" }
            },
            "definitions": {
                "Theme": { "type": "string", "enum": ["light", "dark"] }
            }
        }"##,
    )
    .unwrap();
    let types = generate(document, &JstrConfig::default());
    assert!(types.contains("export interface Settings {\n  theme?: Theme;\n}"));

    let document = parse::load_json(r#"{ "type": "object", "properties": { "id": { "type": "integer" } } }"#)
        .unwrap();
    let mut config = JstrConfig::default();
    config.typescript.root_type_name = "Document".to_string();
    let resolver = TypeScriptGenerator::resolve_document(document, &config).unwrap();
    assert_eq!(resolver.types().values().collect::<Vec<_>>(), vec!["Document"]);
}

#[test]
fn recursive_array_renders_as_alias() {
    let document = parse::load_json(
        r##"{
            "definitions": {
                "Holder": {
                    "type": "object",
                    "properties": { "tree": { "$ref": "#/definitions/Tree" } }
                },
                "Tree": { "type": "array", "items": { "$ref": "#/definitions/Tree" } }
            }
        }"##,
    )
    .unwrap();
    let types = generate(document, &JstrConfig::default());

    assert!(types.contains("export interface Holder {\n  tree?: Tree;\n}"));
    assert!(types.contains("\nexport type Tree = Tree[];\n"));
}

#[test]
fn recursive_dictionary_renders_as_alias() {
    let document = parse::load_json(
        r##"{
            "definitions": {
                "Holder": {
                    "type": "object",
                    "properties": { "children": { "$ref": "#/definitions/Nested" } }
                },
                "Nested": {
                    "type": "object",
                    "additionalProperties": { "$ref": "#/definitions/Nested" }
                }
            }
        }"##,
    )
    .unwrap();
    let types = generate(document, &JstrConfig::default());

    assert!(types.contains("export interface Holder {\n  children?: Nested;\n}"));
    assert!(types.contains("\nexport type Nested = { [key: string]: Nested; };\n"));
}

#[test]
fn generation_is_deterministic() {
    let first = generate(parse::load_yaml(PETSTORE).unwrap(), &openapi_config());
    let second = generate(parse::load_yaml(PETSTORE).unwrap(), &openapi_config());
    assert_eq!(first, second);
}
