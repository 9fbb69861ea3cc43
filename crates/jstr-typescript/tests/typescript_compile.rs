use std::fs;
use std::process::Command;

use jstr_core::config::{JstrConfig, ResolverSettings, SchemaType};
use jstr_core::{CodeGenerator, parse};
use jstr_typescript::TypeScriptGenerator;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const SHAPES: &str = include_str!("fixtures/shapes.json");

fn compile(document: jstr_core::SchemaDocument, config: &JstrConfig) {
    let files = TypeScriptGenerator.generate(document, config).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    for file in &files {
        fs::write(dir.join(&file.path), &file.content).unwrap();
    }

    let tsconfig = r#"{
  "compilerOptions": {
    "strict": true,
    "target": "ES2020",
    "module": "ES2020",
    "moduleResolution": "bundler",
    "noEmit": true,
    "skipLibCheck": true
  },
  "include": ["*.ts"]
}"#;
    fs::write(dir.join("tsconfig.json"), tsconfig).unwrap();

    let output = Command::new("npx")
        .args(["tsc", "--noEmit"])
        .current_dir(dir)
        .output()
        .expect("failed to run tsc");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!("TypeScript compilation failed:\nstdout: {stdout}\nstderr: {stderr}");
    }
}

#[test]
#[ignore] // Requires Node.js + TypeScript installed
fn generated_petstore_types_compile() {
    let config = JstrConfig {
        resolver: ResolverSettings {
            schema_type: SchemaType::OpenApi3,
            ..ResolverSettings::default()
        },
        ..JstrConfig::default()
    };
    compile(parse::load_yaml(PETSTORE).unwrap(), &config);
}

#[test]
#[ignore] // Requires Node.js + TypeScript installed
fn generated_union_types_compile() {
    compile(parse::load_json(SHAPES).unwrap(), &JstrConfig::default());
}
