use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use jstr_core::config::{self, CONFIG_FILE_NAME, JstrConfig};
use jstr_core::{CodeGenerator, GeneratedFile, SchemaDocument, TypeResolver, parse};
use jstr_typescript::TypeScriptGenerator;

#[derive(Parser)]
#[command(name = "jstr", about = "JSON Schema to TypeScript type generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript declarations from a schema
    Generate {
        /// Path to the schema file (JSON or YAML)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the type names assigned to a schema's definitions
    Resolve {
        /// Path to the schema file (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: ResolveFormat,
    },

    /// Initialize a new jstr configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum ResolveFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output } => cmd_generate(input, output),

        Commands::Resolve { input, format } => cmd_resolve(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "jstr", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<JstrConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let config = config::load_config(&config_path)
        .with_context(|| format!("failed to load {CONFIG_FILE_NAME}"))?;
    if config.is_some() {
        log::debug!("using {}", config_path.display());
    }
    Ok(config)
}

fn load_document(path: &Path) -> Result<SchemaDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let document = match ext {
        "yaml" | "yml" => parse::load_yaml(&content),
        _ => parse::load_json(&content),
    }
    .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(document)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_generate(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output_dir = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let document = load_document(&input)?;

    eprintln!("Generating {} → {}", input.display(), output_dir.display());
    let files = TypeScriptGenerator
        .generate(document, &cfg)
        .context("failed to generate TypeScript declarations")?;

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    write_files(&output_dir, &files)?;

    eprintln!("Generated {} files in {}", files.len(), output_dir.display());
    Ok(())
}

fn cmd_resolve(input: PathBuf, format: ResolveFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let document = load_document(&input)?;
    let resolver = TypeScriptGenerator::resolve_document(document, &cfg)
        .context("failed to resolve type names")?;

    let summary = build_resolve_summary(&resolver);

    match format {
        ResolveFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        ResolveFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_resolve_summary(resolver: &impl TypeResolver) -> serde_json::Value {
    let registry = resolver.registry();
    let types: Vec<serde_json::Value> = resolver
        .types()
        .iter()
        .map(|(schema, name)| {
            let wraps = registry
                .wrapped_definition(*schema)
                .map(|definition| definition.index());
            serde_json::json!({
                "name": name,
                "schema": schema.index(),
                "wraps": wraps,
            })
        })
        .collect();

    serde_json::json!({
        "schemas": registry.graph().len(),
        "types": types,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
