use indexmap::IndexMap;
use jstr_core::TypeResolver;
use jstr_core::model::{Discriminator, EnumValue, SchemaId};
use jstr_core::resolve::UnionTemplateModel;
use jstr_core::resolve::name_generator::is_valid_identifier;
use log::debug;
use minijinja::{Environment, context};

use crate::generator::TypeScriptError;
use crate::resolver::TypeScriptTypeResolver;

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
fn escape_jsdoc(value: String) -> String {
    value.replace("*/", "*\\/")
}

/// Emit `types.ts` with one declaration per named schema.
///
/// Rendering a declaration may name further schemas (inline objects, nested
/// enums), so the name cache is walked until it stops growing.
pub fn emit_types(resolver: &mut TypeScriptTypeResolver) -> Result<String, TypeScriptError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_filter("escape_jsdoc", escape_jsdoc);
    env.add_template("types.ts.j2", include_str!("../../templates/types.ts.j2"))?;
    let tmpl = env.get_template("types.ts.j2")?;

    let mut declarations = Vec::new();
    loop {
        let Some((schema, name)) = resolver
            .types()
            .get_index(declarations.len())
            .map(|(schema, name)| (*schema, name.clone()))
        else {
            break;
        };
        declarations.push(declaration_to_ctx(resolver, schema, &name)?);
    }
    debug!("rendering {} type declarations", declarations.len());

    let export = if resolver.options().export_types {
        "export "
    } else {
        ""
    };
    Ok(tmpl.render(context! {
        declarations => declarations,
        export => export,
    })?)
}

fn declaration_to_ctx(
    resolver: &mut TypeScriptTypeResolver,
    schema: SchemaId,
    name: &str,
) -> Result<minijinja::Value, TypeScriptError> {
    if let Some(base) = resolver.registry().wrapped_definition(schema) {
        return union_to_ctx(resolver, &UnionTemplateModel::new(name, base));
    }

    let graph = resolver.registry().graph();
    let node = graph.node(schema);
    if node
        .enumeration
        .iter()
        .any(|member| matches!(member, EnumValue::Schema(_)))
    {
        return union_to_ctx(resolver, &UnionTemplateModel::new(name, schema));
    }
    if graph.is_enumeration(schema) {
        let variants: Vec<String> = node
            .enumeration
            .iter()
            .filter_map(|member| match member {
                EnumValue::Literal(value) => Some(value.to_string()),
                EnumValue::Schema(_) => None,
            })
            .collect();
        return Ok(context! {
            kind => "enum",
            name => name,
            description => one_line(node.description.as_deref()),
            variants => variants,
        });
    }
    // Only recursive arrays and dictionaries end up named.
    if graph.is_array(schema) || graph.is_dictionary(schema) {
        let description = one_line(node.description.as_deref());
        let target = resolver.alias_target(schema)?;
        return Ok(context! {
            kind => "alias",
            name => name,
            description => description,
            target => target,
        });
    }
    if graph.is_any_type(schema) {
        return Ok(context! {
            kind => "alias",
            name => name,
            description => one_line(node.description.as_deref()),
            target => "any",
        });
    }

    interface_to_ctx(resolver, schema, name)
}

fn union_to_ctx(
    resolver: &mut TypeScriptTypeResolver,
    model: &UnionTemplateModel,
) -> Result<minijinja::Value, TypeScriptError> {
    let mut variants: Vec<String> = model
        .variants(resolver)?
        .into_iter()
        .map(|item| item.value)
        .collect();
    if variants.is_empty() {
        variants.push("never".to_string());
    }

    let graph = resolver.registry().graph();
    let description = if model.has_description(graph) {
        model.description(graph)
    } else {
        None
    };
    Ok(context! {
        kind => "union",
        name => model.name(),
        description => description,
        variants => variants,
    })
}

fn interface_to_ctx(
    resolver: &mut TypeScriptTypeResolver,
    schema: SchemaId,
    name: &str,
) -> Result<minijinja::Value, TypeScriptError> {
    let node = resolver.registry().graph().node(schema).clone();
    let dialect = resolver.registry().settings().schema_type;

    let mut extends = Vec::new();
    let mut properties: IndexMap<String, SchemaId> = IndexMap::new();
    let mut required = node.required.clone();
    for parent in &node.all_of {
        let graph = resolver.registry().graph();
        if graph.has_reference(*parent) {
            extends.push(resolver.get_or_generate_type_name(*parent, None)?);
        } else {
            let inline = graph.node(graph.actual_schema(*parent));
            properties.extend(inline.properties.clone());
            required.extend(inline.required.iter().cloned());
        }
    }
    properties.extend(node.properties.clone());

    let discriminator = node
        .discriminator
        .as_ref()
        .filter(|d| !d.mapping.is_empty());
    let mut fields = Vec::new();
    for (key, property) in &properties {
        let field_type = match discriminator.filter(|d| d.property_name == *key) {
            Some(d) => discriminator_literals(d),
            None => {
                let graph = resolver.registry().graph();
                let is_nullable = graph.is_nullable(graph.actual_schema(*property), dialect);
                resolver.resolve(*property, is_nullable, Some(key))?
            }
        };
        let description = resolver.registry().graph().node(*property).description.clone();
        fields.push(context! {
            name => property_name(key),
            optional => !required.contains(key),
            type => field_type,
            description => one_line(description.as_deref()),
        });
    }
    if let Some(d) = discriminator
        && !properties.contains_key(&d.property_name)
    {
        fields.push(context! {
            name => property_name(&d.property_name),
            optional => false,
            type => discriminator_literals(d),
        });
    }

    let index_signature = node
        .additional_properties_schema
        .map(|_| "[key: string]: any");

    Ok(context! {
        kind => "interface",
        name => name,
        description => one_line(node.description.as_deref()),
        extends => extends,
        fields => fields,
        index_signature => index_signature,
    })
}

/// The discriminator property typed as the union of its mapping keys.
fn discriminator_literals(discriminator: &Discriminator) -> String {
    discriminator
        .mapping
        .keys()
        .map(|value| serde_json::Value::String(value.clone()).to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn property_name(key: &str) -> String {
    if is_valid_identifier(key) {
        key.to_string()
    } else {
        serde_json::Value::String(key.to_string()).to_string()
    }
}

fn one_line(description: Option<&str>) -> Option<String> {
    let line = description?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!line.is_empty()).then_some(line)
}
