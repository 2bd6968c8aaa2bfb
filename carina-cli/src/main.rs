use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use serde::Deserialize;

use carina_core::docs;
use carina_core::provider::Provider;
use carina_core::resource::{Resource, Value};
use carina_core::schema::{AttributeSchema, ResourceSchema};
use carina_provider_cloudflare::CloudflareProvider;

#[derive(Parser)]
#[command(name = "carina")]
#[command(about = "A functional infrastructure management tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List resource types, or show the schema of one
    Schema {
        /// Resource type (e.g., cloudflare.ipsec_tunnel)
        resource: Option<String>,

        /// Print the schema as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print markdown documentation for a resource type
    Docs {
        /// Resource type (e.g., cloudflare.ipsec_tunnel)
        resource: String,
    },
    /// Validate a desired state file against the resource schemas
    Validate {
        /// Path to desired state JSON file
        #[arg(default_value = "main.json")]
        file: PathBuf,
    },
}

/// Desired state file layout
#[derive(Debug, Deserialize)]
struct DesiredState {
    resources: Vec<ResourceSpec>,
}

#[derive(Debug, Deserialize)]
struct ResourceSpec {
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default)]
    attributes: serde_json::Map<String, serde_json::Value>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Schema { resource, json } => run_schema(resource.as_deref(), json),
        Commands::Docs { resource } => run_docs(&resource),
        Commands::Validate { file } => run_validate(&file),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn providers() -> Vec<Box<dyn Provider>> {
    vec![Box::new(CloudflareProvider::new())]
}

/// Collect the schemas of every provider, rejecting malformed definitions
fn get_schemas() -> Result<HashMap<String, ResourceSchema>, String> {
    let mut all_schemas = HashMap::new();
    for provider in providers() {
        for schema in provider.schemas() {
            if let Err(errors) = schema.check() {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                return Err(messages.join("\n"));
            }
            debug!("loaded schema {}", schema.resource_type);
            all_schemas.insert(schema.resource_type.clone(), schema);
        }
    }
    Ok(all_schemas)
}

fn lookup_schema<'a>(
    schemas: &'a HashMap<String, ResourceSchema>,
    resource_type: &str,
) -> Result<&'a ResourceSchema, String> {
    schemas
        .get(resource_type)
        .ok_or_else(|| format!("Unknown resource type '{}'", resource_type))
}

fn run_schema(resource: Option<&str>, json: bool) -> Result<(), String> {
    let schemas = get_schemas()?;

    let Some(resource_type) = resource else {
        let mut names: Vec<&String> = schemas.keys().collect();
        names.sort();
        for name in names {
            println!("{}", name);
        }
        return Ok(());
    };

    let schema = lookup_schema(&schemas, resource_type)?;
    if json {
        let output = serde_json::to_string_pretty(&schema_to_json(schema))
            .map_err(|e| format!("Failed to serialize schema: {}", e))?;
        println!("{}", output);
    } else {
        print_schema(schema);
    }
    Ok(())
}

fn run_docs(resource_type: &str) -> Result<(), String> {
    let schemas = get_schemas()?;
    let schema = lookup_schema(&schemas, resource_type)?;
    print!("{}", docs::render_markdown(schema));
    Ok(())
}

fn run_validate(file: &Path) -> Result<(), String> {
    let schemas = get_schemas()?;
    let resources = load_resources(file)?;

    println!("{}", "Validating...".cyan());
    let validated = validate_resources(&schemas, resources)?;

    println!(
        "{}",
        format!("✓ {} resources validated successfully.", validated.len())
            .green()
            .bold()
    );
    for resource in &validated {
        println!("  • {}", resource.id);
        let schema = lookup_schema(&schemas, &resource.id.resource_type)?;
        for line in format_attributes(schema, &resource.attributes) {
            println!("      {}", line);
        }
    }
    Ok(())
}

/// Fill in defaults and validate each resource against its schema
fn validate_resources(
    schemas: &HashMap<String, ResourceSchema>,
    resources: Vec<Resource>,
) -> Result<Vec<Resource>, String> {
    let mut all_errors = Vec::new();
    let mut validated = Vec::new();

    for mut resource in resources {
        let schema = match lookup_schema(schemas, &resource.id.resource_type) {
            Ok(schema) => schema,
            Err(e) => {
                all_errors.push(format!("{}: {}", resource.id, e));
                continue;
            }
        };
        schema.apply_defaults(&mut resource.attributes);
        match schema.validate(&resource.attributes) {
            Ok(()) => {
                info!("{} is valid", resource.id);
                validated.push(resource);
            }
            Err(errors) => {
                for error in errors {
                    all_errors.push(format!("{}: {}", resource.id, error));
                }
            }
        }
    }

    if all_errors.is_empty() {
        Ok(validated)
    } else {
        Err(all_errors.join("\n"))
    }
}

fn load_resources(file: &Path) -> Result<Vec<Resource>, String> {
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    parse_resources(&content).map_err(|e| format!("{}: {}", file.display(), e))
}

fn parse_resources(content: &str) -> Result<Vec<Resource>, String> {
    let state: DesiredState =
        serde_json::from_str(content).map_err(|e| format!("Invalid JSON: {}", e))?;

    let mut resources = Vec::new();
    for spec in state.resources {
        let mut resource = Resource::new(spec.resource_type, spec.name);
        for (key, json) in spec.attributes {
            let value =
                json_to_value(&json).map_err(|e| format!("{}.{}: {}", resource.id, key, e))?;
            resource = resource.with_attribute(key, value);
        }
        resources.push(resource);
    }
    Ok(resources)
}

fn json_to_value(json: &serde_json::Value) -> Result<Value, String> {
    match json {
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .ok_or_else(|| "unsupported number (not a 64-bit integer)".to_string()),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Array(items) => items
            .iter()
            .map(json_to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(k, v)| json_to_value(v).map(|v| (k.clone(), v)))
            .collect::<Result<HashMap<_, _>, _>>()
            .map(Value::Map),
        serde_json::Value::Null => Err("null is not a valid value".to_string()),
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => {
            let obj: serde_json::Map<_, _> = map
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect();
            serde_json::Value::Object(obj)
        }
    }
}

fn schema_to_json(schema: &ResourceSchema) -> serde_json::Value {
    let mut names: Vec<&String> = schema.attributes.keys().collect();
    names.sort();

    let attributes: serde_json::Map<String, serde_json::Value> = names
        .into_iter()
        .map(|name| {
            let attr = &schema.attributes[name];
            (name.clone(), attribute_to_json(attr))
        })
        .collect();

    serde_json::json!({
        "resource_type": schema.resource_type,
        "description": schema.description,
        "attributes": attributes,
    })
}

fn attribute_to_json(attr: &AttributeSchema) -> serde_json::Value {
    let mut obj = serde_json::json!({
        "type": attr.attr_type.type_name(),
        "required": attr.is_required(),
        "optional": attr.is_user_settable() && !attr.is_required(),
        "computed": attr.is_computed(),
        "sensitive": attr.sensitive,
        "force_new": attr.force_new,
        "description": attr.description,
        "provider_name": attr.provider_name,
    });
    if let Some(default) = &attr.default
        && !attr.sensitive
        && let Some(map) = obj.as_object_mut()
    {
        map.insert("default".to_string(), value_to_json(default));
    }
    obj
}

fn print_schema(schema: &ResourceSchema) {
    println!("{}", schema.resource_type.cyan().bold());
    if let Some(description) = &schema.description {
        println!("{}", description);
    }
    println!();

    let mut attrs: Vec<&AttributeSchema> = schema.attributes.values().collect();
    attrs.sort_by(|a, b| a.name.cmp(&b.name));
    for attr in attrs {
        let mut flags = vec![attr.mode.to_string()];
        if attr.sensitive {
            flags.push("sensitive".to_string());
        }
        if attr.force_new {
            flags.push("force new".to_string());
        }
        let name = if attr.is_required() {
            attr.name.bold().to_string()
        } else {
            attr.name.clone()
        };
        println!(
            "  {}: {} ({})",
            name,
            attr.attr_type.to_string().yellow(),
            flags.join(", ")
        );
        if let Some(default) = &attr.default {
            println!("      default: {}", attr.display_value(default));
        }
    }
}

/// Render attributes as `key = value` lines, sorted, with sensitive values hidden
fn format_attributes(schema: &ResourceSchema, attributes: &HashMap<String, Value>) -> Vec<String> {
    let mut keys: Vec<&String> = attributes.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| format!("{} = {}", key, schema.display_value(key, &attributes[key])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use carina_core::schema::SENSITIVE_PLACEHOLDER;
    use std::io::Write;

    const TUNNEL: &str = r#"{
        "resources": [
            {
                "type": "cloudflare.ipsec_tunnel",
                "name": "office",
                "attributes": {
                    "name": "office",
                    "customer_endpoint": "203.0.113.1",
                    "cloudflare_endpoint": "162.159.64.1",
                    "interface_address": "10.212.0.9/31",
                    "health_check_type": "request",
                    "psk": "correct-horse-battery-staple"
                }
            }
        ]
    }"#;

    #[test]
    fn schemas_are_loaded_and_checked() {
        let schemas = get_schemas().unwrap();
        assert!(schemas.contains_key("cloudflare.ipsec_tunnel"));
    }

    #[test]
    fn parse_and_validate_tunnel() {
        let schemas = get_schemas().unwrap();
        let resources = parse_resources(TUNNEL).unwrap();
        let validated = validate_resources(&schemas, resources).unwrap();
        assert_eq!(validated.len(), 1);
        assert_eq!(
            validated[0].attributes.get("allow_null_cipher"),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn formatted_attributes_hide_psk() {
        let schemas = get_schemas().unwrap();
        let resources = parse_resources(TUNNEL).unwrap();
        let schema = &schemas["cloudflare.ipsec_tunnel"];
        let lines = format_attributes(schema, &resources[0].attributes);
        assert!(lines.contains(&format!("psk = {}", SENSITIVE_PLACEHOLDER)));
        assert!(lines.contains(&"health_check_type = \"request\"".to_string()));
        assert!(lines.iter().all(|l| !l.contains("correct-horse")));
    }

    #[test]
    fn invalid_health_check_type_is_reported_with_resource() {
        let schemas = get_schemas().unwrap();
        let content = TUNNEL.replace("\"request\"", "\"ping\"");
        let resources = parse_resources(&content).unwrap();
        let err = validate_resources(&schemas, resources).unwrap_err();
        assert!(err.starts_with("cloudflare.ipsec_tunnel.office: Attribute 'health_check_type'"));
        assert!(err.contains("expected one of: request, reply"));
    }

    #[test]
    fn unknown_resource_type_is_an_error() {
        let schemas = get_schemas().unwrap();
        let resources = vec![Resource::new("cloudflare.gre_tunnel", "x")];
        let err = validate_resources(&schemas, resources).unwrap_err();
        assert!(err.contains("Unknown resource type 'cloudflare.gre_tunnel'"));
    }

    #[test]
    fn json_values_convert() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": [1, true, "x"]}"#).unwrap();
        let value = json_to_value(&json).unwrap();
        assert_eq!(
            value,
            Value::Map(HashMap::from([(
                "a".to_string(),
                Value::List(vec![
                    Value::Int(1),
                    Value::Bool(true),
                    Value::String("x".to_string())
                ])
            )]))
        );
        assert_eq!(value_to_json(&value), json);
    }

    #[test]
    fn null_and_float_are_rejected() {
        assert!(json_to_value(&serde_json::Value::Null).is_err());
        let float: serde_json::Value = serde_json::from_str("1.5").unwrap();
        assert!(json_to_value(&float).is_err());

        let content = r#"{"resources":[{"type":"t","name":"n","attributes":{"k":null}}]}"#;
        let err = parse_resources(content).unwrap_err();
        assert!(err.starts_with("t.n.k:"));
    }

    #[test]
    fn unsupported_number_error_hides_value() {
        for psk in ["31415.92653", "1234567890123456789012345"] {
            let content = TUNNEL.replace("\"correct-horse-battery-staple\"", psk);
            let err = parse_resources(&content).unwrap_err();
            assert!(err.starts_with("cloudflare.ipsec_tunnel.office.psk:"), "{}", err);
            assert!(!err.contains(psk), "{}", err);
            assert!(!err.contains("31415"), "{}", err);
            assert!(!err.contains("123456789"), "{}", err);
        }
    }

    #[test]
    fn schema_json_omits_sensitive_values() {
        let schemas = get_schemas().unwrap();
        let json = schema_to_json(&schemas["cloudflare.ipsec_tunnel"]);
        let attrs = &json["attributes"];
        assert_eq!(attrs["psk"]["sensitive"], serde_json::Value::Bool(true));
        assert_eq!(attrs["psk"]["computed"], serde_json::Value::Bool(true));
        assert_eq!(attrs["psk"]["optional"], serde_json::Value::Bool(true));
        assert!(attrs["psk"].get("default").is_none());
        assert_eq!(attrs["allow_null_cipher"]["default"], serde_json::Value::Bool(false));
        assert_eq!(attrs["name"]["required"], serde_json::Value::Bool(true));
        assert_eq!(attrs["name"]["optional"], serde_json::Value::Bool(false));
    }

    #[test]
    fn load_resources_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TUNNEL.as_bytes()).unwrap();
        let resources = load_resources(file.path()).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id.name, "office");
    }

    #[test]
    fn load_resources_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_resources(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }
}
