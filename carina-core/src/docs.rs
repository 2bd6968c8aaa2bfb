//! Docs - Render resource schemas as user-facing documentation
//!
//! Documentation lists attribute names, types and descriptions. It never
//! contains attribute values other than non-sensitive defaults.

use crate::schema::{AttributeSchema, ResourceSchema};

/// Render a list of allowed values for an attribute description
///
/// `["request", "reply"]` becomes "Available values: `request`, `reply`."
pub fn available_values(values: &[&str]) -> String {
    if values.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = values.iter().map(|v| format!("`{}`", v)).collect();
    format!("Available values: {}.", quoted.join(", "))
}

/// Render a markdown page for a resource schema
pub fn render_markdown(schema: &ResourceSchema) -> String {
    let mut content = format!("# {}\n\n", schema.resource_type);
    if let Some(description) = &schema.description {
        content.push_str(description);
        content.push_str("\n\n");
    }
    content.push_str("## Schema\n");

    render_section(&mut content, "Required", &schema.required_attributes());
    render_section(&mut content, "Optional", &schema.optional_attributes());
    render_section(&mut content, "Read-Only", &schema.computed_attributes());

    content
}

fn render_section(content: &mut String, title: &str, attrs: &[&AttributeSchema]) {
    if attrs.is_empty() {
        return;
    }
    content.push_str(&format!("\n### {}\n\n", title));
    for attr in attrs {
        content.push_str(&render_attribute(attr));
        content.push('\n');
    }
}

fn render_attribute(attr: &AttributeSchema) -> String {
    let mut flags = vec![attr.attr_type.type_name()];
    if attr.sensitive {
        flags.push("Sensitive".to_string());
    }
    if attr.force_new {
        flags.push("Forces new resource".to_string());
    }

    let mut line = format!("- `{}` ({})", attr.name, flags.join(", "));
    if let Some(desc) = attr.description.as_deref().filter(|d| !d.is_empty()) {
        line.push(' ');
        line.push_str(desc);
    }
    if let Some(default) = &attr.default
        && !attr.sensitive
    {
        line.push_str(&format!(" Defaults to `{}`.", default));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Value;
    use crate::schema::AttributeType;

    #[test]
    fn available_values_quotes_each_value() {
        assert_eq!(
            available_values(&["request", "reply"]),
            "Available values: `request`, `reply`."
        );
        assert_eq!(available_values(&["only"]), "Available values: `only`.");
    }

    #[test]
    fn available_values_empty() {
        assert_eq!(available_values(&[]), "");
    }

    #[test]
    fn markdown_groups_attributes_by_mode() {
        let schema = ResourceSchema::new("test.thing")
            .with_description("A test thing.")
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .with_description("Name."),
            )
            .attribute(
                AttributeSchema::new("flag", AttributeType::Bool)
                    .with_default(Value::Bool(false))
                    .with_description("A flag."),
            )
            .attribute(AttributeSchema::new("id", AttributeType::String).computed());

        let md = render_markdown(&schema);
        assert!(md.starts_with("# test.thing\n\nA test thing.\n\n## Schema\n"));
        assert!(md.contains("### Required\n\n- `name` (String) Name.\n"));
        assert!(md.contains("### Optional\n\n- `flag` (Bool) A flag. Defaults to `false`.\n"));
        assert!(md.contains("### Read-Only\n\n- `id` (String)\n"));
    }

    #[test]
    fn markdown_hides_sensitive_default() {
        let schema = ResourceSchema::new("test.secret").attribute(
            AttributeSchema::new("key", AttributeType::String)
                .sensitive()
                .with_default(Value::String("s3cr3t".to_string())),
        );
        let md = render_markdown(&schema);
        assert!(md.contains("- `key` (String, Sensitive)"));
        assert!(!md.contains("s3cr3t"));
    }
}
