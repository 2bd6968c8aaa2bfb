//! Schema - Define type schemas for resources
//!
//! Providers define schemas for each resource type. A schema describes
//! every attribute a resource accepts: its type, whether the user must
//! set it or the remote system fills it in, its default, and whether its
//! value is sensitive. The host runtime uses it to validate desired state
//! at plan time and to decide what it may print.

use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::resource::Value;

/// Placeholder printed instead of the value of a sensitive attribute
pub const SENSITIVE_PLACEHOLDER: &str = "(sensitive value)";

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// String restricted to a list of allowed values (case-sensitive)
    Enum(Vec<String>),
    /// Custom type (with validation function)
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
    },
    /// List
    List(Box<AttributeType>),
    /// Map
    Map(Box<AttributeType>),
}

impl AttributeType {
    /// Check if a value conforms to this type
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (self, value) {
            (AttributeType::String, Value::String(_)) => Ok(()),
            (AttributeType::Int, Value::Int(_)) => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),

            (AttributeType::Enum(variants), Value::String(s)) => {
                if variants.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(TypeError::InvalidEnumVariant {
                        value: s.clone(),
                        expected: variants.clone(),
                    })
                }
            }

            (AttributeType::Custom { base, validate, .. }, v) => {
                base.validate(v)?;
                validate(v).map_err(|msg| TypeError::ValidationFailed { message: msg })
            }

            (AttributeType::List(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Map(inner), Value::Map(map)) => {
                for (k, v) in map {
                    inner.validate(v).map_err(|e| TypeError::MapValueError {
                        key: k.clone(),
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.type_name().to_string(),
            }),
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Enum(variants) => format!("Enum({})", variants.join(" | ")),
            AttributeType::Custom { name, .. } => name.clone(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::Map(inner) => format!("Map<{}>", inner.type_name()),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error raised while validating attribute values
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Invalid enum variant '{value}', expected one of: {}", expected.join(", "))]
    InvalidEnumVariant {
        value: String,
        expected: Vec<String>,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Unknown attribute '{name}'")]
    UnknownAttribute { name: String },

    #[error("Attribute '{name}' is computed and cannot be set")]
    ComputedOnly { name: String },

    #[error("Attribute '{name}': {inner}")]
    AttributeError { name: String, inner: Box<TypeError> },

    #[error("Attribute '{name}' is sensitive and its value is not a valid {expected}")]
    InvalidSensitive { name: String, expected: String },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Map value for key '{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },
}

/// Error in the definition of a schema itself
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{resource_type}: attribute '{name}' is defined more than once")]
    DuplicateAttribute { resource_type: String, name: String },

    #[error("{resource_type}: required attribute '{name}' cannot have a default")]
    RequiredWithDefault { resource_type: String, name: String },

    #[error("{resource_type}: computed attribute '{name}' cannot have a default")]
    ComputedWithDefault { resource_type: String, name: String },

    #[error("{resource_type}: default of attribute '{name}' is invalid: {message}")]
    InvalidDefault {
        resource_type: String,
        name: String,
        message: String,
    },
}

/// Who is responsible for setting an attribute.
///
/// Required and computed are mutually exclusive, so there is no variant
/// for the combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeMode {
    /// Must be set by the user
    Required,
    /// May be set by the user
    #[default]
    Optional,
    /// Set by the remote system only
    Computed,
    /// May be set by the user, otherwise the remote system fills it in
    OptionalComputed,
}

impl fmt::Display for AttributeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttributeMode::Required => "required",
            AttributeMode::Optional => "optional",
            AttributeMode::Computed => "computed",
            AttributeMode::OptionalComputed => "optional, computed",
        };
        write!(f, "{}", s)
    }
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub mode: AttributeMode,
    pub default: Option<Value>,
    pub description: Option<String>,
    /// Value must never be shown in plaintext
    pub sensitive: bool,
    /// Changing the value replaces the remote object
    pub force_new: bool,
    /// Provider-side property name (e.g., "health_check.type")
    pub provider_name: Option<String>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            mode: AttributeMode::default(),
            default: None,
            description: None,
            sensitive: false,
            force_new: false,
            provider_name: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.mode = AttributeMode::Required;
        self
    }

    pub fn optional(mut self) -> Self {
        self.mode = AttributeMode::Optional;
        self
    }

    pub fn computed(mut self) -> Self {
        self.mode = AttributeMode::Computed;
        self
    }

    pub fn optional_computed(mut self) -> Self {
        self.mode = AttributeMode::OptionalComputed;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = Some(name.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.mode == AttributeMode::Required
    }

    /// True if the remote system may fill in the value
    pub fn is_computed(&self) -> bool {
        matches!(
            self.mode,
            AttributeMode::Computed | AttributeMode::OptionalComputed
        )
    }

    /// True if the user may set the value in desired state
    pub fn is_user_settable(&self) -> bool {
        self.mode != AttributeMode::Computed
    }

    /// Render a value of this attribute for user-facing output
    pub fn display_value(&self, value: &Value) -> String {
        if self.sensitive {
            SENSITIVE_PLACEHOLDER.to_string()
        } else {
            value.to_string()
        }
    }
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
    /// Names passed to `attribute` more than once
    duplicates: Vec<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
            duplicates: Vec::new(),
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        if self.attributes.contains_key(&schema.name) {
            self.duplicates.push(schema.name.clone());
        }
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Check the schema definition itself
    ///
    /// Field names must be unique, and required or computed attributes
    /// must not carry a default. Any default must conform to its type.
    pub fn check(&self) -> Result<(), Vec<SchemaError>> {
        let mut errors: Vec<SchemaError> = self
            .duplicates
            .iter()
            .map(|name| SchemaError::DuplicateAttribute {
                resource_type: self.resource_type.clone(),
                name: name.clone(),
            })
            .collect();

        for attr in sorted(&self.attributes) {
            let Some(default) = &attr.default else {
                continue;
            };
            if attr.is_required() {
                errors.push(SchemaError::RequiredWithDefault {
                    resource_type: self.resource_type.clone(),
                    name: attr.name.clone(),
                });
            }
            if attr.is_computed() {
                errors.push(SchemaError::ComputedWithDefault {
                    resource_type: self.resource_type.clone(),
                    name: attr.name.clone(),
                });
            }
            if let Err(e) = attr.attr_type.validate(default) {
                errors.push(SchemaError::InvalidDefault {
                    resource_type: self.resource_type.clone(),
                    name: attr.name.clone(),
                    message: e.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate resource attributes
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        debug!(
            "validating {} attribute(s) against {}",
            attributes.len(),
            self.resource_type
        );
        let mut errors = Vec::new();

        // Check required attributes
        for attr in sorted(&self.attributes) {
            if attr.is_required() && !attributes.contains_key(&attr.name) {
                errors.push(TypeError::MissingRequired {
                    name: attr.name.clone(),
                });
            }
        }

        // Type check each attribute
        let mut names: Vec<&String> = attributes.keys().collect();
        names.sort();
        for name in names {
            let value = &attributes[name];
            let Some(schema) = self.attributes.get(name) else {
                errors.push(TypeError::UnknownAttribute { name: name.clone() });
                continue;
            };
            if !schema.is_user_settable() {
                errors.push(TypeError::ComputedOnly { name: name.clone() });
                continue;
            }
            if let Err(e) = schema.attr_type.validate(value) {
                debug!("{}: attribute '{}' rejected", self.resource_type, name);
                if schema.sensitive {
                    errors.push(TypeError::InvalidSensitive {
                        name: name.clone(),
                        expected: schema.attr_type.type_name(),
                    });
                } else {
                    errors.push(TypeError::AttributeError {
                        name: name.clone(),
                        inner: Box::new(e),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Fill in the default of every unset attribute that has one
    pub fn apply_defaults(&self, attributes: &mut HashMap<String, Value>) {
        for attr in self.attributes.values() {
            if let Some(default) = &attr.default
                && !attributes.contains_key(&attr.name)
            {
                debug!("{}: using default for '{}'", self.resource_type, attr.name);
                attributes.insert(attr.name.clone(), default.clone());
            }
        }
    }

    /// Copy of the attributes with every sensitive value replaced by a placeholder
    pub fn redact(&self, attributes: &HashMap<String, Value>) -> HashMap<String, Value> {
        attributes
            .iter()
            .map(|(name, value)| {
                let value = match self.attributes.get(name) {
                    Some(attr) if attr.sensitive => {
                        Value::String(SENSITIVE_PLACEHOLDER.to_string())
                    }
                    _ => value.clone(),
                };
                (name.clone(), value)
            })
            .collect()
    }

    /// Render a single attribute value for user-facing output
    pub fn display_value(&self, name: &str, value: &Value) -> String {
        match self.attributes.get(name) {
            Some(attr) => attr.display_value(value),
            None => value.to_string(),
        }
    }

    /// Whether changing any of the given attributes replaces the remote object
    pub fn requires_replacement(&self, changed: &[String]) -> bool {
        changed
            .iter()
            .any(|name| self.attributes.get(name).is_some_and(|a| a.force_new))
    }

    pub fn required_attributes(&self) -> Vec<&AttributeSchema> {
        self.filtered(|a| a.is_required())
    }

    /// Attributes the user may set but need not, including optional computed ones
    pub fn optional_attributes(&self) -> Vec<&AttributeSchema> {
        self.filtered(|a| {
            matches!(
                a.mode,
                AttributeMode::Optional | AttributeMode::OptionalComputed
            )
        })
    }

    /// Attributes only the remote system sets
    pub fn computed_attributes(&self) -> Vec<&AttributeSchema> {
        self.filtered(|a| a.mode == AttributeMode::Computed)
    }

    pub fn sensitive_attributes(&self) -> Vec<&AttributeSchema> {
        self.filtered(|a| a.sensitive)
    }

    fn filtered(&self, pred: impl Fn(&AttributeSchema) -> bool) -> Vec<&AttributeSchema> {
        sorted(&self.attributes)
            .into_iter()
            .filter(|a| pred(a))
            .collect()
    }
}

fn sorted(attributes: &HashMap<String, AttributeSchema>) -> Vec<&AttributeSchema> {
    let mut attrs: Vec<&AttributeSchema> = attributes.values().collect();
    attrs.sort_by(|a, b| a.name.cmp(&b.name));
    attrs
}
