//! Carina Cloudflare Provider
//!
//! Resource types and schemas for Cloudflare.
//!
//! ## Module Structure
//!
//! - `resources` - Resource type definitions
//! - `schemas` - Resource schemas

pub mod resources;
pub mod schemas;

use carina_core::provider::{Provider, ResourceType};

/// Cloudflare provider
#[derive(Debug, Default)]
pub struct CloudflareProvider;

impl CloudflareProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Provider for CloudflareProvider {
    fn name(&self) -> &'static str {
        "cloudflare"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        resources::resource_types()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_ipsec_tunnel() {
        let provider = CloudflareProvider::new();
        let types: Vec<&str> = provider
            .resource_types()
            .iter()
            .map(|t| t.name())
            .collect();
        assert_eq!(types, vec!["ipsec_tunnel"]);
        assert!(provider.schema_for("cloudflare.ipsec_tunnel").is_some());
    }

    #[test]
    fn resource_type_names_match_schema_names() {
        let provider = CloudflareProvider::new();
        for resource_type in provider.resource_types() {
            let schema = resource_type.schema();
            assert_eq!(
                schema.resource_type,
                format!("{}.{}", provider.name(), resource_type.name())
            );
        }
    }

    #[test]
    fn provider_schemas_match_schema_module() {
        let provider = CloudflareProvider::new();
        let from_provider: Vec<String> =
            provider.schemas().into_iter().map(|s| s.resource_type).collect();
        let from_module: Vec<String> = schemas::all_schemas()
            .into_iter()
            .map(|s| s.resource_type)
            .collect();
        assert_eq!(from_provider, from_module);
        for schema in schemas::all_schemas() {
            assert!(schema.check().is_ok(), "{}", schema.resource_type);
        }
    }
}
