//! Provider - Trait exposing the resource types of an infrastructure provider
//!
//! A Provider defines the resource types for a specific infrastructure
//! (Cloudflare, AWS, etc.) and the schema of each one. The host runtime
//! looks schemas up through this trait.

use crate::schema::ResourceSchema;

/// Definition of resource types that a Provider can handle
pub trait ResourceType: Send + Sync {
    /// Resource type name (e.g., "ipsec_tunnel")
    fn name(&self) -> &'static str;

    /// Attribute schema for this resource type
    fn schema(&self) -> ResourceSchema;
}

/// Main Provider trait
///
/// Each infrastructure provider implements this trait.
pub trait Provider: Send + Sync {
    /// Name of this Provider (e.g., "cloudflare")
    fn name(&self) -> &'static str;

    /// List of resource types this Provider can handle
    fn resource_types(&self) -> Vec<Box<dyn ResourceType>>;

    /// Schemas of every resource type this Provider can handle
    fn schemas(&self) -> Vec<ResourceSchema> {
        self.resource_types().iter().map(|t| t.schema()).collect()
    }

    /// Schema for a fully qualified resource type (e.g., "cloudflare.ipsec_tunnel")
    fn schema_for(&self, resource_type: &str) -> Option<ResourceSchema> {
        self.schemas()
            .into_iter()
            .find(|s| s.resource_type == resource_type)
    }
}

/// Provider implementation for Box<dyn Provider>
/// This enables dynamic dispatch for Providers
impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        (**self).resource_types()
    }
}
