//! Resource type definitions for the Cloudflare provider

use carina_core::provider::ResourceType;
use carina_core::schema::ResourceSchema;

use crate::schemas::ipsec_tunnel;

macro_rules! define_resource_type {
    ($name:ident, $type_name:expr, $schema:path) => {
        pub struct $name;
        impl ResourceType for $name {
            fn name(&self) -> &'static str {
                $type_name
            }
            fn schema(&self) -> ResourceSchema {
                $schema()
            }
        }
    };
}

define_resource_type!(
    IpsecTunnelType,
    "ipsec_tunnel",
    ipsec_tunnel::ipsec_tunnel_schema
);

/// Returns all resource types supported by this provider
pub fn resource_types() -> Vec<Box<dyn ResourceType>> {
    vec![Box::new(IpsecTunnelType)]
}
