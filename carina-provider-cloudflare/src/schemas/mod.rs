//! Cloudflare resource schema definitions

pub mod ipsec_tunnel;

use carina_core::schema::ResourceSchema;

/// Returns all Cloudflare schemas
pub fn all_schemas() -> Vec<ResourceSchema> {
    vec![ipsec_tunnel::ipsec_tunnel_schema()]
}
