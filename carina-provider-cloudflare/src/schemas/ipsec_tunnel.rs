//! IPsec tunnel schema definition (Cloudflare Magic WAN)

use carina_core::docs::available_values;
use carina_core::resource::Value;
use carina_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

pub const RESOURCE_TYPE: &str = "cloudflare.ipsec_tunnel";

const HEALTH_CHECK_TYPES: &[&str] = &["request", "reply"];

fn health_check_type() -> AttributeType {
    AttributeType::Enum(HEALTH_CHECK_TYPES.iter().map(|s| s.to_string()).collect())
}

/// Returns the schema for IPsec tunnels
pub fn ipsec_tunnel_schema() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("Provides a resource to manage IPsec tunnels for Magic Transit.")
        .attribute(
            AttributeSchema::new("account_id", AttributeType::String)
                .force_new()
                .with_description("The account identifier to target for the resource."),
        )
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .required()
                .with_description("Name of the IPsec tunnel.")
                .with_provider_name("name"),
        )
        .attribute(
            AttributeSchema::new("customer_endpoint", AttributeType::String)
                .required()
                .with_description("IP address assigned to the customer side of the IPsec tunnel.")
                .with_provider_name("customer_endpoint"),
        )
        .attribute(
            AttributeSchema::new("cloudflare_endpoint", AttributeType::String)
                .required()
                .with_description(
                    "IP address assigned to the Cloudflare side of the IPsec tunnel.",
                )
                .with_provider_name("cloudflare_endpoint"),
        )
        .attribute(
            AttributeSchema::new("interface_address", AttributeType::String)
                .required()
                .with_description("31-bit prefix (/31 in CIDR notation) supporting 2 hosts, one for each side of the tunnel.")
                .with_provider_name("interface_address"),
        )
        .attribute(
            AttributeSchema::new("description", AttributeType::String)
                .with_description("An optional description of the IPsec tunnel.")
                .with_provider_name("description"),
        )
        .attribute(
            AttributeSchema::new("health_check_enabled", AttributeType::Bool)
                .optional_computed()
                .with_description(
                    "Specifies if ICMP tunnel health checks are enabled. Default: `true`.",
                )
                .with_provider_name("health_check.enabled"),
        )
        .attribute(
            AttributeSchema::new("health_check_target", AttributeType::String)
                .optional_computed()
                .with_description("The IP address of the customer endpoint that will receive tunnel health checks. Default: `<customer_gre_endpoint>`.")
                .with_provider_name("health_check.target"),
        )
        .attribute(
            AttributeSchema::new("health_check_type", health_check_type())
                .optional_computed()
                .with_description(format!(
                    "Specifies the ICMP echo type for the health check (`request` or `reply`). {} Default: `reply`.",
                    available_values(HEALTH_CHECK_TYPES)
                ))
                .with_provider_name("health_check.type"),
        )
        .attribute(
            AttributeSchema::new("psk", AttributeType::String)
                .optional_computed()
                .sensitive()
                .with_description("Pre shared key to be used with the IPsec tunnel. If left unset, it will be autogenerated.")
                .with_provider_name("psk"),
        )
        .attribute(
            AttributeSchema::new("allow_null_cipher", AttributeType::Bool)
                .with_default(Value::Bool(false))
                .with_description(
                    "Specifies if this tunnel may use a null cipher (ENCR_NULL) in Phase 2.",
                )
                .with_provider_name("allow_null_cipher"),
        )
        .attribute(
            AttributeSchema::new("hex_id", AttributeType::String)
                .optional_computed()
                .with_description(
                    "`remote_id` as a hex string. This value is generated by cloudflare.",
                )
                .with_provider_name("remote_identities.hex_id"),
        )
        .attribute(
            AttributeSchema::new("user_id", AttributeType::String)
                .optional_computed()
                .with_description("`remote_id` in the form of an email address. This value is generated by cloudflare.")
                .with_provider_name("remote_identities.user_id"),
        )
        .attribute(
            AttributeSchema::new("fqdn_id", AttributeType::String)
                .optional_computed()
                .with_description(
                    "`remote_id` in the form of a fqdn. This value is generated by cloudflare.",
                )
                .with_provider_name("remote_identities.fqdn_id"),
        )
        .attribute(
            AttributeSchema::new("remote_id", AttributeType::String)
                .optional_computed()
                .with_description("ID to be used while setting up the IPsec tunnel. This value is generated by cloudflare.")
                .with_provider_name("remote_id"),
        )
}
