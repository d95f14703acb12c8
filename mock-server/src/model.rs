//! Wire types served by the mock. Defined independently of the client crate.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicyMembership {
    #[serde(default)]
    pub member_emails: BTreeSet<String>,
    #[serde(default)]
    pub actions: BTreeSet<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicyResponseEntry {
    pub policy_name: String,
    pub policy: AccessPolicyMembership,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRole {
    pub role_name: String,
    pub actions: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    pub name: String,
    pub actions: BTreeSet<String>,
    pub roles: Vec<ResourceRole>,
    pub owner_role_name: String,
    #[serde(default)]
    pub reuse_ids: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAndAccessPolicy {
    pub resource_id: String,
    pub access_policy_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub source: String,
    pub message: String,
    pub status_code: Option<u16>,
    #[serde(default)]
    pub causes: Vec<ErrorReport>,
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Catalog served by `app()`: one `workspace` type with three roles.
pub fn default_catalog() -> Vec<ResourceType> {
    vec![ResourceType {
        name: "workspace".to_string(),
        actions: set(&["read", "write", "delete", "read_policies", "alter_policies"]),
        roles: vec![
            ResourceRole {
                role_name: "owner".to_string(),
                actions: set(&["read", "write", "delete", "read_policies", "alter_policies"]),
            },
            ResourceRole {
                role_name: "writer".to_string(),
                actions: set(&["read", "write"]),
            },
            ResourceRole {
                role_name: "reader".to_string(),
                actions: set(&["read"]),
            },
        ],
        owner_role_name: "owner".to_string(),
        reuse_ids: false,
    }]
}
