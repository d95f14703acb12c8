//! Wire models for the Resources API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates. Every model is
//! an immutable value object. Membership, action and role collections are
//! sets, so two policies compare equal regardless of the order the server
//! lists their members in.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The members, actions and roles making up one named access policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicyMembership {
    #[serde(default)]
    pub member_emails: BTreeSet<String>,
    #[serde(default)]
    pub actions: BTreeSet<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl AccessPolicyMembership {
    pub fn new<M, A, R>(member_emails: M, actions: A, roles: R) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            member_emails: member_emails.into_iter().map(Into::into).collect(),
            actions: actions.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// A policy attached to a resource, as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicyResponseEntry {
    pub policy_name: String,
    pub policy: AccessPolicyMembership,
    /// Group email the server assigned to the policy.
    pub email: String,
}

/// A role defined by a resource type, with the actions it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRole {
    pub role_name: String,
    #[serde(default)]
    pub actions: BTreeSet<String>,
}

/// A server-defined category of resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    pub name: String,
    #[serde(default)]
    pub actions: BTreeSet<String>,
    #[serde(default)]
    pub roles: Vec<ResourceRole>,
    pub owner_role_name: String,
    #[serde(default)]
    pub reuse_ids: bool,
}

impl ResourceType {
    pub fn role(&self, role_name: &str) -> Option<&ResourceRole> {
        self.roles.iter().find(|r| r.role_name == role_name)
    }
}

/// A resource the caller can see, paired with one policy granting that access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAndAccessPolicy {
    pub resource_id: String,
    pub access_policy_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackTraceElement {
    pub class_name: String,
    pub method_name: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub line_number: i32,
}

/// Structured error payload returned by the server on failed calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    #[serde(default)]
    pub source: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_class: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<ErrorReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stack_trace: Vec<StackTraceElement>,
}
