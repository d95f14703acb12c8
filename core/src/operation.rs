//! Declarative descriptors for every Resources API operation.
//!
//! # Design
//! An operation is data: verb, path template and documented success status.
//! `RequestBuilder` expands the template and `response` decodes against the
//! descriptor, so adding an operation means adding a constant here plus a
//! thin `build_*`/`parse_*` pair in `client.rs`.

use crate::http::HttpMethod;

/// Description of one API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Operation id as published in the API document.
    pub id: &'static str,
    pub method: HttpMethod,
    /// Path relative to the base URL, with `{name}` placeholders.
    pub path: &'static str,
    /// Status the API documents for success. Any 2xx is accepted.
    pub success_status: u16,
}

impl Operation {
    /// Names of the placeholders in `path`, in order of appearance.
    ///
    /// An unclosed `{` ends the iteration; `RequestBuilder::build` reports it.
    pub fn path_params(&self) -> impl Iterator<Item = &'static str> {
        let path = self.path;
        path.split('{')
            .skip(1)
            .filter_map(|segment| segment.split_once('}').map(|(name, _)| name))
    }
}

pub const CREATE_RESOURCE: Operation = Operation {
    id: "createResource",
    method: HttpMethod::Post,
    path: "/api/resource/{resourceTypeName}/{resourceId}",
    success_status: 204,
};

pub const DELETE_RESOURCE: Operation = Operation {
    id: "deleteResource",
    method: HttpMethod::Delete,
    path: "/api/resource/{resourceTypeName}/{resourceId}",
    success_status: 204,
};

pub const LIST_RESOURCE_POLICIES: Operation = Operation {
    id: "listResourcePolicies",
    method: HttpMethod::Get,
    path: "/api/resource/{resourceTypeName}/{resourceId}/policies",
    success_status: 200,
};

pub const LIST_RESOURCE_TYPES: Operation = Operation {
    id: "listResourceTypes",
    method: HttpMethod::Get,
    path: "/api/resourceTypes",
    success_status: 200,
};

pub const LIST_RESOURCES_AND_POLICIES: Operation = Operation {
    id: "listResourcesAndPolicies",
    method: HttpMethod::Get,
    path: "/api/resource/{resourceTypeName}",
    success_status: 200,
};

pub const OVERWRITE_POLICY: Operation = Operation {
    id: "overwritePolicy",
    method: HttpMethod::Put,
    path: "/api/resource/{resourceTypeName}/{resourceId}/policies/{policyName}",
    success_status: 201,
};

pub const RESOURCE_ACTION: Operation = Operation {
    id: "resourceAction",
    method: HttpMethod::Get,
    path: "/api/resource/{resourceTypeName}/{resourceId}/action/{action}",
    success_status: 200,
};

pub const RESOURCE_ROLES: Operation = Operation {
    id: "resourceRoles",
    method: HttpMethod::Get,
    path: "/api/resource/{resourceTypeName}/{resourceId}/roles",
    success_status: 200,
};

pub const ALL: [&Operation; 8] = [
    &CREATE_RESOURCE,
    &DELETE_RESOURCE,
    &LIST_RESOURCE_POLICIES,
    &LIST_RESOURCE_TYPES,
    &LIST_RESOURCES_AND_POLICIES,
    &OVERWRITE_POLICY,
    &RESOURCE_ACTION,
    &RESOURCE_ROLES,
];

/// Look up an operation by its id.
pub fn by_id(id: &str) -> Option<&'static Operation> {
    ALL.into_iter().find(|op| op.id == id)
}
