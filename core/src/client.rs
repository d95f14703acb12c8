//! Stateless request builder and response parser for the Resources API.
//!
//! # Design
//! `ResourcesClient` holds only a base URL and the headers every request
//! carries. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Both delegate to the operation table, `RequestBuilder` and the response
//! decoder, so the per-operation code is only parameter binding. The caller
//! (or `ResourcesApi`) executes the round-trip in between.
//!
//! Required identifiers are checked in `build_*`, so an empty identifier
//! fails with `InvalidArgument` before a request exists.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};
use crate::operation::{self, Operation};
use crate::request::RequestBuilder;
use crate::response::{decode_empty, decode_json};
use crate::types::{AccessPolicyMembership, AccessPolicyResponseEntry, ResourceAndAccessPolicy, ResourceType};

/// Synchronous, stateless client for the Resources API.
#[derive(Debug, Clone)]
pub struct ResourcesClient {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl ResourcesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Self::new(&config.base_url).with_header("user-agent", &config.user_agent);
        match config.access_token.as_deref() {
            Some(token) => client.with_access_token(token),
            None => client,
        }
    }

    pub fn with_access_token(self, token: &str) -> Self {
        self.with_header("authorization", &format!("Bearer {token}"))
    }

    /// Add a header to every request, replacing an existing one of the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        self.headers.retain(|(n, _)| *n != name);
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request<'a>(&'a self, operation: &'a Operation) -> RequestBuilder<'a> {
        RequestBuilder::new(&self.base_url, operation).headers(&self.headers)
    }

    /// Builder for an operation addressing one resource.
    fn resource_request<'a>(
        &'a self,
        operation: &'a Operation,
        resource_type_name: &'a str,
        resource_id: &'a str,
    ) -> Result<RequestBuilder<'a>, ClientError> {
        require("resourceTypeName", resource_type_name)?;
        require("resourceId", resource_id)?;
        Ok(self
            .request(operation)
            .path_param("resourceTypeName", resource_type_name)
            .path_param("resourceId", resource_id))
    }

    pub fn build_create_resource(&self, resource_type_name: &str, resource_id: &str) -> Result<HttpRequest, ClientError> {
        self.resource_request(&operation::CREATE_RESOURCE, resource_type_name, resource_id)?
            .build()
    }

    pub fn build_delete_resource(&self, resource_type_name: &str, resource_id: &str) -> Result<HttpRequest, ClientError> {
        self.resource_request(&operation::DELETE_RESOURCE, resource_type_name, resource_id)?
            .build()
    }

    pub fn build_list_resource_policies(
        &self,
        resource_type_name: &str,
        resource_id: &str,
    ) -> Result<HttpRequest, ClientError> {
        self.resource_request(&operation::LIST_RESOURCE_POLICIES, resource_type_name, resource_id)?
            .build()
    }

    pub fn build_list_resource_types(&self) -> Result<HttpRequest, ClientError> {
        self.request(&operation::LIST_RESOURCE_TYPES).build()
    }

    pub fn build_list_resources_and_policies(&self, resource_type_name: &str) -> Result<HttpRequest, ClientError> {
        require("resourceTypeName", resource_type_name)?;
        self.request(&operation::LIST_RESOURCES_AND_POLICIES)
            .path_param("resourceTypeName", resource_type_name)
            .build()
    }

    pub fn build_overwrite_policy(
        &self,
        resource_type_name: &str,
        resource_id: &str,
        policy_name: &str,
        policy: &AccessPolicyMembership,
    ) -> Result<HttpRequest, ClientError> {
        let builder = self.resource_request(&operation::OVERWRITE_POLICY, resource_type_name, resource_id)?;
        require("policyName", policy_name)?;
        builder.path_param("policyName", policy_name).json_body(policy)?.build()
    }

    pub fn build_resource_action(
        &self,
        resource_type_name: &str,
        resource_id: &str,
        action: &str,
    ) -> Result<HttpRequest, ClientError> {
        let builder = self.resource_request(&operation::RESOURCE_ACTION, resource_type_name, resource_id)?;
        require("action", action)?;
        builder.path_param("action", action).build()
    }

    pub fn build_resource_roles(&self, resource_type_name: &str, resource_id: &str) -> Result<HttpRequest, ClientError> {
        self.resource_request(&operation::RESOURCE_ROLES, resource_type_name, resource_id)?
            .build()
    }

    pub fn parse_create_resource(&self, response: HttpResponse) -> Result<(), ClientError> {
        decode_empty(&operation::CREATE_RESOURCE, response)
    }

    pub fn parse_delete_resource(&self, response: HttpResponse) -> Result<(), ClientError> {
        decode_empty(&operation::DELETE_RESOURCE, response)
    }

    pub fn parse_list_resource_policies(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<AccessPolicyResponseEntry>, ClientError> {
        decode_json(&operation::LIST_RESOURCE_POLICIES, response)
    }

    pub fn parse_list_resource_types(&self, response: HttpResponse) -> Result<Vec<ResourceType>, ClientError> {
        decode_json(&operation::LIST_RESOURCE_TYPES, response)
    }

    pub fn parse_list_resources_and_policies(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<ResourceAndAccessPolicy>, ClientError> {
        decode_json(&operation::LIST_RESOURCES_AND_POLICIES, response)
    }

    /// Role names the overwritten policy grants.
    pub fn parse_overwrite_policy(&self, response: HttpResponse) -> Result<Vec<String>, ClientError> {
        decode_json(&operation::OVERWRITE_POLICY, response)
    }

    pub fn parse_resource_action(&self, response: HttpResponse) -> Result<bool, ClientError> {
        decode_json(&operation::RESOURCE_ACTION, response)
    }

    pub fn parse_resource_roles(&self, response: HttpResponse) -> Result<Vec<String>, ClientError> {
        decode_json(&operation::RESOURCE_ROLES, response)
    }
}

fn require(name: &'static str, value: &str) -> Result<(), ClientError> {
    if value.is_empty() {
        return Err(ClientError::InvalidArgument { name });
    }
    Ok(())
}
