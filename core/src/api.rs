//! Blocking facade with one method per Resources API operation.
//!
//! # Design
//! Every method runs the same path through `dispatch`: build the request
//! (validation included), tag it with a request id, execute it on the
//! transport, then parse. A failed build returns before the transport is
//! touched. There is no retry; each call is one exchange.

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::client::ResourcesClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{AccessPolicyMembership, AccessPolicyResponseEntry, ResourceAndAccessPolicy, ResourceType};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Resources API client that performs I/O through a `Transport`.
///
/// Holds no per-call state. It is `Sync` whenever `T` is, so one instance
/// can be shared between threads.
#[derive(Clone)]
pub struct ResourcesApi<T = UreqTransport> {
    client: ResourcesClient,
    transport: T,
}

impl ResourcesApi<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(ResourcesClient::from_config(config), UreqTransport::from_config(config))
    }
}

impl<T: Transport> ResourcesApi<T> {
    pub fn new(client: ResourcesClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ResourcesClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn dispatch<R>(
        &self,
        request: Result<HttpRequest, ClientError>,
        parse: impl FnOnce(&ResourcesClient, HttpResponse) -> Result<R, ClientError>,
    ) -> Result<R, ClientError> {
        let mut request = request?;
        let request_id = Uuid::new_v4().to_string();
        debug!(method = %request.method, url = %request.url, %request_id, "sending request");
        request.headers.push((REQUEST_ID_HEADER.to_string(), request_id));
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received response");
        parse(&self.client, response)
    }

    #[instrument(skip(self))]
    pub fn create_resource(&self, resource_type_name: &str, resource_id: &str) -> Result<(), ClientError> {
        self.dispatch(
            self.client.build_create_resource(resource_type_name, resource_id),
            ResourcesClient::parse_create_resource,
        )
    }

    #[instrument(skip(self))]
    pub fn delete_resource(&self, resource_type_name: &str, resource_id: &str) -> Result<(), ClientError> {
        self.dispatch(
            self.client.build_delete_resource(resource_type_name, resource_id),
            ResourcesClient::parse_delete_resource,
        )
    }

    #[instrument(skip(self))]
    pub fn list_resource_policies(
        &self,
        resource_type_name: &str,
        resource_id: &str,
    ) -> Result<Vec<AccessPolicyResponseEntry>, ClientError> {
        self.dispatch(
            self.client.build_list_resource_policies(resource_type_name, resource_id),
            ResourcesClient::parse_list_resource_policies,
        )
    }

    #[instrument(skip(self))]
    pub fn list_resource_types(&self) -> Result<Vec<ResourceType>, ClientError> {
        self.dispatch(
            self.client.build_list_resource_types(),
            ResourcesClient::parse_list_resource_types,
        )
    }

    #[instrument(skip(self))]
    pub fn list_resources_and_policies(
        &self,
        resource_type_name: &str,
    ) -> Result<Vec<ResourceAndAccessPolicy>, ClientError> {
        self.dispatch(
            self.client.build_list_resources_and_policies(resource_type_name),
            ResourcesClient::parse_list_resources_and_policies,
        )
    }

    /// Replace the policy `policy_name` on a resource. Returns the role names
    /// the policy grants.
    #[instrument(skip(self, policy))]
    pub fn overwrite_policy(
        &self,
        resource_type_name: &str,
        resource_id: &str,
        policy_name: &str,
        policy: &AccessPolicyMembership,
    ) -> Result<Vec<String>, ClientError> {
        self.dispatch(
            self.client
                .build_overwrite_policy(resource_type_name, resource_id, policy_name, policy),
            ResourcesClient::parse_overwrite_policy,
        )
    }

    /// Whether the caller may perform `action` on the resource. A denied
    /// action is `Ok(false)`, not an error.
    #[instrument(skip(self))]
    pub fn resource_action(&self, resource_type_name: &str, resource_id: &str, action: &str) -> Result<bool, ClientError> {
        self.dispatch(
            self.client.build_resource_action(resource_type_name, resource_id, action),
            ResourcesClient::parse_resource_action,
        )
    }

    #[instrument(skip(self))]
    pub fn resource_roles(&self, resource_type_name: &str, resource_id: &str) -> Result<Vec<String>, ClientError> {
        self.dispatch(
            self.client.build_resource_roles(resource_type_name, resource_id),
            ResourcesClient::parse_resource_roles,
        )
    }
}
