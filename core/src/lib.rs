//! Typed blocking client for the Sam "Resources" access-control API.
//!
//! # Overview
//! Create and delete access-controlled resources, manage their named access
//! policies, and query the caller's roles and permitted actions.
//!
//! # Design
//! - Operations are declared as data in `operation`; one generic path
//!   (`RequestBuilder` → `Transport` → `response`) serves all of them.
//! - `ResourcesClient` is stateless and does no I/O: each operation is a
//!   `build_*` (produces `HttpRequest`) and `parse_*` (consumes
//!   `HttpResponse`) pair, so the I/O boundary is explicit.
//! - `ResourcesApi` composes the client with a `Transport` (ureq by default)
//!   and exposes one blocking method per operation.
//! - Models are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod operation;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

pub use api::ResourcesApi;
pub use client::ResourcesClient;
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use operation::Operation;
pub use request::RequestBuilder;
pub use transport::{Transport, UreqTransport};
pub use types::{
    AccessPolicyMembership, AccessPolicyResponseEntry, ErrorReport, ResourceAndAccessPolicy, ResourceRole,
    ResourceType, StackTraceElement,
};
