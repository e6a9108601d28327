//! Resource groups: thin façades binding operation names to endpoints.
//!
//! # Design
//! A resource knows its base URL and, per operation, the HTTP verb and path.
//! Everything else is delegated to `RealforceClient::request` through the
//! provided `Resource::call`. Groups are also reachable by name through a
//! `ResourceRegistry`, so new groups can be plugged in with
//! `RealforceClient::register_resource` without touching the client.

mod labels;
mod properties;

pub use labels::PublicLabels;
pub use properties::PublicProperties;

use std::collections::HashMap;
use std::fmt;

use crate::client::{Payload, RealforceClient};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::request::QueryParams;

/// Verb and path of one operation. The path is appended verbatim to the
/// group's base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: &'static str,
}

impl Endpoint {
    pub const fn get(path: &'static str) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
        }
    }
}

/// A group of related API operations bound to a client.
pub trait Resource {
    /// Name the group is registered under, e.g. `"PublicLabels"`.
    fn name(&self) -> &'static str;

    fn base_url(&self) -> &'static str;

    fn endpoint(&self, operation: &str) -> Option<Endpoint>;

    fn client(&mut self) -> &mut RealforceClient;

    /// Full URL of `endpoint`: base URL and path concatenated as-is.
    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url(), endpoint.path)
    }

    /// Run `operation` with the given parameters. `timeout` falls back to the
    /// client's default.
    fn call(
        &mut self,
        operation: &str,
        query: &dyn QueryParams,
        timeout: Option<u64>,
    ) -> Result<Payload, ApiError> {
        let endpoint = self
            .endpoint(operation)
            .ok_or_else(|| ApiError::UndefinedMethod(operation.to_string()))?;
        let url = self.url(&endpoint);
        let params = query.to_params()?;

        let client = self.client();
        let timeout = timeout.unwrap_or(client.timeout());
        client.request(endpoint.method, &url, &params, timeout)
    }
}

/// Builds a resource group bound to a client.
pub type ResourceFactory = for<'a> fn(&'a mut RealforceClient) -> Box<dyn Resource + 'a>;

/// Resource groups by registered type name.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    factories: HashMap<String, ResourceFactory>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the public labels and properties groups.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("PublicLabels", public_labels);
        registry.register("PublicProperties", public_properties);
        registry
    }

    pub fn register(&mut self, type_name: &str, factory: ResourceFactory) {
        self.factories.insert(type_name.to_string(), factory);
    }

    /// Look up an accessor name such as `"publicLabels"`: the first letter
    /// is upper-cased and the result matched against registered type names.
    pub fn resolve(&self, name: &str) -> Option<ResourceFactory> {
        self.factories.get(&upper_first(name)).copied()
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resources", &self.names())
            .finish()
    }
}

fn public_labels(client: &mut RealforceClient) -> Box<dyn Resource + '_> {
    Box::new(PublicLabels::new(client))
}

fn public_properties(client: &mut RealforceClient) -> Box<dyn Resource + '_> {
    Box::new(PublicProperties::new(client))
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut upper = String::with_capacity(name.len());
            upper.push(first.to_ascii_uppercase());
            upper.push_str(chars.as_str());
            upper
        }
        None => String::new(),
    }
}
