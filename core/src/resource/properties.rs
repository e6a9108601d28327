use super::{Endpoint, Resource};
use crate::client::{Payload, RealforceClient};
use crate::error::ApiError;
use crate::request::PropertiesListRequest;

/// Published properties' public data.
#[derive(Debug)]
pub struct PublicProperties<'a> {
    client: &'a mut RealforceClient,
}

impl<'a> PublicProperties<'a> {
    pub const BASE_URL: &'static str = "https://listings.realforce.ch/api/v1/";

    pub fn new(client: &'a mut RealforceClient) -> Self {
        Self { client }
    }

    /// One page of published properties.
    pub fn list(&mut self, request: &PropertiesListRequest, timeout: Option<u64>) -> Result<Payload, ApiError> {
        self.call("list", request, timeout)
    }
}

impl Resource for PublicProperties<'_> {
    fn name(&self) -> &'static str {
        "PublicProperties"
    }

    fn base_url(&self) -> &'static str {
        Self::BASE_URL
    }

    fn endpoint(&self, operation: &str) -> Option<Endpoint> {
        match operation {
            "list" => Some(Endpoint::get("/get-full-listings")),
            _ => None,
        }
    }

    fn client(&mut self) -> &mut RealforceClient {
        self.client
    }
}
