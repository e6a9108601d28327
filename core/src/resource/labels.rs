use super::{Endpoint, Resource};
use crate::client::{Payload, RealforceClient};
use crate::error::ApiError;
use crate::request::{I18nRequest, LocationsRequest};

/// Labels for the amenities, categories and locations referenced by the
/// public listings data.
#[derive(Debug)]
pub struct PublicLabels<'a> {
    client: &'a mut RealforceClient,
}

impl<'a> PublicLabels<'a> {
    pub const BASE_URL: &'static str = "https://labels.realforce.ch/api/v1/";

    pub fn new(client: &'a mut RealforceClient) -> Self {
        Self { client }
    }

    /// Amenities labels.
    pub fn amenities(&mut self, request: &I18nRequest, timeout: Option<u64>) -> Result<Payload, ApiError> {
        self.call("amenities", request, timeout)
    }

    /// Amenities categories labels.
    pub fn amenities_categories(
        &mut self,
        request: &I18nRequest,
        timeout: Option<u64>,
    ) -> Result<Payload, ApiError> {
        self.call("amenities_categories", request, timeout)
    }

    /// Amenities groups labels.
    pub fn amenities_groups(&mut self, request: &I18nRequest, timeout: Option<u64>) -> Result<Payload, ApiError> {
        self.call("amenities_groups", request, timeout)
    }

    /// Property categories labels.
    pub fn categories(&mut self, request: &I18nRequest, timeout: Option<u64>) -> Result<Payload, ApiError> {
        self.call("categories", request, timeout)
    }

    /// Countries, cantons, districts, zones, quarters and cities.
    pub fn locations(&mut self, request: &LocationsRequest, timeout: Option<u64>) -> Result<Payload, ApiError> {
        self.call("locations", request, timeout)
    }
}

impl Resource for PublicLabels<'_> {
    fn name(&self) -> &'static str {
        "PublicLabels"
    }

    fn base_url(&self) -> &'static str {
        Self::BASE_URL
    }

    fn endpoint(&self, operation: &str) -> Option<Endpoint> {
        let path = match operation {
            "amenities" => "/get-amenities-labels",
            "amenities_categories" => "/get-amenities-categories-labels",
            "amenities_groups" => "/get-amenities-groups-labels",
            "categories" => "/get-categories-labels",
            "locations" => "/get-locations",
            _ => return None,
        };
        Some(Endpoint::get(path))
    }

    fn client(&mut self) -> &mut RealforceClient {
        self.client
    }
}
