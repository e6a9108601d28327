//! Synchronous client for the Realforce public real-estate API.
//!
//! # Overview
//! Builds requests for the public read-only endpoints (property listings and
//! the amenities / categories / locations labels), sends them with the
//! `X-API-KEY` header and turns the response into a decoded payload or an
//! `ApiError`.
//!
//! ```rust,no_run
//! use realforce_core::{PropertiesListRequest, RealforceClient};
//!
//! let mut client = RealforceClient::new()?;
//! client.set_api_token("my-token");
//!
//! let mut query = PropertiesListRequest::new();
//! query.lang(["fr", "en"]).page(0).per_page(10)?;
//! let listings = client.public_properties().list(&query, None)?;
//! # Ok::<(), realforce_core::ApiError>(())
//! ```
//!
//! # Design
//! - `request` builders project to a flat, ordered parameter map.
//! - `resource` groups bind operation names to endpoints and delegate to the
//!   client.
//! - `RealforceClient::request` is the single choke point: headers, payload,
//!   decoding, status classification and last-exchange snapshots.
//! - The network sits behind the `Transport` trait (host-does-IO), with a
//!   blocking `ureq` implementation behind the default `ureq` feature.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod resource;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{Payload, RealforceClient, RequestSnapshot, ResponseSnapshot};
pub use config::ClientConfig;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, Params, RawResponse, TransportInfo};
pub use request::{I18nRequest, LocationsRequest, PropertiesListRequest, QueryParams};
pub use resource::{Endpoint, PublicLabels, PublicProperties, Resource, ResourceFactory, ResourceRegistry};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
