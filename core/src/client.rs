//! The transport core: every Realforce API exchange goes through
//! `RealforceClient::request`.
//!
//! # Design
//! The client owns the credentials, the connection defaults and a snapshot
//! of the last exchange (request, response, status, error, success flag).
//! Each call to `request` resets that state before doing anything else, so
//! nothing leaks from one call to the next. All mutation goes through
//! `&mut self`; share a client across threads behind a `Mutex`.
//!
//! The network itself sits behind the `Transport` trait. The client builds
//! an `HttpRequest`, the transport returns a `RawResponse`, and the client
//! splits, decodes and classifies it.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{build_query, parse_headers, HttpMethod, HttpRequest, Params, RawResponse, TransportInfo};
use crate::resource::{PublicLabels, PublicProperties, Resource, ResourceFactory, ResourceRegistry};
use crate::transport::Transport;

/// Decoded outcome of a successful `request`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The body decoded to a JSON object or array.
    Data(Value),
    /// The body decoded to a truthy scalar; carries the success flag.
    Success(bool),
    /// The body was empty or decoded to a falsy JSON value (`null`, `false`,
    /// `0`, `""`, `"0"`, `[]`, `{}`). No status classification happened.
    Falsy,
}

impl Payload {
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Payload::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<Value> {
        match self {
            Payload::Data(value) => Some(value),
            _ => None,
        }
    }

    /// `false` only for `Falsy` and `Success(false)`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Payload::Data(_) => true,
            Payload::Success(flag) => *flag,
            Payload::Falsy => false,
        }
    }
}

/// Anatomy of the last request: URL components, method, body, timeout and
/// the outgoing header block when the transport reported one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestSnapshot {
    pub method: Option<HttpMethod>,
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub query: Option<String>,
    pub body: String,
    pub timeout: u64,
    pub headers: Option<String>,
}

/// Transport metadata, parsed headers and raw body of the last response.
/// All fields are `None` until a response arrives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseSnapshot {
    pub info: Option<TransportInfo>,
    pub http_headers: Option<HashMap<String, String>>,
    pub body: Option<String>,
}

/// Synchronous client for the Realforce public API.
#[derive(Debug)]
pub struct RealforceClient {
    transport: Box<dyn Transport>,
    api_token: Option<String>,
    /// Verify the server's TLS certificate. Leave this on outside of tests.
    pub verify_ssl: bool,
    timeout: u64,
    last_error: String,
    last_request: RequestSnapshot,
    last_response: ResponseSnapshot,
    last_response_http_status: Option<u16>,
    request_successful: bool,
    resources: ResourceRegistry,
}

impl RealforceClient {
    /// Default timeout for a request, in seconds.
    pub const TIMEOUT: u64 = 10;

    /// Status reported when the transport gave no status code.
    pub const FALLBACK_STATUS: u16 = 418;

    /// Client backed by the blocking `ureq` transport.
    #[cfg(feature = "ureq")]
    pub fn new() -> Result<Self, ApiError> {
        Self::with_transport(Box::new(crate::transport::UreqTransport::new()))
    }

    /// `ureq`-backed client configured from `config`.
    #[cfg(feature = "ureq")]
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut client = Self::new()?;
        client.configure(config);
        Ok(client)
    }

    /// Client backed by a caller-supplied transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Result<Self, ApiError> {
        if !transport.is_available() {
            return Err(ApiError::TransportUnavailable);
        }

        Ok(Self {
            transport,
            api_token: None,
            verify_ssl: true,
            timeout: Self::TIMEOUT,
            last_error: String::new(),
            last_request: RequestSnapshot::default(),
            last_response: ResponseSnapshot::default(),
            last_response_http_status: None,
            request_successful: false,
            resources: ResourceRegistry::with_defaults(),
        })
    }

    /// Apply token, TLS flag and default timeout from `config`.
    pub fn configure(&mut self, config: &ClientConfig) {
        self.api_token = config.api_token.clone();
        self.verify_ssl = config.verify_ssl;
        self.timeout = config.timeout;
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    pub fn set_api_token(&mut self, token: impl Into<String>) {
        self.api_token = Some(token.into());
    }

    /// Default timeout used by resource accessors, in seconds.
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn set_timeout(&mut self, seconds: u64) {
        self.timeout = seconds;
    }

    /// Error recorded by the last request, `None` if it went through.
    pub fn last_error(&self) -> Option<&str> {
        (!self.last_error.is_empty()).then_some(self.last_error.as_str())
    }

    pub fn last_request(&self) -> &RequestSnapshot {
        &self.last_request
    }

    pub fn last_response(&self) -> &ResponseSnapshot {
        &self.last_response
    }

    pub fn last_response_http_status(&self) -> Option<u16> {
        self.last_response_http_status
    }

    /// Whether the last request was classified as a success.
    pub fn success(&self) -> bool {
        self.request_successful
    }

    /// Labels resource group.
    pub fn public_labels(&mut self) -> PublicLabels<'_> {
        PublicLabels::new(self)
    }

    /// Properties resource group.
    pub fn public_properties(&mut self) -> PublicProperties<'_> {
        PublicProperties::new(self)
    }

    /// Resolve a resource group by accessor name, e.g. `"publicLabels"`.
    pub fn resource(&mut self, name: &str) -> Result<Box<dyn Resource + '_>, ApiError> {
        let factory = self
            .resources
            .resolve(name)
            .ok_or_else(|| ApiError::UndefinedMethod(name.to_string()))?;
        Ok(factory(self))
    }

    /// Make a resource group resolvable under `type_name` (e.g. `"PublicFoo"`
    /// answers `resource("publicFoo")`).
    pub fn register_resource(&mut self, type_name: &str, factory: ResourceFactory) {
        self.resources.register(type_name, factory);
    }

    /// Perform one API exchange.
    ///
    /// GET sends `params` as a query string, POST/PUT/PATCH as a JSON body,
    /// DELETE ignores them. On success the decoded object or array comes back
    /// as `Payload::Data`; see `Payload` for the other shapes.
    pub fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        params: &Params,
        timeout: u64,
    ) -> Result<Payload, ApiError> {
        self.prepare_state_for_request(method, url, timeout)?;

        let mut request = HttpRequest {
            method,
            url: url.to_string(),
            headers: self.build_headers(method),
            body: None,
            timeout,
            verify_ssl: self.verify_ssl,
        };
        self.attach_request_payload(&mut request, params)?;

        debug!(method = %method, url = %request.url, timeout, "sending realforce request");

        let raw = match self.transport.execute(&request) {
            Ok(raw) => raw,
            Err(err) => return Err(self.fail(ApiError::Transport(err.0))),
        };
        self.set_response_state(raw);

        let decoded = match self.format_response()? {
            Some(value) if !is_falsy(&value) => value,
            _ => return Ok(Payload::Falsy),
        };

        let success = self.determine_success(&decoded, timeout)?;

        if decoded.is_object() || decoded.is_array() {
            Ok(Payload::Data(decoded))
        } else {
            Ok(Payload::Success(success))
        }
    }

    fn prepare_state_for_request(&mut self, method: HttpMethod, url: &str, timeout: u64) -> Result<(), ApiError> {
        self.last_error.clear();
        self.request_successful = false;
        self.last_response = ResponseSnapshot::default();
        self.last_response_http_status = None;
        self.last_request = RequestSnapshot {
            method: Some(method),
            timeout,
            ..RequestSnapshot::default()
        };

        let parsed = match url::Url::parse(url) {
            Ok(parsed) => parsed,
            Err(err) => {
                return Err(self.fail(ApiError::InvalidUrl {
                    url: url.to_string(),
                    reason: err.to_string(),
                }))
            }
        };

        self.last_request.scheme = Some(parsed.scheme().to_string());
        self.last_request.host = parsed.host_str().map(str::to_string);
        self.last_request.port = parsed.port();
        self.last_request.path = Some(parsed.path().to_string());
        self.last_request.query = parsed.query().map(str::to_string);
        Ok(())
    }

    fn build_headers(&self, method: HttpMethod) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];

        // The key goes out with every verb.
        if let Some(token) = self.api_token.as_deref().filter(|t| !t.is_empty()) {
            headers.push(("X-API-KEY".to_string(), token.to_string()));
        }

        if method == HttpMethod::Put {
            headers.push(("Allow".to_string(), "PUT, PATCH, POST".to_string()));
        }

        headers
    }

    fn attach_request_payload(&mut self, request: &mut HttpRequest, params: &Params) -> Result<(), ApiError> {
        if request.method == HttpMethod::Get {
            let query = build_query(params);
            // A bare trailing `?` is never sent.
            if !query.is_empty() {
                request.url = format!("{}?{query}", request.url);
            }
        } else if request.method.carries_body() {
            let encoded = match serde_json::to_string(params) {
                Ok(encoded) => encoded,
                Err(err) => return Err(self.fail(ApiError::Serialization(err.to_string()))),
            };
            self.last_request.body = encoded.clone();
            request.body = Some(encoded);
        }
        Ok(())
    }

    fn set_response_state(&mut self, raw: RawResponse) {
        let (header_block, body) = raw.split();
        let http_headers = parse_headers(header_block);
        let body = body.to_string();

        if let Some(sent) = &raw.info.request_header {
            self.last_request.headers = Some(sent.clone());
        }

        self.last_response = ResponseSnapshot {
            info: Some(raw.info),
            http_headers: Some(http_headers),
            body: Some(body),
        };
    }

    /// `Ok(None)` when the body is valid JSON but could not be turned into a
    /// payload; an empty body decodes to an empty object.
    fn format_response(&mut self) -> Result<Option<Value>, ApiError> {
        let body = self.last_response.body.as_deref().unwrap_or_default();
        if body.is_empty() {
            return Ok(Some(Value::Object(Params::new())));
        }

        match serde_json::from_str::<Value>(body) {
            Ok(value) if is_falsy(&value) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(err) => Err(self.fail(ApiError::Deserialization(err.to_string()))),
        }
    }

    fn determine_success(&mut self, decoded: &Value, timeout: u64) -> Result<bool, ApiError> {
        let info = self.last_response.info.clone().unwrap_or_default();
        let status = info.http_code.unwrap_or(Self::FALLBACK_STATUS);
        self.last_response_http_status = Some(status);

        debug!(status, elapsed = info.total_time, "realforce response received");

        if timeout > 0 && info.total_time >= timeout as f64 {
            return Err(self.fail(ApiError::Timeout {
                elapsed: info.total_time,
            }));
        }

        if (200..=299).contains(&status) {
            self.request_successful = true;
            return Ok(true);
        }

        if let Some(message) = decoded.get("message").and_then(Value::as_str) {
            return Err(self.fail(ApiError::Api {
                status,
                message: message.to_string(),
            }));
        }

        Err(self.fail(ApiError::Unknown))
    }

    /// Record `err` as the last error and hand it back.
    fn fail(&mut self, err: ApiError) -> ApiError {
        self.last_error = err.to_string();
        warn!(error = %self.last_error, "realforce request failed");
        err
    }
}

/// Falsiness as the API's wire contract treats it.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
