//! The transport seam between the client and the network.
//!
//! # Design
//! `RealforceClient` never talks to a socket itself. It hands an
//! `HttpRequest` to a `Transport` and receives a `RawResponse`: the header
//! block and body as one string plus transfer metadata (status code, elapsed
//! time, header length). Tests plug in canned transports; production code
//! uses `UreqTransport`, available behind the default `ureq` feature.

use std::fmt;

use crate::error::TransportError;
use crate::http::{HttpRequest, RawResponse};

/// User agent sent by `UreqTransport`.
pub const USER_AGENT: &str = "Antistatique/Realforce";

/// Executes one HTTP exchange.
pub trait Transport: fmt::Debug + Send + Sync {
    /// Whether this transport can issue requests at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Perform the request. Non-2xx statuses are data, not errors: only a
    /// failure to obtain a response body at all is reported as `Err`.
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use std::time::{Duration, Instant};

    use ureq::http::Response;
    use ureq::tls::TlsConfig;
    use ureq::typestate::WithBody;
    use ureq::{Agent, Body, RequestBuilder};

    use super::{Transport, USER_AGENT};
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, RawResponse, TransportInfo};

    /// Blocking HTTPS transport built on `ureq`.
    ///
    /// A fresh agent is configured per request so the timeout and the TLS
    /// verification flag always follow the request being sent. Redirects are
    /// not followed: a 3xx comes back to the client as is.
    #[derive(Debug, Clone, Default)]
    pub struct UreqTransport;

    impl UreqTransport {
        pub fn new() -> Self {
            Self
        }

        fn agent(request: &HttpRequest) -> Agent {
            let timeout = (request.timeout > 0).then(|| Duration::from_secs(request.timeout));
            let tls = TlsConfig::builder()
                .disable_verification(!request.verify_ssl)
                .build();

            Agent::config_builder()
                .http_status_as_error(false)
                .max_redirects(0)
                .timeout_global(timeout)
                .user_agent(USER_AGENT)
                .tls_config(tls)
                .build()
                .new_agent()
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
            let agent = Self::agent(request);
            let url = request.url.as_str();
            let body = request.body.as_deref();
            let started = Instant::now();

            let result = match request.method {
                HttpMethod::Get => with_headers(agent.get(url), &request.headers).call(),
                HttpMethod::Delete => with_headers(agent.delete(url), &request.headers).call(),
                HttpMethod::Post => send(with_headers(agent.post(url), &request.headers), body),
                HttpMethod::Put => send(with_headers(agent.put(url), &request.headers), body),
                HttpMethod::Patch => send(with_headers(agent.patch(url), &request.headers), body),
            };

            let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;
            let header_block = header_block(&response);
            // No size cap; bytes that are not UTF-8 are left for the JSON decoder to reject.
            let bytes = response
                .body_mut()
                .with_config()
                .limit(u64::MAX)
                .read_to_vec()
                .map_err(|e| TransportError::new(e.to_string()))?;
            let content = String::from_utf8_lossy(&bytes);

            let info = TransportInfo {
                http_code: Some(response.status().as_u16()),
                total_time: started.elapsed().as_secs_f64(),
                header_size: header_block.len(),
                request_header: Some(request_header(request)),
            };

            Ok(RawResponse::new(info, &header_block, &content))
        }
    }

    fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    fn send(builder: RequestBuilder<WithBody>, body: Option<&str>) -> Result<Response<Body>, ureq::Error> {
        match body {
            Some(body) => builder.send(body.as_bytes()),
            None => builder.send_empty(),
        }
    }

    /// Rebuild the status line and header lines the way they came off the wire.
    fn header_block(response: &Response<Body>) -> String {
        let status = response.status();
        let mut block = format!(
            "{:?} {} {}\r\n",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        );
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                block.push_str(&format!("{}: {value}\r\n", name.as_str()));
            }
        }
        block.push_str("\r\n");
        block
    }

    /// The outgoing header block, in the shape of a raw HTTP/1.1 request head.
    fn request_header(request: &HttpRequest) -> String {
        let (target, host) = match url::Url::parse(&request.url) {
            Ok(parsed) => {
                let mut target = parsed.path().to_string();
                if let Some(query) = parsed.query() {
                    target.push('?');
                    target.push_str(query);
                }
                (target, parsed.host_str().unwrap_or_default().to_string())
            }
            Err(_) => (request.url.clone(), String::new()),
        };

        let mut head = format!(
            "{} {target} HTTP/1.1\r\nHost: {host}\r\nUser-Agent: {USER_AGENT}\r\n",
            request.method.wire_name()
        );
        for (name, value) in &request.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str("\r\n");
        head
    }

}
