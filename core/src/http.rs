//! HTTP wire types for the host-does-IO boundary.
//!
//! # Design
//! The client describes each exchange as plain data: it builds an
//! `HttpRequest`, hands it to a `Transport`, and gets back a `RawResponse`
//! whose content is the raw header block followed by the body. The helpers
//! here turn parameter maps into query strings and header blocks into maps,
//! so the client itself never touches sockets.
//!
//! All fields use owned types so values can be stored in the client's
//! last-request/last-response snapshots without lifetime concerns.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

/// Flat, insertion-ordered parameter map for one API call.
pub type Params = serde_json::Map<String, Value>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Lower-case verb, as recorded in the request snapshot.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    /// Upper-case method name as sent on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether params travel as a JSON body rather than a query string.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `RealforceClient::request` and handed to a `Transport`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Full URL, query string included for GET.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Seconds; `0` disables the transport-level limit.
    pub timeout: u64,
    pub verify_ssl: bool,
}

impl HttpRequest {
    /// Value of the first header with this exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Transfer metadata reported by the transport alongside the raw content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransportInfo {
    /// Status code, when the transport got that far.
    pub http_code: Option<u16>,
    /// Total time of the exchange, in seconds.
    pub total_time: f64,
    /// Length in bytes of the header block at the start of the content.
    pub header_size: usize,
    /// The outgoing header block, if the transport recorded it.
    pub request_header: Option<String>,
}

/// What a transport hands back: metadata plus header block and body in one
/// string, split at `info.header_size`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResponse {
    pub info: TransportInfo,
    pub content: String,
}

impl RawResponse {
    /// Assemble a response from a header block and a body.
    pub fn new(info: TransportInfo, header_block: &str, body: &str) -> Self {
        let mut content = String::with_capacity(header_block.len() + body.len());
        content.push_str(header_block);
        content.push_str(body);
        Self {
            info: TransportInfo {
                header_size: header_block.len(),
                ..info
            },
            content,
        }
    }

    /// Split the content into header block and body.
    ///
    /// A header size past the end of the content or inside a multi-byte
    /// character is clamped to the nearest valid boundary below it.
    pub fn split(&self) -> (&str, &str) {
        let mut at = self.info.header_size.min(self.content.len());
        while !self.content.is_char_boundary(at) {
            at -= 1;
        }
        self.content.split_at(at)
    }
}

/// Encode params as a URL query string, the way PHP's `http_build_query`
/// does: booleans become `1`/`0`, nulls are skipped, nested arrays and
/// objects use bracket notation.
pub fn build_query(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        append_query_pair(&mut serializer, key, value);
    }
    serializer.finish()
}

fn append_query_pair(
    serializer: &mut form_urlencoded::Serializer<'_, String>,
    key: &str,
    value: &Value,
) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => {
            serializer.append_pair(key, if *flag { "1" } else { "0" });
        }
        Value::Number(number) => {
            serializer.append_pair(key, &number.to_string());
        }
        Value::String(text) => {
            serializer.append_pair(key, text);
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                append_query_pair(serializer, &format!("{key}[{index}]"), item);
            }
        }
        Value::Object(map) => {
            for (name, item) in map {
                append_query_pair(serializer, &format!("{key}[{name}]"), item);
            }
        }
    }
}

/// Parse a raw header block into a name → value map.
///
/// Status lines and blank lines are skipped, as are lines without a `": "`
/// separator. Later duplicates overwrite earlier ones. Names keep their case.
pub fn parse_headers(raw: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for line in raw.split('\n') {
        if is_status_line(line) {
            continue;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((name, value)) = line.split_once(": ") {
            headers.insert(name.to_string(), value.to_string());
        }
    }

    headers
}

fn is_status_line(line: &str) -> bool {
    let head: String = line.chars().take(7).collect();
    head.contains("HTTP/1") || head.contains("HTTP/2")
}
