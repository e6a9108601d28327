//! Canned transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::TransportError;
use crate::http::{HttpRequest, RawResponse, TransportInfo};
use crate::transport::Transport;

#[derive(Debug, Default)]
struct State {
    responses: VecDeque<Result<RawResponse, TransportError>>,
    requests: Vec<HttpRequest>,
}

/// Replays queued responses in order and records every request it sees.
/// Clones share the same queue, so a test keeps one handle for inspection
/// while the client owns the other.
#[derive(Debug, Clone)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<State>>,
    available: bool,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::default(),
            available: true,
        }
    }

    pub(crate) fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub(crate) fn push(&self, response: RawResponse) {
        self.state.lock().unwrap().responses.push_back(Ok(response));
    }

    pub(crate) fn push_error(&self, message: &str) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Err(TransportError::new(message)));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

impl Transport for MockTransport {
    fn is_available(&self) -> bool {
        self.available
    }

    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let mut raw = state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no canned response queued")))?;

        if raw.info.request_header.is_none() {
            let sent: String = request
                .headers
                .iter()
                .map(|(name, value)| format!("{name}: {value}\r\n"))
                .collect();
            raw.info.request_header = Some(sent);
        }
        Ok(raw)
    }
}

/// A JSON response with the given status, elapsed time and body.
pub(crate) fn response(status: Option<u16>, total_time: f64, body: &str) -> RawResponse {
    let status_line = status
        .map(|code| format!("HTTP/1.1 {code} Status\r\n"))
        .unwrap_or_default();
    let header_block = format!("{status_line}Content-Type: application/json\r\nServer: mock\r\n\r\n");

    RawResponse::new(
        TransportInfo {
            http_code: status,
            total_time,
            ..TransportInfo::default()
        },
        &header_block,
        body,
    )
}
