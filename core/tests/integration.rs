//! End-to-end exchanges against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives
//! `RealforceClient::request` through the real `ureq` transport. Resource
//! groups point at the production hosts, so these tests call `request`
//! directly with the same verbs and parameter maps the groups would send.

#![cfg(feature = "ureq")]

use std::net::SocketAddr;

use mock_server::Settings;
use realforce_core::{
    ApiError, HttpMethod, I18nRequest, LocationsRequest, Params, Payload, PropertiesListRequest, QueryParams,
    RealforceClient,
};

/// Start the mock server on a random port in a background thread.
fn spawn_server(settings: Settings) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, settings).await
        })
        .unwrap();
    });

    addr
}

fn url(addr: SocketAddr, endpoint: &str) -> String {
    format!("http://{addr}/api/v1/{endpoint}")
}

#[test]
fn labels_and_listings_round_trip() {
    let addr = spawn_server(Settings::default());
    let mut client = RealforceClient::new().unwrap();

    // Step 1: categories labels, no API key.
    let mut i18n = I18nRequest::new();
    i18n.lang(["en"]);
    let payload = client
        .request(HttpMethod::Get, &url(addr, "get-categories-labels"), &i18n.to_params().unwrap(), 10)
        .unwrap();
    let data = payload.as_data().expect("categories payload");
    assert_eq!(data["categories"][1]["label"], "House");
    assert_eq!(data["query"]["lang"], "en");
    assert_eq!(client.last_response_http_status(), Some(200));
    assert!(client.success());
    assert_eq!(client.last_error(), None);

    // Step 2: the response snapshot carries parsed headers and the raw body.
    let response = client.last_response();
    let headers = response.http_headers.as_ref().unwrap();
    assert_eq!(headers.get("content-type").map(String::as_str), Some("application/json"));
    assert!(response.body.as_deref().unwrap().starts_with('{'));

    // Step 3: locations with filters, pipe-joined languages survive encoding.
    let mut locations = LocationsRequest::new();
    locations.lang(["fr", "", "de"]).is_city().canton_id(0);
    let payload = client
        .request(HttpMethod::Get, &url(addr, "get-locations"), &locations.to_params().unwrap(), 10)
        .unwrap();
    let data = payload.into_data().unwrap();
    assert_eq!(data["query"]["lang"], "fr||de");
    assert_eq!(data["query"]["is_city"], "1");
    assert_eq!(data["query"]["canton_id"], "0");

    // Step 4: full listings with paging.
    let mut listing = PropertiesListRequest::new();
    listing.page(2).per_page(25).unwrap();
    let payload = client
        .request(HttpMethod::Get, &url(addr, "get-full-listings"), &listing.to_params().unwrap(), 10)
        .unwrap();
    let data = payload.into_data().unwrap();
    assert_eq!(data["items"][0]["id"], "R-1001");
    assert_eq!(data["query"]["per_page"], "25");
    assert_eq!(data["query"]["page"], "2");
    assert_eq!(client.last_request().path.as_deref(), Some("/api/v1/get-full-listings"));
}

#[test]
fn api_key_is_sent_and_checked() {
    let addr = spawn_server(Settings {
        api_key: Some("secret".to_string()),
    });
    let mut client = RealforceClient::new().unwrap();

    // Without the key the server answers 401 with a message.
    let err = client
        .request(HttpMethod::Get, &url(addr, "get-amenities-labels"), &Params::new(), 10)
        .unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 401, .. }));
    assert_eq!(client.last_error(), Some("401 Invalid API key"));
    assert!(!client.success());

    // With the key the same call goes through.
    client.set_api_token("secret");
    let payload = client
        .request(HttpMethod::Get, &url(addr, "get-amenities-labels"), &Params::new(), 10)
        .unwrap();
    assert!(payload.is_truthy());
    assert_eq!(client.last_error(), None);
    let sent = client.last_request().headers.as_deref().unwrap();
    assert!(sent.contains("X-API-KEY: secret"));
    assert!(sent.contains("Accept: application/json"));
}

#[test]
fn unknown_endpoint_reports_api_message() {
    let addr = spawn_server(Settings::default());
    let mut client = RealforceClient::new().unwrap();

    let err = client
        .request(HttpMethod::Get, &url(addr, "get-agents"), &Params::new(), 10)
        .unwrap_err();
    assert_eq!(err.to_string(), "404 Not found");
    assert_eq!(client.last_response_http_status(), Some(404));
}

#[test]
fn empty_body_is_falsy() {
    let addr = spawn_server(Settings::default());
    let mut client = RealforceClient::new().unwrap();

    let payload = client
        .request(HttpMethod::Get, &url(addr, "empty"), &Params::new(), 10)
        .unwrap();
    assert_eq!(payload, Payload::Falsy);
    assert_eq!(client.last_response().body.as_deref(), Some(""));
}

#[test]
fn connection_failure_is_a_transport_error() {
    // Bind and drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let mut client = RealforceClient::new().unwrap();

    let err = client
        .request(HttpMethod::Get, &url(addr, "get-locations"), &Params::new(), 2)
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(client.last_error().is_some());
    assert!(client.last_response().body.is_none());
}

#[test]
fn bodies_over_ten_mib_are_read_in_full() {
    let addr = spawn_server(Settings::default());
    let mut client = RealforceClient::new().unwrap();

    let payload = client
        .request(HttpMethod::Get, &url(addr, "large"), &Params::new(), 30)
        .unwrap();
    let data = payload.into_data().unwrap();
    assert_eq!(data["items"].as_array().unwrap().len(), 11 * 1024);
    assert!(client.last_response().body.as_ref().unwrap().len() > 11 * 1024 * 1024);
    assert!(client.success());
}

#[test]
fn redirects_are_not_followed() {
    let addr = spawn_server(Settings::default());
    let mut client = RealforceClient::new().unwrap();

    let err = client
        .request(HttpMethod::Get, &url(addr, "moved"), &Params::new(), 10)
        .unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 302, .. }));
    assert_eq!(err.to_string(), "302 Moved");
    assert_eq!(client.last_response_http_status(), Some(302));
    let headers = client.last_response().http_headers.as_ref().unwrap();
    assert_eq!(
        headers.get("location").map(String::as_str),
        Some("/api/v1/get-categories-labels")
    );
}

#[test]
fn non_utf8_body_is_a_decode_error() {
    let addr = spawn_server(Settings::default());
    let mut client = RealforceClient::new().unwrap();

    let err = client
        .request(HttpMethod::Get, &url(addr, "binary"), &Params::new(), 10)
        .unwrap_err();
    assert!(matches!(err, ApiError::Deserialization(_)));
    assert_eq!(client.last_response_http_status(), Some(200));
    assert!(client.last_error().is_some());
}
