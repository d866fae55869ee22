/// End-to-end tests through the router with mocked providers
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{test_config, ADDRESS};
use serde_json::{json, Value};
use soul_identity_api::api;
use soul_identity_api::handlers::AppState;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(server: &MockServer) -> Router {
    let state = AppState::from_config(test_config(&server.uri())).unwrap();
    api::router(Arc::new(state))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn mount_votes(server: &MockServer, count: usize) {
    let votes: Vec<_> = (0..count).map(|i| json!({"id": i.to_string()})).collect();
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"votes": votes}})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_missing_address_is_400() {
    let server = MockServer::start().await;

    for uri in ["/api/soul", "/api/soul/", "/api/soul/%20%20"] {
        let (status, body) = get(app(&server), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(body, json!({"success": false, "message": "Missing address"}));
    }
}

#[tokio::test]
async fn test_undecodable_path_is_json_400() {
    let server = MockServer::start().await;

    let (status, body) = get(app(&server), "/api/soul/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "message": "Invalid address"}));
}

#[tokio::test]
async fn test_malformed_social_entry_keeps_the_rest() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile/dwr.eth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"platform": "farcaster", "identity": "dwr", "social": {"follower": 9000}},
            {"platform": "lens", "identity": "x", "displayName": 5}
        ])))
        .mount(&server)
        .await;

    let (status, body) = get(app(&server), "/api/soul/dwr.eth").await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert!(data["raw"].get("_fallback").is_none());
    assert_eq!(data["raw"]["social"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["raw"]["social"][0]["followerCount"], 9000);
    assert_eq!(data["tags"], json!([{"label": "Social Star", "color": "orange"}]));
}

#[tokio::test]
async fn test_total_outage_serves_fallback() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, body) = get(app(&server), &format!("/api/soul/{}", ADDRESS)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["address"], ADDRESS);
    assert_eq!(body["data"]["raw"]["_fallback"], true);
    assert_eq!(body["data"]["raw"]["txCount"], 0);
    assert_eq!(body["data"]["raw"]["accountAgeDays"], Value::Null);
    assert_eq!(body["data"]["tags"], json!([{"label": "Explorer", "color": "gray"}]));
}

#[tokio::test]
async fn test_active_voter_profile() {
    let server = MockServer::start().await;
    mount_votes(&server, 6).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mixed_case = ADDRESS.to_uppercase();
    let (status, body) = get(app(&server), &format!("/api/soul/{}", mixed_case)).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["address"], ADDRESS);
    assert_eq!(data["raw"]["voteCount"], 6);
    assert!(data["raw"].get("_fallback").is_none());
    assert_eq!(data["tags"], json!([{"label": "Active Voter", "color": "silver"}]));
}

#[tokio::test]
async fn test_name_lookup_only_hits_social_provider() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile/vitalik.eth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"platform": "ens", "identity": "vitalik.eth"},
            {"platform": "farcaster", "identity": "vitalik", "social": {"follower": 1000}}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = get(app(&server), "/api/soul/vitalik.eth").await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["address"], "vitalik.eth");
    assert_eq!(data["raw"]["social"].as_array().map(Vec::len), Some(2));
    assert_eq!(data["raw"]["social"][1]["followerCount"], 1000);
    assert_eq!(data["tags"], json!([{"label": "Social Star", "color": "orange"}]));
}

#[tokio::test]
async fn test_health_routes() {
    let server = MockServer::start().await;

    for uri in ["/api/health", "/health"] {
        let (status, body) = get(app(&server), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
    }
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = MockServer::start().await;

    let (status, body) = get(app(&server), "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let server = MockServer::start().await;

    let (status, body) = get(app(&server), "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/soul/{address}").is_some());
}
