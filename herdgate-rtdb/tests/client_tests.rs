use chrono::Utc;
use herdgate_rtdb::{ProjectRegistry, RtdbError};
use herdgate_types::ProjectCredential;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential(project_id: &str, url: &str) -> ProjectCredential {
    ProjectCredential {
        project_id: project_id.into(),
        project_name: format!("{project_id} farm"),
        secret: "test-secret".into(),
        database_url: url.into(),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn registry_with(server: &MockServer) -> ProjectRegistry {
    let mut registry = ProjectRegistry::new();
    registry.register(&credential("farm-a", &server.uri()));
    registry
}

// ── fetch ──

#[tokio::test]
async fn fetch_returns_existing_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Cow/cow-1.json"))
        .and(query_param("auth", "test-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Bella" })))
        .mount(&server)
        .await;

    let registry = registry_with(&server);
    let client = registry.get("farm-a").unwrap();
    let value = client.fetch("Cow/cow-1").await.unwrap();
    assert_eq!(value, Some(json!({ "name": "Bella" })));
}

#[tokio::test]
async fn fetch_null_means_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Cow/missing.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let registry = registry_with(&server);
    let client = registry.get("farm-a").unwrap();
    assert_eq!(client.fetch("Cow/missing").await.unwrap(), None);
}

#[tokio::test]
async fn fetch_server_error_is_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Cow.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let registry = registry_with(&server);
    let client = registry.get("farm-a").unwrap();
    let err = client.fetch("Cow").await.unwrap_err();
    assert!(matches!(err, RtdbError::Upstream(_)));
}

#[tokio::test]
async fn errors_never_carry_the_secret() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Cow.json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let registry = registry_with(&server);
    let client = registry.get("farm-a").unwrap();
    let err = client.fetch("Cow").await.unwrap_err().to_string();
    assert!(err.contains("farm-a"));
    assert!(!err.contains("test-secret"));
}

// ── merge / replace ──

#[tokio::test]
async fn merge_sends_patch_with_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/Milk/m-1.json"))
        .and(query_param("auth", "test-secret"))
        .and(body_json(json!({ "litres": 12 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "litres": 12 })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_with(&server);
    let client = registry.get("farm-a").unwrap();
    client.merge("Milk/m-1", &json!({ "litres": 12 })).await.unwrap();
}

#[tokio::test]
async fn replace_sends_put_with_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/Cow/cow-1.json"))
        .and(body_json(json!({ "name": "Bella", "mobile": "+1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_with(&server);
    let client = registry.get("farm-a").unwrap();
    client
        .replace("Cow/cow-1", &json!({ "name": "Bella", "mobile": "+1" }))
        .await
        .unwrap();
}

// ── Registry ──

#[tokio::test]
async fn registry_is_first_registration_wins() {
    let server = MockServer::start().await;
    let mut registry = ProjectRegistry::new();
    assert!(registry.register(&credential("farm-a", &server.uri())));
    assert!(!registry.register(&credential("farm-a", "https://elsewhere.example")));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn registry_skips_inactive_credentials() {
    let mut cred = credential("farm-a", "https://a.example");
    cred.is_active = false;

    let mut registry = ProjectRegistry::new();
    assert!(!registry.register(&cred));
    assert!(registry.is_empty());
    assert!(registry.get("farm-a").is_none());
}

#[tokio::test]
async fn registry_iterates_in_project_id_order() {
    let mut registry = ProjectRegistry::new();
    registry.register(&credential("zeta", "https://z.example"));
    registry.register(&credential("alpha", "https://a.example"));

    let ids: Vec<&str> = registry.all().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["alpha", "zeta"]);
}
