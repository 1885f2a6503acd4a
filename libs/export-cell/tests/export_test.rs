use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use export_cell::create_export_router;
use shared_config::AppConfig;
use shared_utils::test_utils::{MockSupabaseResponses, SessionTestUtils, TestConfig};

fn test_app(mock_server: &MockServer) -> (Router, AppConfig) {
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    (create_export_router(std::sync::Arc::new(config.clone())), config)
}

fn authed(config: &AppConfig, uri: &str) -> Request<Body> {
    let token = SessionTestUtils::valid_token(config);
    Request::builder()
        .uri(uri)
        .header("cookie", SessionTestUtils::cookie_header(&token))
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn header_value(response: &axum::response::Response, name: header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_export_requires_session() {
    let mock_server = MockServer::start().await;
    let (app, _) = test_app(&mock_server);

    let request = Request::builder()
        .uri("/export/patients")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_consultations_csv_export() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let mut consultation =
        MockSupabaseResponses::consultation(31, 11, 21, "Doe, Jane", "jane@example.com");
    consultation["symptom_description"] = json!("Said \"it hurts\"\nwhen walking");

    Mock::given(method("GET"))
        .and(path("/rest/v1/consultations"))
        .and(query_param("clinic_group", "eq.footcare"))
        .and(query_param("limit", "500"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([consultation])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed(&config, "/export/consultations?format=csv&clinic_group=footcare"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_TYPE), "text/csv; charset=utf-8");
    let expected_name = format!(
        "attachment; filename=\"consultations-{}.csv\"",
        Utc::now().format("%Y-%m-%d")
    );
    assert_eq!(header_value(&response, header::CONTENT_DISPOSITION), expected_name);

    let csv = body_text(response).await;
    assert!(csv.starts_with("id,created_at,clinic_group,patient_id,assessment_id,name,email,"));
    assert!(csv.contains("\"Doe, Jane\""));
    assert!(csv.contains("\"Said \"\"it hurts\"\"\nwhen walking\""));
}

#[tokio::test]
async fn test_assessments_json_export_with_date_range() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("created_at", "gte.2024-01-01T00:00:00.000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::assessment(1, 2, "new", "high"),
            MockSupabaseResponses::assessment(3, 4, "booked", "low")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed(&config, "/export/assessments?format=json&from=2024-01-01"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_TYPE), "application/json");
    assert!(header_value(&response, header::CONTENT_DISPOSITION).ends_with(".json\""));

    let rows: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[1]["status"], "booked");
}

#[tokio::test]
async fn test_patients_export_follows_pages() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let first_page: Vec<Value> = (1..=500)
        .map(|id| MockSupabaseResponses::patient(id, "Patient", &format!("p{}@example.com", id)))
        .collect();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(first_page)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("offset", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient(501, "Last Patient", "last@example.com")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app.oneshot(authed(&config, "/export/patients")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let csv = body_text(response).await;
    // header plus 501 rows, each terminated by CRLF
    assert_eq!(csv.matches("\r\n").count(), 502);
    assert!(csv.contains("last@example.com"));
}

#[tokio::test]
async fn test_unknown_dataset_is_bad_request() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let response = app.oneshot(authed(&config, "/export/invoices")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_format_is_bad_request() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let response = app
        .oneshot(authed(&config, "/export/patients?format=xlsx"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
