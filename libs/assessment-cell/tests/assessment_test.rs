use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assessment_cell::create_assessment_router;
use shared_config::AppConfig;
use shared_utils::test_utils::{MockSupabaseResponses, SessionTestUtils, TestConfig};

fn test_app(mock_server: &MockServer) -> (Router, AppConfig) {
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    (create_assessment_router(std::sync::Arc::new(config.clone())), config)
}

fn authed(config: &AppConfig, method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let token = SessionTestUtils::valid_token(config);
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("cookie", SessionTestUtils::cookie_header(&token));

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

fn treatment_plan(id: i64, assessment_id: i64, patient_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "assessment_id": assessment_id,
        "patient_id": patient_id,
        "title": "Fungal nail course",
        "description": null,
        "treatments": [{"name": "Laser session", "sessions": 3}],
        "status": status,
        "created_at": "2024-01-03T00:00:00+00:00",
        "updated_at": "2024-01-03T00:00:00+00:00"
    })
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .uri("/assessments")
        .header("authorization", format!("Bearer {}", SessionTestUtils::valid_token(&config)))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let token = SessionTestUtils::expired_token(&config);
    let request = Request::builder()
        .uri("/assessments")
        .header("cookie", SessionTestUtils::cookie_header(&token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_assessments_applies_filters() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("clinic_group", "eq.lasercare"))
        .and(query_param("status", "eq.in_review"))
        .and(query_param("risk_level", "eq.high"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::assessment(1, 2, "in_review", "high")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed(
            &config,
            "GET",
            "/assessments?clinic_group=lasercare&status=in_review&risk_level=high",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json_response = body_json(response).await;
    assert_eq!(json_response["total"], 1);
}

#[tokio::test]
async fn test_unknown_status_filter_is_bad_request() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let response = app
        .oneshot(authed(&config, "GET", "/assessments?status=pending", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_assessment_stats() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let recent = Utc::now().to_rfc3339();
    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("select", "status,risk_level,clinic_group,created_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"status": "new", "risk_level": "high", "clinic_group": "footcare", "created_at": recent},
            {"status": "contacted", "risk_level": "low", "clinic_group": "footcare", "created_at": "2020-01-01T00:00:00+00:00"}
        ])))
        .mount(&mock_server)
        .await;

    let response = app.oneshot(authed(&config, "GET", "/assessments/stats", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["by_status"]["new"], 1);
    assert_eq!(stats["by_status"]["booked"], 0);
    assert_eq!(stats["by_risk"]["high"], 1);
    assert_eq!(stats["by_clinic_group"]["footcare"], 2);
    assert_eq!(stats["last_7_days"], 1);
}

#[tokio::test]
async fn test_assessment_stats_reads_every_page() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let old = "2020-01-01T00:00:00+00:00";
    let first_page: Vec<Value> = (0..1000)
        .map(|_| json!({"status": "booked", "risk_level": "low", "clinic_group": "lasercare", "created_at": old}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("order", "id.asc"))
        .and(query_param("limit", "1000"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(first_page)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("offset", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"status": "new", "risk_level": "high", "clinic_group": "footcare", "created_at": Utc::now().to_rfc3339()},
            {"status": "new", "risk_level": "medium", "clinic_group": "footcare", "created_at": old}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app.oneshot(authed(&config, "GET", "/assessments/stats", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats["total"], 1002);
    assert_eq!(stats["by_status"]["booked"], 1000);
    assert_eq!(stats["by_status"]["new"], 2);
    assert_eq!(stats["by_clinic_group"]["lasercare"], 1000);
    assert_eq!(stats["by_risk"]["high"], 1);
    assert_eq!(stats["last_7_days"], 1);
}

#[tokio::test]
async fn test_get_assessment_includes_linked_records() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("id", "eq.21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::assessment(21, 11, "new", "medium")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", "eq.11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient(11, "Jane Doe", "jane@example.com")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/consultations"))
        .and(query_param("assessment_id", "eq.21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::consultation(31, 11, 21, "Jane Doe", "jane@example.com")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/images"))
        .and(query_param("consultation_id", "eq.31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 41,
            "consultation_id": 31,
            "file_name": "photo.jpg",
            "mime_type": "image/jpeg",
            "size_bytes": 1024,
            "url": "https://storage.example.com/photo.jpg",
            "created_at": "2024-01-01T00:00:00+00:00"
        }])))
        .mount(&mock_server)
        .await;

    let response = app.oneshot(authed(&config, "GET", "/assessments/21", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["id"], 21);
    assert_eq!(detail["patient"]["email"], "jane@example.com");
    assert_eq!(detail["consultation"]["id"], 31);
    assert_eq!(detail["images"][0]["file_name"], "photo.jpg");
}

#[tokio::test]
async fn test_update_assessment_status() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("id", "eq.21"))
        .and(body_partial_json(json!({ "status": "booked", "notes": "Booked for Tuesday" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::assessment(21, 11, "booked", "medium")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed(
            &config,
            "PATCH",
            "/assessments/21",
            Some(json!({ "status": "booked", "notes": "Booked for Tuesday" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json_response = body_json(response).await;
    assert_eq!(json_response["status"], "booked");
}

#[tokio::test]
async fn test_empty_assessment_update_is_rejected() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let response = app
        .oneshot(authed(&config, "PATCH", "/assessments/21", Some(json!({}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_assessment_returns_no_content() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("id", "eq.21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::assessment(21, 11, "archived", "low")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("id", "eq.21"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app.oneshot(authed(&config, "DELETE", "/assessments/21", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_missing_assessment_is_not_found() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/assessments"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let response = app.oneshot(authed(&config, "DELETE", "/assessments/99", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_consultations_by_clinic_group() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/consultations"))
        .and(query_param("clinic_group", "eq.footcare"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::consultation(31, 11, 21, "Jane Doe", "jane@example.com")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed(&config, "GET", "/consultations?clinic_group=footcare&limit=10", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json_response = body_json(response).await;
    assert_eq!(json_response["consultations"][0]["name"], "Jane Doe");
}

#[tokio::test]
async fn test_get_missing_consultation_is_not_found() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/consultations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let response = app.oneshot(authed(&config, "GET", "/consultations/5", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_treatment_plan_takes_patient_from_assessment() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("id", "eq.21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::assessment(21, 11, "booked", "medium")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/treatment_plans"))
        .and(body_partial_json(json!({ "assessment_id": 21, "patient_id": 11, "status": "draft" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            treatment_plan(51, 21, 11, "draft")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = json!({
        "assessment_id": 21,
        "title": "Fungal nail course",
        "treatments": [{"name": "Laser session", "sessions": 3}]
    });
    let response = app.oneshot(authed(&config, "POST", "/treatment-plans", Some(body))).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json_response = body_json(response).await;
    assert_eq!(json_response["patient_id"], 11);
}

#[tokio::test]
async fn test_create_treatment_plan_for_missing_assessment_is_not_found() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/assessments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/treatment_plans"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let body = json!({ "assessment_id": 99, "title": "Plan" });
    let response = app.oneshot(authed(&config, "POST", "/treatment-plans", Some(body))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_treatment_plan_status() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/treatment_plans"))
        .and(query_param("id", "eq.51"))
        .and(body_partial_json(json!({ "status": "active" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            treatment_plan(51, 21, 11, "active")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed(&config, "PATCH", "/treatment-plans/51", Some(json!({ "status": "active" }))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json_response = body_json(response).await;
    assert_eq!(json_response["status"], "active");
}
