use serde_json::{json, Value};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_database::{ClinicStore, SupabaseClient};
use shared_models::clinic::{AssessmentStatus, AssessmentUpdate, ClinicGroup, NewPatient};
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

#[tokio::test]
async fn test_requests_carry_service_key() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(header("apikey", "test-service-key"))
        .and(header("authorization", "Bearer test-service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config);
    let rows: Vec<Value> = client
        .request(reqwest::Method::GET, "/rest/v1/patients", None)
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(409).set_body_json(MockSupabaseResponses::error_response(
            "duplicate key value",
            "23505",
        )))
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config);
    let result: anyhow::Result<Vec<Value>> = client
        .request(reqwest::Method::GET, "/rest/v1/patients", None)
        .await;

    let message = result.unwrap_err().to_string();
    assert!(message.starts_with("Conflict:"), "{}", message);
}

#[tokio::test]
async fn test_upload_object_returns_public_url() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/consultation-images/footcare/photo.png"))
        .and(header("x-upsert", "true"))
        .and(header("content-type", "image/png"))
        .and(body_string("png-bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "photo" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config);
    let url = client
        .upload_object(
            "consultation-images",
            "footcare/photo.png",
            b"png-bytes".to_vec(),
            "image/png",
        )
        .await
        .unwrap();

    assert_eq!(
        url,
        format!(
            "{}/storage/v1/object/public/consultation-images/footcare/photo.png",
            mock_server.uri()
        )
    );
}

#[tokio::test]
async fn test_insert_asks_for_representation() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::patient(9, "Jane Doe", "jane@example.com")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = ClinicStore::new(&config);
    let patient = store
        .create_patient(&NewPatient {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            clinic_group: ClinicGroup::FootCare,
        })
        .await
        .unwrap();

    assert_eq!(patient.id, 9);
}

#[tokio::test]
async fn test_patch_stamps_updated_at() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/assessments"))
        .and(query_param("id", "eq.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = ClinicStore::new(&config);
    let updated = store
        .update_assessment(
            4,
            &AssessmentUpdate {
                status: Some(AssessmentStatus::Booked),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.is_none());

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["status"], "booked");
    assert!(body["updated_at"].is_string());
    assert!(body.get("notes").is_none());
}
