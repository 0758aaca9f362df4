mod common;

use hemolink::api::{
    ApiError, BloodType, CreateEmergencyRequest, ComponentKind, EntityId, PageQuery,
    RequestStatus, Urgency,
};

use common::api_client;
use common::mock_backend::{MockBackend, MockResponse};

fn request_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "patientName": "Tran Van B",
        "bloodGroup": "O-",
        "componentType": "red_cells",
        "quantity": 2,
        "urgency": "critical",
        "hospitalName": "Cho Ray",
        "status": status,
    })
}

#[tokio::test]
async fn bearer_token_and_request_id_are_sent() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::envelope(serde_json::json!({
            "id": 7,
            "fullName": "Le Thi C",
            "role": "Staff",
        })))
        .await;

    let client = api_client(&backend.base_url(), Some("tok-123"));
    let user = client.current_user().await.unwrap();

    assert_eq!(user.id, EntityId::new("7"));
    assert_eq!(user.role, "Staff");

    let requests = backend.captured_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/auth/me");
    assert_eq!(requests[0].header("authorization"), Some("Bearer tok-123"));
    assert!(requests[0].header("x-request-id").is_some());
}

#[tokio::test]
async fn anonymous_client_sends_no_authorization() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::envelope(serde_json::json!([
            { "id": 1, "name": "A+" }
        ])))
        .await;

    let client = api_client(&backend.base_url(), None);
    let groups = client.list_blood_groups().await.unwrap();

    assert_eq!(groups.len(), 1);
    let requests = backend.captured_requests().await;
    assert!(requests[0].header("authorization").is_none());
}

#[tokio::test]
async fn paged_list_sends_query_and_decodes_meta() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::page(
            serde_json::json!([request_json("r1", "pending"), request_json("r2", "approved")]),
            2,
            2,
            5,
        ))
        .await;

    let client = api_client(&backend.base_url(), Some("t"));
    let page = client
        .list_blood_requests(&PageQuery::page(2, 2))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].status, RequestStatus::Approved);
    assert_eq!(page.meta().total_pages(), 3);
    assert!(page.meta().has_next());

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].path, "/api/blood-requests");
    assert_eq!(requests[0].query.as_deref(), Some("pageNumber=2&pageSize=2"));
}

#[tokio::test]
async fn not_found_maps_to_not_found() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error(404, "Donor profile not found"))
        .await;

    let client = api_client(&backend.base_url(), Some("t"));
    let err = client.my_donor_profile().await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Donor profile not found");
}

#[tokio::test]
async fn unauthorized_maps_to_unauthorized() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error(401, "Token expired"))
        .await;

    let client = api_client(&backend.base_url(), Some("stale"));
    let err = client.current_user().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { status: 401, .. }));
}

#[tokio::test]
async fn validation_failure_carries_backend_message() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error(400, "Quantity must be positive"))
        .await;

    let client = api_client(&backend.base_url(), Some("t"));
    let body = CreateEmergencyRequest {
        patient_name: "Tran Van B".into(),
        blood_group: BloodType::ONegative,
        component_type: ComponentKind::RedCells,
        quantity: 2,
        hospital_name: "Cho Ray".into(),
        address: "201B Nguyen Chi Thanh".into(),
        contact_phone: "+84 28 3855 4137".into(),
        urgency: Urgency::Critical,
        needed_by: chrono::NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
    };
    let err = client.create_emergency_request(&body).await.unwrap_err();

    assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
    assert_eq!(err.user_message(), "Quantity must be positive");

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/blood-requests/emergency");
    let sent = requests[0].json();
    assert_eq!(sent["bloodGroup"], "O-");
    assert_eq!(sent["componentType"], "red_cells");
    assert_eq!(sent["neededBy"], "2026-11-02");
}

#[tokio::test]
async fn status_update_uses_put_with_status_body() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::envelope(request_json("r9", "fulfilled")))
        .await;

    let client = api_client(&backend.base_url(), Some("t"));
    let updated = client
        .update_request_status(&EntityId::new("r9"), RequestStatus::Fulfilled)
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::Fulfilled);
    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].path, "/api/blood-requests/r9/status");
    assert_eq!(requests[0].json(), serde_json::json!({ "status": "fulfilled" }));
}

#[tokio::test]
async fn acknowledgement_without_data_is_ok() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::raw(204, "")).await;

    let client = api_client(&backend.base_url(), Some("t"));
    client
        .mark_notification_read(&EntityId::new("n1"))
        .await
        .unwrap();

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].path, "/api/notifications/n1/read");
}

#[tokio::test]
async fn success_without_data_is_missing_data() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::envelope(serde_json::Value::Null))
        .await;

    let client = api_client(&backend.base_url(), Some("t"));
    let err = client.current_user().await.unwrap_err();

    assert!(matches!(err, ApiError::MissingData { .. }));
}

#[tokio::test]
async fn server_error_without_envelope_is_rejected() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::raw(502, "Bad Gateway"))
        .await;

    let client = api_client(&backend.base_url(), Some("t"));
    let err = client.list_blood_groups().await.unwrap_err();

    assert!(matches!(err, ApiError::Rejected { status: 502, .. }));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = api_client(&format!("http://{}/api", addr), None);
    let err = client.list_blood_groups().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
}

#[tokio::test]
async fn cancel_appointment_sends_delete() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::raw(204, "")).await;

    let client = api_client(&backend.base_url(), Some("t"));
    client
        .cancel_appointment(&EntityId::new("apt-9"))
        .await
        .unwrap();

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/api/donation-appointments/apt-9");
}

#[tokio::test]
async fn reference_lists_decode() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::envelope(serde_json::json!([
            { "id": 1, "name": "Platelets", "shelfLifeDays": 5 },
            { "id": 2, "name": "Plasma" }
        ])))
        .await;
    backend
        .enqueue_response(MockResponse::page(
            serde_json::json!([{ "id": "d1", "title": "Who can donate?", "category": "faq" }]),
            1,
            20,
            1,
        ))
        .await;

    let client = api_client(&backend.base_url(), None);
    let components = client.list_component_types().await.unwrap();
    assert_eq!(components[0].shelf_life_days, Some(5));
    assert_eq!(components[1].shelf_life_days, None);

    let documents = client.list_documents(&PageQuery::page(1, 20)).await.unwrap();
    assert_eq!(documents.items[0].title, "Who can donate?");
    assert_eq!(documents.items[0].category.as_deref(), Some("faq"));

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].path, "/api/component-types");
    assert_eq!(requests[1].path, "/api/documents");
}

#[tokio::test]
async fn entity_ids_cannot_escape_their_collection() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::raw(204, "")).await;

    let client = api_client(&backend.base_url(), Some("t"));
    client
        .mark_notification_read(&EntityId::new("../../admin/users/1?x=1"))
        .await
        .unwrap();

    let err = client
        .update_request_status(&EntityId::new(".."), RequestStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidUrl(_)));

    let requests = backend.captured_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].path,
        "/api/notifications/..%2F..%2Fadmin%2Fusers%2F1%3Fx=1/read"
    );
    assert!(requests[0].query.is_none());
}
