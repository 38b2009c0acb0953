//! End-to-end tests for login, bearer stamping and token refresh against a
//! mock API server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use staffdesk_core::api::{ApiClient, ApiError};
use staffdesk_core::auth::{CredentialStore, Navigator, Session, ENTRY_PATH};
use staffdesk_core::models::NewEmployee;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_string());
    }
}

struct Fixture {
    client: ApiClient,
    store: Arc<CredentialStore>,
    navigator: Arc<RecordingNavigator>,
}

fn fixture(server: &MockServer) -> Fixture {
    let store = Arc::new(CredentialStore::in_memory());
    let navigator = Arc::new(RecordingNavigator::default());
    let client = ApiClient::new(
        &format!("{}/api/v1", server.uri()),
        store.clone(),
        navigator.clone(),
    )
    .unwrap();
    Fixture {
        client,
        store,
        navigator,
    }
}

fn envelope(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "message": "ok",
        "data": data,
        "errors": null
    }))
}

fn dashboard() -> serde_json::Value {
    json!({"total_companies": 2, "total_departments": 5, "total_employees": 40})
}

fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({
        "detail": "Given token not valid for any token type",
        "code": "token_not_valid"
    }))
}

#[tokio::test]
async fn test_login_stores_tokens_and_stamps_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/"))
        .and(body_json(json!({"email": "ada@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "A1",
            "refresh": "R1",
            "name": "Ada",
            "role": "admin",
            "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/management/dashboard/"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(envelope(dashboard()))
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server);
    let result = f.client.auth().login("ada@example.com", "secret").await;
    assert!(result.success);
    assert_eq!(result.data.as_ref().unwrap().access, "A1");

    assert_eq!(
        f.store.session(),
        Session {
            access_token: Some("A1".to_string()),
            refresh_token: Some("R1".to_string()),
            user_name: Some("Ada".to_string()),
            user_role: Some("admin".to_string()),
        }
    );
    assert!(f.client.auth().is_authenticated());
    assert_eq!(f.client.auth().user_role().as_deref(), Some("admin"));

    let stats = f.client.dashboard().await.unwrap();
    assert_eq!(stats.total_employees, 40);
}

#[tokio::test]
async fn test_login_failure_returns_server_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    let f = fixture(&server);
    let result = f.client.auth().login("ada@example.com", "wrong").await;
    assert!(!result.success);
    assert!(result.data.is_none());
    assert_eq!(
        result.errors.unwrap()["detail"],
        "No active account found with the given credentials"
    );
    assert!(!f.client.auth().is_authenticated());
    assert!(f.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_request_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/management/dashboard/"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/management/dashboard/"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(envelope(dashboard()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server);
    f.store.set_tokens("A1", "R1");

    let stats = f.client.dashboard().await.unwrap();
    assert_eq!(stats.total_companies, 2);
    assert_eq!(f.store.access_token().as_deref(), Some("A2"));
    assert_eq!(f.store.refresh_token().as_deref(), Some("R1"));
    assert!(f.navigator.visits().is_empty());
    assert!(!f.client.is_refreshing());
}

#[tokio::test]
async fn test_rotated_refresh_token_replaces_old_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/management/companies/"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/management/companies/"))
        .and(query_param("page", "1"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(envelope(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{"id": 1, "name": "Acme", "number_of_department": 2, "number_of_employee": 9}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "A2", "refresh": "R2"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server);
    f.store.set_tokens("A1", "R1");

    let page = f.client.companies(1).await.unwrap();
    assert_eq!(page.results[0].name, "Acme");
    assert_eq!(f.store.refresh_token().as_deref(), Some("R2"));
}

#[tokio::test]
async fn test_concurrent_401s_trigger_a_single_refresh() {
    let server = MockServer::start().await;
    for route in ["/api/v1/management/dashboard/", "/api/v1/management/employees/1/"] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("Authorization", "Bearer A1"))
            .respond_with(unauthorized())
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/v1/management/dashboard/"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(envelope(dashboard()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/management/employees/1/"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(envelope(json!({
            "id": 1,
            "company": 1,
            "department": 1,
            "status": "hired",
            "employee_name": "Grace",
            "employee_email": "grace@example.com",
            "phone_number": "+15551234567",
            "address": "1 Navy Way",
            "designation": "Engineer",
            "hired_date": null,
            "day_employee": 0
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "A2"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server);
    f.store.set_tokens("A1", "R1");

    let (stats, employee) = tokio::join!(f.client.dashboard(), f.client.employee(1));
    assert_eq!(stats.unwrap().total_departments, 5);
    assert_eq!(employee.unwrap().display_name(), "Grace");
    assert_eq!(f.store.access_token().as_deref(), Some("A2"));
    assert!(!f.client.is_refreshing());
}

#[tokio::test]
async fn test_refresh_failure_clears_session_and_rejects_all() {
    let server = MockServer::start().await;
    for route in ["/api/v1/management/dashboard/", "/api/v1/management/departments/"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(unauthorized())
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Token is invalid or expired", "code": "token_not_valid"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server);
    f.store.set_tokens("A1", "R1");
    f.store.set_user_info("Ada", "manager");

    let (stats, departments) = tokio::join!(f.client.dashboard(), f.client.departments(1));
    for err in [stats.unwrap_err(), departments.unwrap_err()] {
        match err {
            ApiError::Rejected { errors, .. } => {
                assert_eq!(errors.unwrap()["code"], "token_not_valid")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(f.store.session(), Session::default());
    assert_eq!(f.navigator.visits(), vec![ENTRY_PATH.to_string()]);
}

#[tokio::test]
async fn test_explicit_refresh_and_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server);
    f.store.set_tokens("A1", "R1");
    f.store.set_user_info("Ada", "manager");

    let result = f.client.auth().refresh_token().await;
    assert!(result.success);
    let pair = result.data.unwrap();
    assert_eq!((pair.access.as_str(), pair.refresh.as_str()), ("A2", "R1"));

    f.client.auth().logout();
    assert_eq!(f.store.session(), Session::default());
    assert!(!f.client.auth().is_authenticated());
    assert_eq!(f.client.auth().user_name(), None);
    assert_eq!(f.navigator.visits(), vec![ENTRY_PATH.to_string()]);
}

#[tokio::test]
async fn test_rejected_create_surfaces_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/management/employees/create/"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "Failed to create employee",
            "data": null,
            "errors": {"department": ["The department must belong to the specified company."]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server);
    f.store.set_tokens("A1", "R1");

    let employee = NewEmployee {
        employee_name: "Grace".to_string(),
        employee_email: "grace@example.com".to_string(),
        phone_number: "+15551234567".to_string(),
        address: "1 Navy Way".to_string(),
        company: 1,
        department: 9,
        designation: "Engineer".to_string(),
    };
    match f.client.create_employee(&employee).await {
        Err(ApiError::Rejected { message, errors }) => {
            assert_eq!(message, "Failed to create employee");
            assert!(errors.unwrap()["department"].is_array());
        }
        other => panic!("unexpected: {other:?}"),
    }
    // the session survives a validation failure
    assert!(f.client.auth().is_authenticated());
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/management/employees/delete/3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server);
    f.store.set_tokens("A1", "R1");
    f.client.delete_employee(3).await.unwrap();
}
