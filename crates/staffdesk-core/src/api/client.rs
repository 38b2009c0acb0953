//! API client for the employee-management REST API.
//!
//! This module provides the `ApiClient` struct: the management endpoints on
//! top of the refresh-aware request pipeline, plus the auth service that
//! shares its credential store.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::pipeline::{BearerAuth, Pipeline};
use super::refresh::SessionRefresh;
use super::transport::{parse_base_url, HttpTransport, DEFAULT_TIMEOUT_SECS};
use super::{ApiError, ApiRequest};
use crate::auth::{AuthService, CredentialStore, Navigator, TokenEndpoint};
use crate::models::{
    Company, DashboardStats, Department, Employee, EmployeeStatus, EmployeeUpdate, NewEmployee,
    Page, UserAccount,
};

// ============================================================================
// Endpoints
// ============================================================================

const DASHBOARD_PATH: &str = "management/dashboard/";
const COMPANIES_PATH: &str = "management/companies/";
const DEPARTMENTS_PATH: &str = "management/departments/";
const EMPLOYEES_PATH: &str = "management/employees/";
const USER_ACCOUNTS_PATH: &str = "management/user-accounts/";

pub struct ApiClient {
    pipeline: Pipeline,
    auth: AuthService,
    refresh: Arc<SessionRefresh>,
}

impl ApiClient {
    /// Create a client with the default request timeout.
    pub fn new(
        base_url: &str,
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        Self::with_timeout(
            base_url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            store,
            navigator,
        )
    }

    pub fn with_timeout(
        base_url: &str,
        timeout: Duration,
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;
        let http = HttpTransport::build_client(timeout)?;
        let endpoint = TokenEndpoint::new(http.clone(), base_url.clone());

        let refresh = Arc::new(SessionRefresh::new(
            store.clone(),
            Arc::new(endpoint.clone()),
            navigator.clone(),
        ));
        let pipeline = Pipeline::new(Arc::new(HttpTransport::new(http, base_url)))
            .with_request_hook(Arc::new(BearerAuth::new(store.clone())))
            .with_response_hook(refresh.clone());

        Ok(Self {
            pipeline,
            auth: AuthService::new(endpoint, store, navigator),
            refresh,
        })
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        self.auth.store()
    }

    /// Whether a token refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.refresh.coordinator().is_refreshing()
    }

    /// Send a request through the pipeline and unwrap its envelope.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.pipeline.execute(request).await?.into_data()
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(ApiRequest::get(path)).await
    }

    async fn get_page<T: DeserializeOwned>(&self, path: &str, page: u32) -> Result<Page<T>, ApiError> {
        debug!(path, page, "Fetching page");
        self.request(ApiRequest::get(path).with_query("page", page.max(1)))
            .await
    }

    fn to_body<B: serde::Serialize>(body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body)
            .map_err(|e| ApiError::Validation(format!("Failed to encode request body: {}", e)))
    }

    // ===== Dashboard =====

    pub async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.get(DASHBOARD_PATH).await
    }

    // ===== Companies =====

    pub async fn companies(&self, page: u32) -> Result<Page<Company>, ApiError> {
        self.get_page(COMPANIES_PATH, page).await
    }

    pub async fn all_companies(&self) -> Result<Vec<Company>, ApiError> {
        let page: Page<Company> = self.get(&format!("{}all/", COMPANIES_PATH)).await?;
        Ok(page.results)
    }

    pub async fn company(&self, id: i64) -> Result<Company, ApiError> {
        self.get(&format!("{}{}/", COMPANIES_PATH, id)).await
    }

    // ===== Departments =====

    pub async fn departments(&self, page: u32) -> Result<Page<Department>, ApiError> {
        self.get_page(DEPARTMENTS_PATH, page).await
    }

    pub async fn all_departments(&self) -> Result<Vec<Department>, ApiError> {
        let page: Page<Department> = self.get(&format!("{}all/", DEPARTMENTS_PATH)).await?;
        Ok(page.results)
    }

    pub async fn department(&self, id: i64) -> Result<Department, ApiError> {
        self.get(&format!("{}{}/", DEPARTMENTS_PATH, id)).await
    }

    // ===== Employees =====

    pub async fn employees(&self, page: u32) -> Result<Page<Employee>, ApiError> {
        self.get_page(EMPLOYEES_PATH, page).await
    }

    pub async fn hired_employees(&self, page: u32) -> Result<Page<Employee>, ApiError> {
        self.get_page(&format!("{}hired/", EMPLOYEES_PATH), page)
            .await
    }

    pub async fn employee(&self, id: i64) -> Result<Employee, ApiError> {
        self.get(&format!("{}{}/", EMPLOYEES_PATH, id)).await
    }

    pub async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee, ApiError> {
        employee.validate()?;
        let path = format!("{}create/", EMPLOYEES_PATH);
        self.request(ApiRequest::post(path, Self::to_body(employee)?))
            .await
    }

    pub async fn update_employee(
        &self,
        id: i64,
        update: &EmployeeUpdate,
    ) -> Result<Employee, ApiError> {
        update.validate()?;
        let path = format!("{}update/{}/", EMPLOYEES_PATH, id);
        self.request(ApiRequest::patch(path, Self::to_body(update)?))
            .await
    }

    pub async fn delete_employee(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{}delete/{}/", EMPLOYEES_PATH, id);
        // 204 responses have no body at all
        let response = self.pipeline.execute(ApiRequest::delete(path)).await?;
        if response.body.is_null() {
            return Ok(());
        }
        response.into_data::<Value>().map(|_| ())
    }

    pub async fn set_employee_status(
        &self,
        id: i64,
        status: EmployeeStatus,
    ) -> Result<Employee, ApiError> {
        let path = format!("{}{}/status/", EMPLOYEES_PATH, id);
        let body = serde_json::json!({ "status": status.as_str() });
        self.request(ApiRequest::post(path, body)).await
    }

    // ===== User accounts =====

    pub async fn user_accounts(&self, page: u32) -> Result<Page<UserAccount>, ApiError> {
        self.get_page(USER_ACCOUNTS_PATH, page).await
    }
}
