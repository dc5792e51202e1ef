//! API client for communicating with the CRM REST API.
//!
//! This module provides the `ApiClient` struct. [`ApiClient::call`] performs
//! one authenticated request/response cycle and classifies the outcome; the
//! typed methods (`fetch_customers`, `create_deal`, ...) are thin wrappers
//! that decode the payload of a `call` into the models.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{Navigator, Session, SessionStore};
use crate::config::Config;
use crate::models::{
    Contact, ContactUpdate, Customer, CustomerUpdate, Dashboard, Deal, DealUpdate,
    LoginResponse, MessageResponse, NewContact, NewCustomer, NewDeal, NewTask, RelatedOption,
    RelatedType, Task, TaskUpdate, UserProfile,
};

use super::transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Message used when a failed response carries no `error` text
const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

const LOGIN_ERROR_MESSAGE: &str = "Login failed";

const REGISTER_ERROR_MESSAGE: &str = "Registration failed";

const LOGIN_ENDPOINT: &str = "auth/login";
const REGISTER_ENDPOINT: &str = "auth/register";
const USER_ENDPOINT: &str = "auth/user";
const CUSTOMERS_ENDPOINT: &str = "customers";
const CONTACTS_ENDPOINT: &str = "contacts";
const DEALS_ENDPOINT: &str = "deals";
const TASKS_ENDPOINT: &str = "tasks";
const DASHBOARD_ENDPOINT: &str = "dashboard";

/// One call against the API, built fresh for every request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Path relative to the API base, e.g. `customers` or `deals/4`
    pub endpoint: String,
    pub method: Method,
    /// Only sent for `POST` and `PUT`
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint, None)
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, endpoint, Some(body))
    }

    pub fn put(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, endpoint, Some(body))
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint, None)
    }

    /// Build a request whose body is the JSON encoding of `body`
    pub fn with_json<B: Serialize>(
        method: Method,
        endpoint: impl Into<String>,
        body: &B,
    ) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode request body: {}", e)))?;
        Ok(Self::new(method, endpoint, Some(body)))
    }
}

/// API client for the CRM backend.
/// Clone is cheap - the transport, session store and navigator are shared.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            session,
            navigator,
        }
    }

    /// Create a client talking HTTP to the configured backend
    pub fn from_config(
        config: &Config,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> anyhow::Result<Self> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let transport = ReqwestTransport::new(timeout)?;
        Ok(Self::new(config.base_url(), Arc::new(transport), session, navigator))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    // ===== Request cycle =====

    /// Perform one authenticated request.
    ///
    /// Without a stored credential nothing is sent: the user is redirected to
    /// login and `Ok(None)` is returned. Otherwise the decoded JSON payload of
    /// a 2xx response is returned unmodified. A 401 clears the session and
    /// redirects to login before the failure is returned. There is no retry.
    pub async fn call(&self, request: ApiRequest) -> Result<Option<Value>, ApiError> {
        let Some(token) = self.session.current().credential else {
            debug!(endpoint = %request.endpoint, "No credential stored, redirecting to login");
            self.navigator.redirect_to_login();
            return Ok(None);
        };

        let ApiRequest {
            endpoint,
            method,
            body,
        } = request;

        let http = HttpRequest {
            method,
            url: self.url(&endpoint),
            bearer: Some(token),
            body: if method.carries_body() { body } else { None },
        };

        debug!(%method, endpoint = %endpoint, "Sending API request");
        let outcome = match self.transport.send(http).await {
            Ok(response) => Self::interpret(response, DEFAULT_ERROR_MESSAGE),
            Err(e) => Err(ApiError::Network(e.0)),
        };

        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(%method, endpoint = %endpoint, status = ?err.status(), error = %err, "API request failed");
                if err.is_auth_failure() {
                    self.end_session();
                }
                Err(err)
            }
        }
    }

    /// Decode a response body and classify it by status code
    fn interpret(response: HttpResponse, fallback: &str) -> Result<Value, ApiError> {
        let decoded = if response.body.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str::<Value>(&response.body)
        };

        if response.is_success() {
            decoded.map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON response: {}", e)))
        } else {
            Err(ApiError::from_status(response.status, decoded.ok().as_ref(), fallback))
        }
    }

    /// The credential was rejected: forget it and send the user to login
    fn end_session(&self) {
        info!("Credential rejected, ending session");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.navigator.redirect_to_login();
    }

    /// `call` and decode the payload into `T`
    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let endpoint = request.endpoint.clone();
        let value = self.call(request).await?.ok_or(ApiError::NotAuthenticated)?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("Unexpected response from {}: {}", endpoint, e)))
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(ApiRequest::with_json(method, endpoint, body)?).await
    }

    /// POST without a bearer token, for login and registration
    async fn post_public<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode request body: {}", e)))?;
        let http = HttpRequest {
            method: Method::Post,
            url: self.url(endpoint),
            bearer: None,
            body: Some(body),
        };

        let response = self
            .transport
            .send(http)
            .await
            .map_err(|e| ApiError::Network(e.0))?;
        Self::interpret(response, fallback)
    }

    // ===== Authentication =====

    /// Log in and store the returned token and user name as the session
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self
            .post_public(LOGIN_ENDPOINT, &body, LOGIN_ERROR_MESSAGE)
            .await
            .inspect_err(|e| warn!(error = %e, "Login failed"))?;

        let auth: LoginResponse = serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse login response: {}", e)))?;

        self.session
            .save(&auth.token, &auth.user.name)
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        info!(user_id = auth.user.id, "Login successful");
        Ok(auth.user)
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "name": name, "email": email, "password": password });
        let value = self
            .post_public(REGISTER_ENDPOINT, &body, REGISTER_ERROR_MESSAGE)
            .await?;
        // An empty 2xx body still means the account was created
        let response: MessageResponse = match value {
            Value::Null => MessageResponse::default(),
            value => serde_json::from_value(value).map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse register response: {}", e))
            })?,
        };
        info!("Registration successful");
        Ok(response.message)
    }

    /// Forget the session and go back to login
    pub fn logout(&self) -> anyhow::Result<()> {
        self.session.clear()?;
        info!("Logged out");
        self.navigator.redirect_to_login();
        Ok(())
    }

    /// Restore the session on start-up. Redirects to login when there is none.
    pub fn check_auth(&self) -> Option<Session> {
        let session = self.session.current();
        if session.is_authenticated() {
            Some(session)
        } else {
            self.navigator.redirect_to_login();
            None
        }
    }

    /// Profile of the logged-in user
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.fetch(ApiRequest::get(USER_ENDPOINT)).await
    }

    // ===== Customers =====

    pub async fn fetch_customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.fetch(ApiRequest::get(CUSTOMERS_ENDPOINT)).await
    }

    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, ApiError> {
        self.send_json(Method::Post, CUSTOMERS_ENDPOINT, customer).await
    }

    pub async fn update_customer(&self, id: i64, update: &CustomerUpdate) -> Result<Customer, ApiError> {
        self.send_json(Method::Put, &item(CUSTOMERS_ENDPOINT, id), update).await
    }

    pub async fn delete_customer(&self, id: i64) -> Result<String, ApiError> {
        self.delete(CUSTOMERS_ENDPOINT, id).await
    }

    // ===== Contacts =====

    pub async fn fetch_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        self.fetch(ApiRequest::get(CONTACTS_ENDPOINT)).await
    }

    pub async fn create_contact(&self, contact: &NewContact) -> Result<Contact, ApiError> {
        self.send_json(Method::Post, CONTACTS_ENDPOINT, contact).await
    }

    pub async fn update_contact(&self, id: i64, update: &ContactUpdate) -> Result<Contact, ApiError> {
        self.send_json(Method::Put, &item(CONTACTS_ENDPOINT, id), update).await
    }

    pub async fn delete_contact(&self, id: i64) -> Result<String, ApiError> {
        self.delete(CONTACTS_ENDPOINT, id).await
    }

    // ===== Deals =====

    pub async fn fetch_deals(&self) -> Result<Vec<Deal>, ApiError> {
        self.fetch(ApiRequest::get(DEALS_ENDPOINT)).await
    }

    pub async fn create_deal(&self, deal: &NewDeal) -> Result<Deal, ApiError> {
        self.send_json(Method::Post, DEALS_ENDPOINT, deal).await
    }

    pub async fn update_deal(&self, id: i64, update: &DealUpdate) -> Result<Deal, ApiError> {
        self.send_json(Method::Put, &item(DEALS_ENDPOINT, id), update).await
    }

    pub async fn delete_deal(&self, id: i64) -> Result<String, ApiError> {
        self.delete(DEALS_ENDPOINT, id).await
    }

    // ===== Tasks =====

    pub async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.fetch(ApiRequest::get(TASKS_ENDPOINT)).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.send_json(Method::Post, TASKS_ENDPOINT, task).await
    }

    pub async fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.send_json(Method::Put, &item(TASKS_ENDPOINT, id), update).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<String, ApiError> {
        self.delete(TASKS_ENDPOINT, id).await
    }

    /// Records a task can be attached to, labelled for a picker
    pub async fn related_options(&self, kind: RelatedType) -> Result<Vec<RelatedOption>, ApiError> {
        let options: Vec<RelatedOption> = match kind {
            RelatedType::Customer => self
                .fetch_customers()
                .await?
                .iter()
                .map(|c| RelatedOption { id: c.id, label: c.option_label() })
                .collect(),
            RelatedType::Contact => self
                .fetch_contacts()
                .await?
                .iter()
                .map(|c| RelatedOption { id: c.id, label: c.option_label() })
                .collect(),
            RelatedType::Deal => self
                .fetch_deals()
                .await?
                .iter()
                .map(|d| RelatedOption { id: d.id, label: d.option_label() })
                .collect(),
        };
        Ok(options)
    }

    // ===== Dashboard =====

    pub async fn fetch_dashboard(&self) -> Result<Dashboard, ApiError> {
        self.fetch(ApiRequest::get(DASHBOARD_ENDPOINT)).await
    }

    async fn delete(&self, collection: &str, id: i64) -> Result<String, ApiError> {
        let response: MessageResponse = self.fetch(ApiRequest::delete(item(collection, id))).await?;
        Ok(response.message)
    }
}

/// Item-scoped endpoint, e.g. `deals/4`
fn item(collection: &str, id: i64) -> String {
    format!("{}/{}", collection, id)
}
