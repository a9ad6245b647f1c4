use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::models::{
    Advance, AdvanceInput, AttendanceInput, AttendanceToggleResult, AuthResponse,
    CreateUserInput, CreateWorkerInput, HiddenInput, LoginInput, Worker,
};
use crate::handlers::shared::ApiResponse;
use crate::payroll::EarningsSummary;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network, DNS, TLS or body decoding failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("API response carried no data")]
    EmptyResponse,

    #[error("Local store error: {0}")]
    Store(#[from] StoreError),
}

impl ClientError {
    /// True when the backend could not be reached or failed on its side.
    /// A 4xx rejection or an undecodable 2xx body is the backend's answer,
    /// not an outage.
    pub fn is_backend_unavailable(&self) -> bool {
        match self {
            ClientError::Request(e) => !e.is_decode(),
            ClientError::Api { status, .. } => *status >= 500,
            ClientError::EmptyResponse | ClientError::Store(_) => false,
        }
    }
}

/// Thin client for the `/api` routes. Cheap to clone; clones share the
/// bearer token.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// * `base_url` - server root, e.g. `http://127.0.0.1:8001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.authorized(self.client.get(self.url(path))).await;
        Self::parse_response(request.send().await?).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self
            .authorized(self.client.request(method, self.url(path)).json(body))
            .await;
        Self::parse_response(request.send().await?).await
    }

    pub async fn register(&self, input: &CreateUserInput) -> Result<AuthResponse, ClientError> {
        let response: AuthResponse = self
            .send_json(reqwest::Method::POST, "/auth/register", input)
            .await?;
        self.set_token(Some(response.access_token.clone())).await;
        Ok(response)
    }

    pub async fn login(&self, input: &LoginInput) -> Result<AuthResponse, ClientError> {
        let response: AuthResponse = self
            .send_json(reqwest::Method::POST, "/auth/login", input)
            .await?;
        self.set_token(Some(response.access_token.clone())).await;
        Ok(response)
    }

    pub async fn list_workers(&self) -> Result<Vec<Worker>, ClientError> {
        self.get("/workers").await
    }

    pub async fn create_worker(&self, input: &CreateWorkerInput) -> Result<Worker, ClientError> {
        self.send_json(reqwest::Method::POST, "/workers", input)
            .await
    }

    pub async fn set_hidden(&self, worker_id: &str, hidden: bool) -> Result<Worker, ClientError> {
        self.send_json(
            reqwest::Method::PUT,
            &format!("/workers/{}/hidden", worker_id),
            &HiddenInput { hidden },
        )
        .await
    }

    pub async fn toggle_attendance(
        &self,
        input: &AttendanceInput,
    ) -> Result<AttendanceToggleResult, ClientError> {
        self.send_json(reqwest::Method::POST, "/attendance/toggle", input)
            .await
    }

    pub async fn record_advance(&self, input: &AdvanceInput) -> Result<Advance, ClientError> {
        self.send_json(reqwest::Method::POST, "/advances", input)
            .await
    }

    pub async fn salary(
        &self,
        worker_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<EarningsSummary, ClientError> {
        self.get(&format!(
            "/salary/{}?date_from={}&date_to={}",
            worker_id, date_from, date_to
        ))
        .await
    }

    // ---- private helpers ----

    /// Unwraps the `{success, data, message}` envelope, turning non-2xx
    /// statuses into [`ClientError::Api`].
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse<T> = response.json().await?;
        envelope.data.ok_or(ClientError::EmptyResponse)
    }
}
