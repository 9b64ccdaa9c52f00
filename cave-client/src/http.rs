//! HTTP client for the cave-server API

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::client::{
    AskCaveRequest, AskCaveResponse, LoginRequest, LoginResponse, PurchaseSnapshot,
    VerifyTokenResponse,
};
use shared::error::ApiResponse;
use shared::models::{Member, Product, PurchaseCreate, PurchaseDetail};

use crate::session::Session;
use crate::{ClientConfig, ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct CaveClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl CaveClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token.or(self.token.as_deref()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ClientResult<T> {
        let request = self.authorized(self.client.get(self.url(path)).query(query), None);
        Self::handle_response(request.send().await?).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorized(self.client.post(self.url(path)).json(body), None);
        Self::handle_response(request.send().await?).await
    }

    /// Extract the server message from an error envelope, or fall back to the raw text
    fn error_message(text: &str) -> String {
        serde_json::from_str::<ApiResponse>(text)
            .map(|r| r.message)
            .unwrap_or_else(|_| text.to_string())
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let message = Self::error_message(&response.text().await?);
            tracing::debug!(status = %status, message = %message, "Request failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
                StatusCode::FORBIDDEN => ClientError::Forbidden(message),
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::CONFLICT => ClientError::Conflict(message),
                StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited(message),
                StatusCode::BAD_REQUEST => ClientError::Validation(message),
                _ => ClientError::Internal(message),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    // ========== Auth API ==========

    /// Login and keep the returned token on this client
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/api/login", &request).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    /// Ask the server whether a token is still valid
    pub async fn verify_token(&self, token: &str) -> ClientResult<VerifyTokenResponse> {
        let request = self.authorized(self.client.post(self.url("/api/verify-token")), Some(token));
        Self::handle_response(request.send().await?).await
    }

    /// Validate a session, contacting the server only when due (or forced)
    ///
    /// Returns `false` when the session must be discarded: the token expired
    /// locally or the server rejected it. Network failures keep the session.
    pub async fn check_session(&self, session: &mut Session, force: bool) -> bool {
        self.check_session_at(session, force, shared::util::now_millis())
            .await
    }

    pub async fn check_session_at(&self, session: &mut Session, force: bool, now: i64) -> bool {
        if session.is_expired(now) {
            tracing::info!("Session expired");
            return false;
        }
        if !force && !session.needs_revalidation(now) {
            return true;
        }

        match self.verify_token(&session.token).await {
            Ok(response) if response.valid => {
                session.claims = response.user;
                session.mark_validated(now);
                true
            }
            Ok(_) | Err(ClientError::Unauthorized) => {
                tracing::info!("Session rejected by server");
                false
            }
            Err(e) if e.is_network() => {
                tracing::warn!(error = %e, "Server unreachable, keeping local session");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed, keeping local session");
                true
            }
        }
    }

    pub async fn me(&self) -> ClientResult<Member> {
        self.get("/api/users/me", &[]).await
    }

    // ========== Catalog & history ==========

    pub async fn list_products(&self, category: Option<&str>) -> ClientResult<Vec<Product>> {
        let query: Vec<(&str, String)> = category
            .map(|c| vec![("category", c.to_string())])
            .unwrap_or_default();
        self.get("/api/products", &query).await
    }

    pub async fn list_purchases(&self, user_id: Option<i64>) -> ClientResult<Vec<PurchaseDetail>> {
        let query: Vec<(&str, String)> = user_id
            .map(|id| vec![("user_id", id.to_string())])
            .unwrap_or_default();
        self.get("/api/purchases", &query).await
    }

    pub async fn create_purchase(
        &self,
        product_id: i64,
        price: Option<f64>,
    ) -> ClientResult<PurchaseDetail> {
        self.post("/api/purchases", &PurchaseCreate { product_id, price })
            .await
    }

    // ========== Ask the Cave ==========

    /// Request a suggestion; `purchases` overrides the stored history when given
    pub async fn ask_cave(
        &self,
        product_id: i64,
        purchases: Option<Vec<PurchaseSnapshot>>,
    ) -> ClientResult<AskCaveResponse> {
        self.post(
            "/api/ask-cave",
            &AskCaveRequest {
                product_id,
                purchases,
            },
        )
        .await
    }
}
