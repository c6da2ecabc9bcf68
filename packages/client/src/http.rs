//! HTTP client wrapper.
//!
//! Injects the current access token into every request and performs at most
//! one refresh-and-replay per request, governed by an explicit refresh
//! budget parameter. A second 401 on the replayed request is fatal for the
//! session: tokens are cleared and a `SessionExpired` signal is broadcast
//! for the session service to act on.
//!
//! Transport-class failures (timeout, offline, 5xx, 403, 404, other 4xx)
//! surface exactly one toast here and are never retried automatically.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use crate::error::ApiError;
use crate::hub::{EventHub, ToastLevel};
use crate::storage::BaseTokenStore;
use crate::types::{RefreshResponse, TokenPair};

/// Refresh attempts allowed per request. One, per the session contract.
pub const DEFAULT_REFRESH_BUDGET: u8 = 1;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Signals the HTTP layer raises for the session service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSignal {
    /// Refresh failed or the replayed request was rejected again; tokens
    /// have already been cleared.
    SessionExpired,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

/// Transport seam. The production impl is [`ReqwestBackend`]; tests inject
/// a scripted mock.
#[async_trait]
pub trait BaseHttpBackend: Send + Sync {
    /// Execute a request. Returns `Ok` for every HTTP status the server
    /// produced; `Err` only for transport failures.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BaseHttpBackend for ReqwestBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut req = self.client.request(request.method, &request.url);

        if let Some(token) = &request.bearer {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Network(e)
            }
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(ApiError::Network)?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        Ok(HttpResponse { status, body })
    }
}

/// Bearer-injecting HTTP client with single-refresh replay.
///
/// Cloneable; clones share the token cache and store.
#[derive(Clone)]
pub struct HttpClient {
    backend: Arc<dyn BaseHttpBackend>,
    base_url: String,
    tokens: Arc<RwLock<Option<TokenPair>>>,
    store: Arc<dyn BaseTokenStore>,
    hub: EventHub,
    auth_signals: broadcast::Sender<AuthSignal>,
}

impl HttpClient {
    pub fn new(
        backend: Arc<dyn BaseHttpBackend>,
        base_url: impl Into<String>,
        store: Arc<dyn BaseTokenStore>,
        hub: EventHub,
    ) -> Self {
        Self {
            backend,
            base_url: base_url.into(),
            tokens: Arc::new(RwLock::new(None)),
            store,
            hub,
            auth_signals: broadcast::channel(8).0,
        }
    }

    pub fn subscribe_auth_signals(&self) -> broadcast::Receiver<AuthSignal> {
        self.auth_signals.subscribe()
    }

    /// Read the persisted token pair into the in-memory cache.
    /// Returns true when a pair was found.
    pub async fn load_persisted(&self) -> anyhow::Result<bool> {
        let loaded = self.store.load().await?;
        let found = loaded.is_some();
        *self.tokens.write().await = loaded;
        Ok(found)
    }

    /// Replace the token pair in memory and on disk.
    pub async fn set_tokens(&self, pair: TokenPair) {
        if let Err(e) = self.store.save(&pair).await {
            tracing::warn!(error = %e, "failed to persist tokens");
        }
        *self.tokens.write().await = Some(pair);
    }

    /// Drop the token pair from memory and disk.
    pub async fn clear_tokens(&self) {
        *self.tokens.write().await = None;
        if let Err(e) = self.store.clear().await {
            tracing::warn!(error = %e, "failed to clear persisted tokens");
        }
    }

    pub async fn current_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.token.clone())
    }

    async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.refresh_token.clone())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(Method::GET, path, None, false).await
    }

    /// GET without the error toast — for background polling, where failures
    /// degrade silently.
    pub async fn get_quiet<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(Method::GET, path, None, true).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request_json(Method::POST, path, Some(body), false).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request_json(Method::PUT, path, Some(body), false).await
    }

    /// POST where the response body is irrelevant.
    pub async fn post_unit(&self, path: &str) -> Result<(), ApiError> {
        self.request_raw(Method::POST, path, None, false, DEFAULT_REFRESH_BUDGET)
            .await
            .map(|_| ())
    }

    /// Quiet POST for best-effort background calls (REST fallback of the
    /// socket emits).
    pub async fn post_unit_quiet(&self, path: &str) -> Result<(), ApiError> {
        self.request_raw(Method::POST, path, None, true, DEFAULT_REFRESH_BUDGET)
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request_raw(Method::DELETE, path, None, false, DEFAULT_REFRESH_BUDGET)
            .await
            .map(|_| ())
    }

    /// Fire a request with an explicit bearer, bypassing the token cache and
    /// the refresh path. Used by logout, which must work with the token that
    /// was current when the user clicked it.
    pub async fn post_unit_with_bearer(
        &self,
        path: &str,
        bearer: Option<String>,
    ) -> Result<(), ApiError> {
        let response = self
            .backend
            .send(HttpRequest {
                method: Method::POST,
                url: format!("{}{}", self.base_url, path),
                bearer,
                body: None,
            })
            .await?;
        match response.status {
            200..=299 => Ok(()),
            status => Err(ApiError::Api {
                status,
                message: extract_message(&response.body),
            }),
        }
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        quiet: bool,
    ) -> Result<T, ApiError> {
        let value = self
            .request_raw(method, path, body, quiet, DEFAULT_REFRESH_BUDGET)
            .await?;
        serde_json::from_value(value).map_err(ApiError::Decode)
    }

    /// Core request loop. `refresh_budget` is the number of refresh-and-
    /// replay cycles still allowed for this request; it is threaded
    /// explicitly rather than flagged on the request object.
    async fn request_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        quiet: bool,
        mut refresh_budget: u8,
    ) -> Result<Value, ApiError> {
        loop {
            let bearer = self.current_token().await;
            let had_bearer = bearer.is_some();

            let result = self
                .backend
                .send(HttpRequest {
                    method: method.clone(),
                    url: format!("{}{}", self.base_url, path),
                    bearer,
                    body: body.clone(),
                })
                .await;

            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    if !quiet {
                        self.hub.toast(ToastLevel::Error, e.user_message());
                    }
                    return Err(e);
                }
            };

            match response.status {
                200..=299 => return Ok(response.body),
                401 if had_bearer => {
                    if refresh_budget > 0 && self.refresh_token().await.is_some() {
                        refresh_budget -= 1;
                        if self.refresh().await.is_err() {
                            self.force_logout().await;
                            return Err(ApiError::SessionExpired);
                        }
                        continue;
                    }
                    // Replay was rejected too; the session is gone.
                    self.force_logout().await;
                    return Err(ApiError::SessionExpired);
                }
                // 401 without a token: a failed login/registration, not an
                // expired session. The session service owns the message.
                401 => return Err(ApiError::Unauthorized),
                status => {
                    let err = match status {
                        403 => ApiError::Forbidden,
                        404 => ApiError::NotFound,
                        500..=599 => ApiError::Server {
                            status,
                            message: extract_message(&response.body),
                        },
                        _ => ApiError::Api {
                            status,
                            message: extract_message(&response.body),
                        },
                    };
                    if !quiet {
                        self.hub.toast(ToastLevel::Error, err.user_message());
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Exchange the refresh token for a new pair.
    async fn refresh(&self) -> Result<(), ApiError> {
        let refresh_token = self.refresh_token().await.ok_or(ApiError::SessionExpired)?;

        let response = self
            .backend
            .send(HttpRequest {
                method: Method::POST,
                url: format!("{}/auth/refresh", self.base_url),
                bearer: None,
                body: Some(serde_json::json!({ "refreshToken": refresh_token })),
            })
            .await?;

        if !(200..=299).contains(&response.status) {
            tracing::info!(status = response.status, "token refresh rejected");
            return Err(ApiError::SessionExpired);
        }

        let parsed: RefreshResponse =
            serde_json::from_value(response.body).map_err(ApiError::Decode)?;
        self.set_tokens(TokenPair {
            token: parsed.token,
            refresh_token: parsed.refresh_token,
        })
        .await;
        Ok(())
    }

    async fn force_logout(&self) {
        self.clear_tokens().await;
        let _ = self.auth_signals.send(AuthSignal::SessionExpired);
    }
}

fn extract_message(body: &Value) -> String {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(|v| v.as_str())
        .unwrap_or("Request failed")
        .to_string()
}
