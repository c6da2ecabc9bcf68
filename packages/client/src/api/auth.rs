//! Authentication endpoints.

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{AuthResponse, LoginCredentials, MeResponse, NewUser, User};

#[derive(Clone)]
pub struct AuthApi {
    http: HttpClient,
}

impl AuthApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        self.http.post("/auth/login", credentials).await
    }

    /// `POST /auth/register` — provisions tokens directly; no separate
    /// login round trip.
    pub async fn register(&self, user: &NewUser) -> Result<AuthResponse, ApiError> {
        self.http.post("/auth/register", user).await
    }

    /// `GET /auth/me` — identity confirmation for silent session restore.
    pub async fn me(&self) -> Result<User, ApiError> {
        let response: MeResponse = self.http.get("/auth/me").await?;
        Ok(response.user)
    }

    /// `POST /auth/logout`, best-effort with the bearer captured at logout
    /// time. The local session is already gone when this runs.
    pub async fn logout_with(&self, bearer: Option<String>) -> Result<(), ApiError> {
        self.http.post_unit_with_bearer("/auth/logout", bearer).await
    }
}
