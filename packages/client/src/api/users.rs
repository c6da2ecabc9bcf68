//! User endpoints.

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{BloodType, Role, UpdateProfile, User};

#[derive(Clone)]
pub struct UsersApi {
    http: HttpClient,
}

impl UsersApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `PUT /users/me` — returns the full replacement user object.
    pub async fn update_me(&self, update: &UpdateProfile) -> Result<User, ApiError> {
        self.http.put("/users/me", update).await
    }

    /// `GET /users/:id`
    pub async fn get(&self, id: Uuid) -> Result<User, ApiError> {
        self.http.get(&format!("/users/{}", id)).await
    }

    /// `GET /users` with optional filters (admin).
    pub async fn list(&self, role: Option<Role>, verified: Option<bool>) -> Result<Vec<User>, ApiError> {
        let mut query = Vec::new();
        if let Some(role) = role {
            // serde gives us the wire encoding ("medical_admin" etc.)
            let encoded = serde_json::to_value(role)?;
            if let Some(s) = encoded.as_str() {
                query.push(format!("role={}", s));
            }
        }
        if let Some(verified) = verified {
            query.push(format!("verified={}", verified));
        }
        let path = if query.is_empty() {
            "/users".to_string()
        } else {
            format!("/users?{}", query.join("&"))
        };
        self.http.get(&path).await
    }

    /// `GET /users/donors?bloodType=…` — donors whose blood is compatible
    /// with the given recipient type. Matching is computed server-side.
    pub async fn compatible_donors(&self, blood_type: BloodType) -> Result<Vec<User>, ApiError> {
        // '+' must not read as a space in the query string
        let encoded = blood_type.label().replace('+', "%2B");
        self.http
            .get(&format!("/users/donors?bloodType={}", encoded))
            .await
    }
}
