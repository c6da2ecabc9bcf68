//! Blood request endpoints.

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{BloodRequest, NewBloodRequest, RequestStatus, RequestUrgency, User};

#[derive(Clone)]
pub struct RequestsApi {
    http: HttpClient,
}

impl RequestsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `GET /requests` with optional status/urgency filters.
    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        urgency: Option<RequestUrgency>,
    ) -> Result<Vec<BloodRequest>, ApiError> {
        let mut query = Vec::new();
        if let Some(status) = status {
            if let Some(s) = serde_json::to_value(status)?.as_str() {
                query.push(format!("status={}", s));
            }
        }
        if let Some(urgency) = urgency {
            if let Some(s) = serde_json::to_value(urgency)?.as_str() {
                query.push(format!("urgency={}", s));
            }
        }
        let path = if query.is_empty() {
            "/requests".to_string()
        } else {
            format!("/requests?{}", query.join("&"))
        };
        self.http.get(&path).await
    }

    /// `GET /requests/:id`
    pub async fn get(&self, id: Uuid) -> Result<BloodRequest, ApiError> {
        self.http.get(&format!("/requests/{}", id)).await
    }

    /// `POST /requests`
    pub async fn create(&self, request: &NewBloodRequest) -> Result<BloodRequest, ApiError> {
        self.http.post("/requests", request).await
    }

    /// `PUT /requests/:id/status`
    pub async fn update_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<BloodRequest, ApiError> {
        self.http
            .put(
                &format!("/requests/{}/status", id),
                &serde_json::json!({ "status": status }),
            )
            .await
    }

    /// `GET /requests/:id/matches` — donors the backend matched to this
    /// request. The client renders these, nothing more.
    pub async fn matches(&self, id: Uuid) -> Result<Vec<User>, ApiError> {
        self.http.get(&format!("/requests/{}/matches", id)).await
    }
}
