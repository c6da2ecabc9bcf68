//! Donation endpoints.

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{Donation, NewDonation};

#[derive(Clone)]
pub struct DonationsApi {
    http: HttpClient,
}

impl DonationsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `GET /donations/mine`
    pub async fn mine(&self) -> Result<Vec<Donation>, ApiError> {
        self.http.get("/donations/mine").await
    }

    /// `GET /requests/:id/donations`
    pub async fn for_request(&self, request_id: Uuid) -> Result<Vec<Donation>, ApiError> {
        self.http
            .get(&format!("/requests/{}/donations", request_id))
            .await
    }

    /// `POST /donations` — schedule a donation, optionally pledged to a
    /// specific request.
    pub async fn record(&self, donation: &NewDonation) -> Result<Donation, ApiError> {
        self.http.post("/donations", donation).await
    }

    /// `POST /donations/:id/complete`
    pub async fn complete(&self, id: Uuid) -> Result<Donation, ApiError> {
        self.http
            .post(&format!("/donations/{}/complete", id), &serde_json::json!({}))
            .await
    }
}
