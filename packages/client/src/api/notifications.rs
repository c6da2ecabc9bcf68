//! Notification endpoints — the polling fallback and the REST side of
//! mark-read when the socket is down.

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::NotificationPage;

#[derive(Clone)]
pub struct NotificationsApi {
    http: HttpClient,
}

impl NotificationsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `GET /notifications?page&limit`. Quiet: poll failures degrade
    /// silently rather than toasting every interval.
    pub async fn page(&self, page: u32, limit: u32) -> Result<NotificationPage, ApiError> {
        self.http
            .get_quiet(&format!("/notifications?page={}&limit={}", page, limit))
            .await
    }

    /// `POST /notifications/:id/read`, best-effort.
    pub async fn mark_read(&self, id: Uuid) -> Result<(), ApiError> {
        self.http
            .post_unit_quiet(&format!("/notifications/{}/read", id))
            .await
    }

    /// `POST /notifications/read-all`, best-effort.
    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.http.post_unit_quiet("/notifications/read-all").await
    }
}
