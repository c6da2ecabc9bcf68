//! Admin reporting endpoints. Aggregation happens server-side; these calls
//! only fetch rendered results.

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{AuditEntry, BloodStockLevel, DashboardStats};

#[derive(Clone)]
pub struct ReportsApi {
    http: HttpClient,
}

impl ReportsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `GET /reports/dashboard`
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.http.get("/reports/dashboard").await
    }

    /// `GET /reports/blood-stock`
    pub async fn blood_stock(&self) -> Result<Vec<BloodStockLevel>, ApiError> {
        self.http.get("/reports/blood-stock").await
    }

    /// `GET /reports/audit?page&limit` — the audit trail, paged.
    pub async fn audit_log(&self, page: u32, limit: u32) -> Result<Vec<AuditEntry>, ApiError> {
        self.http
            .get(&format!("/reports/audit?page={}&limit={}", page, limit))
            .await
    }
}
