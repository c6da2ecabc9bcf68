//! Type definitions for BloodLink API payloads
//!
//! These mirror the JSON contract of the REST/WebSocket backend. Field names
//! are camelCase on the wire; enums carry their backend string encodings.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Roles & Verification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Donor,
    Recipient,
    MedicalAdmin,
    SystemAdmin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Donor => "Donor",
            Role::Recipient => "Recipient",
            Role::MedicalAdmin => "Medical Admin",
            Role::SystemAdmin => "System Admin",
        }
    }

    /// Admin roles land on the admin home after login and may enter /admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::MedicalAdmin | Role::SystemAdmin)
    }
}

// ============================================================================
// Blood Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub fn label(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }

    pub fn variants() -> &'static [BloodType] {
        &[
            BloodType::APositive,
            BloodType::ANegative,
            BloodType::BPositive,
            BloodType::BNegative,
            BloodType::AbPositive,
            BloodType::AbNegative,
            BloodType::OPositive,
            BloodType::ONegative,
        ]
    }

    /// Donor blood types a recipient of this type can accept.
    ///
    /// Render-side helper only; actual donor matching is computed by the
    /// backend. Standard ABO/Rh whole-blood compatibility.
    pub fn can_receive_from(&self) -> &'static [BloodType] {
        use BloodType::*;
        match self {
            APositive => &[APositive, ANegative, OPositive, ONegative],
            ANegative => &[ANegative, ONegative],
            BPositive => &[BPositive, BNegative, OPositive, ONegative],
            BNegative => &[BNegative, ONegative],
            AbPositive => &[
                APositive, ANegative, BPositive, BNegative, AbPositive, AbNegative, OPositive,
                ONegative,
            ],
            AbNegative => &[ANegative, BNegative, AbNegative, ONegative],
            OPositive => &[OPositive, ONegative],
            ONegative => &[ONegative],
        }
    }
}

/// Minimum interval between whole-blood donations.
pub const DONATION_DEFERRAL_DAYS: i64 = 56;

/// Earliest date a donor may give whole blood again.
pub fn next_eligible_donation(last_donation: DateTime<Utc>) -> DateTime<Utc> {
    last_donation + Duration::days(DONATION_DEFERRAL_DAYS)
}

// ============================================================================
// Users & Auth
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub blood_type: Option<BloodType>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub medical_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// All three verification flags must hold.
    pub fn is_fully_verified(&self) -> bool {
        self.email_verified && self.phone_verified && self.medical_verified
    }
}

/// Token pair persisted to durable storage.
///
/// The access token rides on every request; the refresh token is spent at
/// most once per failed request to mint a new pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<BloodType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Shallow profile overwrite; unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<BloodType>,
}

/// `POST /auth/login` and `POST /auth/register` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// `POST /auth/refresh` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    pub refresh_token: String,
}

/// `GET /auth/me` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    /// Backend-owned discriminator, e.g. "request_match" or "donation_reminder".
    pub kind: String,
    pub priority: NotificationPriority,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// `GET /notifications?page&limit` response — the polling fallback payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub unread_count: u32,
}

// ============================================================================
// Blood Requests
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestUrgency {
    Routine,
    Urgent,
    Critical,
}

impl RequestUrgency {
    pub fn label(&self) -> &'static str {
        match self {
            RequestUrgency::Routine => "Routine",
            RequestUrgency::Urgent => "Urgent",
            RequestUrgency::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Open,
    Matched,
    Fulfilled,
    Cancelled,
}

impl RequestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Open => "Open",
            RequestStatus::Matched => "Matched",
            RequestStatus::Fulfilled => "Fulfilled",
            RequestStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub blood_type: BloodType,
    pub units_needed: u32,
    pub urgency: RequestUrgency,
    pub status: RequestStatus,
    pub hospital: String,
    pub city: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBloodRequest {
    pub blood_type: BloodType,
    pub units_needed: u32,
    pub urgency: RequestUrgency,
    pub hospital: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ============================================================================
// Donations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl DonationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DonationStatus::Scheduled => "Scheduled",
            DonationStatus::Completed => "Completed",
            DonationStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub request_id: Option<Uuid>,
    pub units: u32,
    pub status: DonationStatus,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    pub units: u32,
    pub scheduled_for: DateTime<Utc>,
}

// ============================================================================
// Admin Reporting
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_donors: u64,
    pub open_requests: u64,
    pub critical_requests: u64,
    pub donations_this_month: u64,
    pub units_collected_this_month: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodStockLevel {
    pub blood_type: BloodType,
    pub units_available: u32,
    pub units_reserved: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<Uuid>,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_encoding_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::MedicalAdmin).unwrap(),
            "\"medical_admin\""
        );
        let role: Role = serde_json::from_str("\"system_admin\"").unwrap();
        assert_eq!(role, Role::SystemAdmin);
    }

    #[test]
    fn blood_type_wire_encoding() {
        assert_eq!(serde_json::to_string(&BloodType::AbPositive).unwrap(), "\"AB+\"");
        let bt: BloodType = serde_json::from_str("\"O-\"").unwrap();
        assert_eq!(bt, BloodType::ONegative);
    }

    #[test]
    fn o_negative_is_universal_donor() {
        for bt in BloodType::variants() {
            assert!(bt.can_receive_from().contains(&BloodType::ONegative));
        }
    }

    #[test]
    fn ab_positive_is_universal_recipient() {
        assert_eq!(BloodType::AbPositive.can_receive_from().len(), 8);
    }

    #[test]
    fn deferral_window_is_56_days() {
        let last = Utc::now();
        let next = next_eligible_donation(last);
        assert_eq!((next - last).num_days(), 56);
    }

    #[test]
    fn token_pair_uses_storage_key_names() {
        let pair = TokenPair {
            token: "a".to_string(),
            refresh_token: "r".to_string(),
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert!(json.get("token").is_some());
        assert!(json.get("refreshToken").is_some());
    }
}
