//! Thin typed clients for the BloodLink REST API.
//!
//! Each resource gets a small wrapper over the shared [`HttpClient`]; all
//! retry/refresh/toast behavior lives there, not here.

pub mod auth;
pub mod donations;
pub mod notifications;
pub mod reports;
pub mod requests;
pub mod users;

pub use auth::AuthApi;
pub use donations::DonationsApi;
pub use notifications::NotificationsApi;
pub use reports::ReportsApi;
pub use requests::RequestsApi;
pub use users::UsersApi;
