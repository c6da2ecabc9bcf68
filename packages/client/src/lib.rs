//! # BloodLink client SDK
//!
//! Client-side core for the BloodLink blood-donation coordination app:
//! the authenticated session, the realtime notification channel, and typed
//! access to the REST API.
//!
//! ## Architecture
//!
//! ```text
//! View layer (Dioxus app)
//!     │ observes watch channels, calls operations
//!     ▼
//! SessionService ──── pure transition() ──── SessionState
//!     │                                          │
//!     │ tokens                                   │ watch
//!     ▼                                          ▼
//! HttpClient ◄──────────────────────────── RealtimeService
//!     │  bearer + one refresh replay           │  socket + 20s poll
//!     ▼                                        ▼
//! BaseHttpBackend                        NotificationFeed / EventHub
//! ```
//!
//! Outcomes of session mutations are never thrown: they land in
//! [`session::SessionState`] plus one-shot toasts on the [`hub::EventHub`],
//! and callers observe state rather than awaiting errors.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod hub;
pub mod notifications;
pub mod realtime;
pub mod services;
pub mod session;
pub mod storage;
pub mod testing;
pub mod types;

pub use config::Config;
pub use error::ApiError;
pub use services::Services;
