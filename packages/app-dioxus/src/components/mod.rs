//! Shared UI components

mod banner;
mod layout;
mod loading;
mod nav;
mod toast;

pub use banner::VerificationBanner;
pub use layout::{RequireAdmin, RequireAuth, Shell};
pub use loading::LoadingSpinner;
pub use nav::{AdminNav, NavBar};
pub use toast::ToastHost;
