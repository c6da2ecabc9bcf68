//! Session state bridged into the component tree.

mod context;

pub use context::{use_auth, AuthContext, AuthProvider};
