//! Verification banner shown to users who cannot act on requests yet.

use dioxus::prelude::*;

use crate::auth::use_auth;

#[component]
pub fn VerificationBanner() -> Element {
    let auth = use_auth();

    let Some(user) = auth.user() else {
        return rsx! {};
    };
    if user.is_fully_verified() {
        return rsx! {};
    }

    let mut missing = Vec::new();
    if !user.email_verified {
        missing.push("email");
    }
    if !user.phone_verified {
        missing.push("phone");
    }
    if !user.medical_verified {
        missing.push("medical screening");
    }
    let missing_list = missing.join(", ");

    rsx! {
        div {
            class: "mb-6 p-4 bg-amber-50 border border-amber-200 text-amber-800 rounded-lg text-sm",
            strong { "Verification pending: " }
            "complete your "
            span { class: "font-medium", "{missing_list}" }
            " verification to respond to blood requests."
        }
    }
}
