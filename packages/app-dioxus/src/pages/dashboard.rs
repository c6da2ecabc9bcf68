//! Dashboard page: open requests relevant to the signed-in user.

use client_core::types::{BloodRequest, RequestStatus, RequestUrgency};
use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::components::VerificationBanner;
use crate::routes::Route;
use crate::services;

#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();

    let mut requests = use_signal(Vec::<BloodRequest>::new);
    let mut is_loading = use_signal(|| true);

    use_effect(move || {
        spawn(async move {
            is_loading.set(true);
            match services()
                .requests
                .list(Some(RequestStatus::Open), None)
                .await
            {
                Ok(items) => requests.set(items),
                Err(e) => tracing::warn!(error = %e, "failed to load open requests"),
            }
            is_loading.set(false);
        });
    });

    let first_name = auth.user().map(|u| u.first_name).unwrap_or_default();
    let critical: Vec<BloodRequest> = requests()
        .into_iter()
        .filter(|r| r.urgency == RequestUrgency::Critical)
        .collect();

    rsx! {
        h1 { class: "text-2xl font-bold text-stone-900 mb-2", "Welcome, {first_name}" }
        p { class: "text-stone-500 text-sm mb-6", "Here's what needs attention right now." }

        VerificationBanner {}

        if !critical.is_empty() {
            div {
                class: "mb-6 p-4 bg-red-50 border border-red-200 rounded-lg",
                h2 { class: "text-sm font-semibold text-red-800 mb-2", "\u{26A0} Critical requests" }
                for request in critical {
                    CriticalRow { request: request }
                }
            }
        }

        h2 { class: "text-lg font-semibold text-stone-900 mb-3", "Open requests" }
        if is_loading() {
            div { class: "text-center py-12 text-stone-500", "Loading..." }
        } else if requests().is_empty() {
            div {
                class: "bg-white rounded-lg shadow-sm border border-stone-200 p-12 text-center",
                p { class: "text-stone-500", "No open requests right now." }
            }
        } else {
            div {
                class: "bg-white rounded-lg shadow-sm border border-stone-200 divide-y divide-stone-200",
                for request in requests() {
                    RequestSummary { request: request }
                }
            }
        }
    }
}

#[component]
fn CriticalRow(request: BloodRequest) -> Element {
    let blood = request.blood_type.label();
    rsx! {
        Link {
            to: Route::RequestDetail { id: request.id },
            class: "block text-sm text-red-800 hover:underline py-0.5",
            "{blood}: {request.units_needed} units at {request.hospital}"
        }
    }
}

#[component]
fn RequestSummary(request: BloodRequest) -> Element {
    let blood = request.blood_type.label();
    let urgency = request.urgency.label();
    rsx! {
        Link {
            to: Route::RequestDetail { id: request.id },
            class: "block p-4 hover:bg-stone-50",
            div {
                class: "flex items-center justify-between",
                div {
                    span { class: "font-semibold text-red-700 mr-3", "{blood}" }
                    span { class: "text-sm text-stone-900", "{request.hospital}" }
                }
                div {
                    class: "flex items-center gap-3 text-sm text-stone-500",
                    span { "{request.units_needed} units" }
                    span { class: "px-2 py-0.5 bg-stone-100 rounded text-xs", "{urgency}" }
                }
            }
        }
    }
}
