//! Donation history page with the next-eligible-date hint.

use chrono::Utc;
use client_core::types::{next_eligible_donation, Donation, DonationStatus};
use dioxus::prelude::*;

use crate::services;

#[component]
pub fn Donations() -> Element {
    let mut donations = use_signal(Vec::<Donation>::new);
    let mut is_loading = use_signal(|| true);

    use_effect(move || {
        spawn(async move {
            is_loading.set(true);
            match services().donations.mine().await {
                Ok(items) => donations.set(items),
                Err(e) => tracing::warn!(error = %e, "failed to load donations"),
            }
            is_loading.set(false);
        });
    });

    // Whole-blood deferral: 56 days after the last completed donation.
    let eligibility = donations()
        .iter()
        .filter(|d| d.status == DonationStatus::Completed)
        .filter_map(|d| d.completed_at)
        .max()
        .map(next_eligible_donation);

    rsx! {
        h1 { class: "text-2xl font-bold text-stone-900 mb-6", "My donations" }

        if let Some(next) = eligibility {
            if next > Utc::now() {
                {
                    let date = next.format("%B %e, %Y").to_string();
                    rsx! {
                        div {
                            class: "mb-6 p-4 bg-stone-100 border border-stone-200 rounded-lg text-sm text-stone-700",
                            "You can donate whole blood again on "
                            span { class: "font-medium", "{date}" }
                            "."
                        }
                    }
                }
            } else {
                div {
                    class: "mb-6 p-4 bg-green-50 border border-green-200 rounded-lg text-sm text-green-800",
                    "You're eligible to donate again."
                }
            }
        }

        if is_loading() {
            div { class: "text-center py-12 text-stone-500", "Loading..." }
        } else if donations().is_empty() {
            div {
                class: "bg-white rounded-lg shadow-sm border border-stone-200 p-12 text-center",
                p { class: "text-stone-500", "No donations recorded yet." }
            }
        } else {
            div {
                class: "bg-white rounded-lg shadow-sm border border-stone-200 divide-y divide-stone-200",
                for donation in donations() {
                    HistoryRow { donation: donation }
                }
            }
        }
    }
}

#[component]
fn HistoryRow(donation: Donation) -> Element {
    let status = donation.status.label();
    let when = donation
        .completed_at
        .or(donation.scheduled_for)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "pending".to_string());

    rsx! {
        div {
            class: "p-4 flex items-center justify-between text-sm",
            div {
                span { class: "text-stone-900 font-medium mr-3", "{donation.units} units" }
                span { class: "text-stone-500", "{when}" }
            }
            span { class: "px-2 py-0.5 bg-stone-100 rounded text-xs text-stone-600", "{status}" }
        }
    }
}
