//! Admin audit trail, paged.

use client_core::types::AuditEntry;
use dioxus::prelude::*;

use crate::services;

const PAGE_SIZE: u32 = 25;

#[component]
pub fn AdminReports() -> Element {
    let mut entries = use_signal(Vec::<AuditEntry>::new);
    let mut is_loading = use_signal(|| true);
    let mut page = use_signal(|| 1u32);

    use_effect(move || {
        let current_page = page();
        spawn(async move {
            is_loading.set(true);
            match services().reports.audit_log(current_page, PAGE_SIZE).await {
                Ok(items) => entries.set(items),
                Err(e) => tracing::warn!(error = %e, "failed to load audit log"),
            }
            is_loading.set(false);
        });
    });

    rsx! {
        div {
            class: "max-w-5xl mx-auto p-6",
            h1 { class: "text-2xl font-bold text-stone-900 mb-6", "Audit trail" }

            if is_loading() {
                div { class: "text-center py-12 text-stone-500", "Loading..." }
            } else if entries().is_empty() {
                div {
                    class: "bg-white rounded-lg shadow-sm border border-stone-200 p-12 text-center",
                    p { class: "text-stone-500", "No audit entries on this page." }
                }
            } else {
                div {
                    class: "bg-white rounded-lg shadow-sm border border-stone-200 divide-y divide-stone-200",
                    for entry in entries() {
                        AuditRow { entry: entry }
                    }
                }
            }

            div {
                class: "flex items-center gap-3 mt-4",
                button {
                    class: "px-3 py-1.5 bg-white border border-stone-300 text-sm rounded disabled:opacity-50",
                    disabled: page() <= 1,
                    onclick: move |_| page.set(page().saturating_sub(1).max(1)),
                    "Previous"
                }
                span { class: "text-sm text-stone-500", "Page {page}" }
                button {
                    class: "px-3 py-1.5 bg-white border border-stone-300 text-sm rounded",
                    onclick: move |_| page.set(page() + 1),
                    "Next"
                }
            }
        }
    }
}

#[component]
fn AuditRow(entry: AuditEntry) -> Element {
    let when = entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let actor = entry
        .actor_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "system".to_string());

    rsx! {
        div {
            class: "p-3 flex items-start justify-between gap-3 text-sm",
            div {
                class: "flex-1 min-w-0",
                span { class: "font-medium text-stone-900 mr-2", "{entry.action}" }
                span { class: "text-stone-500", "{entry.entity}" }
                if let Some(detail) = &entry.detail {
                    p { class: "text-xs text-stone-500 mt-0.5", "{detail}" }
                }
            }
            div {
                class: "text-right shrink-0",
                p { class: "text-xs text-stone-400", "{when}" }
                p { class: "text-xs text-stone-400", "{actor}" }
            }
        }
    }
}
