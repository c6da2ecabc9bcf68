//! Admin overview: headline stats and current blood stock.

use client_core::types::{BloodStockLevel, DashboardStats};
use dioxus::prelude::*;

use crate::services;

#[component]
pub fn AdminDashboard() -> Element {
    let mut stats = use_signal(|| None::<DashboardStats>);
    let mut stock = use_signal(Vec::<BloodStockLevel>::new);

    use_effect(move || {
        spawn(async move {
            match services().reports.dashboard_stats().await {
                Ok(s) => stats.set(Some(s)),
                Err(e) => tracing::warn!(error = %e, "failed to load dashboard stats"),
            }
            if let Ok(levels) = services().reports.blood_stock().await {
                stock.set(levels);
            }
        });
    });

    rsx! {
        div {
            class: "max-w-5xl mx-auto p-6",
            h1 { class: "text-2xl font-bold text-stone-900 mb-6", "Overview" }

            match stats() {
                Some(s) => rsx! {
                    div {
                        class: "grid grid-cols-2 md:grid-cols-4 gap-4 mb-8",
                        StatCard { label: "Users", value: s.total_users }
                        StatCard { label: "Donors", value: s.total_donors }
                        StatCard { label: "Open requests", value: s.open_requests }
                        StatCard { label: "Critical", value: s.critical_requests }
                        StatCard { label: "Donations this month", value: s.donations_this_month }
                        StatCard { label: "Units collected", value: s.units_collected_this_month }
                    }
                },
                None => rsx! {
                    div { class: "text-center py-12 text-stone-500", "Loading..." }
                }
            }

            h2 { class: "text-lg font-semibold text-stone-900 mb-3", "Blood stock" }
            div {
                class: "grid grid-cols-4 md:grid-cols-8 gap-3",
                for level in stock() {
                    StockCard { level: level }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct StatCardProps {
    label: &'static str,
    value: u64,
}

#[component]
fn StatCard(props: StatCardProps) -> Element {
    rsx! {
        div {
            class: "bg-white rounded-lg shadow-sm border border-stone-200 p-4",
            p { class: "text-2xl font-bold text-stone-900", "{props.value}" }
            p { class: "text-xs text-stone-500 mt-1", "{props.label}" }
        }
    }
}

#[component]
fn StockCard(level: BloodStockLevel) -> Element {
    let blood = level.blood_type.label();
    let low = level.units_available < 5;
    let count_class = if low {
        "text-xl font-bold text-red-700"
    } else {
        "text-xl font-bold text-stone-900"
    };

    rsx! {
        div {
            class: "bg-white rounded-lg shadow-sm border border-stone-200 p-3 text-center",
            p { class: "text-sm font-semibold text-red-700", "{blood}" }
            p { class: count_class, "{level.units_available}" }
            p { class: "text-xs text-stone-400", "{level.units_reserved} reserved" }
        }
    }
}
