//! Blood request list page with a creation form for verified users.

use client_core::types::{
    BloodRequest, BloodType, NewBloodRequest, RequestStatus, RequestUrgency, Role,
};
use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::components::VerificationBanner;
use crate::routes::Route;
use crate::services;

#[component]
pub fn Requests() -> Element {
    let auth = use_auth();

    let mut requests = use_signal(Vec::<BloodRequest>::new);
    let mut is_loading = use_signal(|| true);
    let mut status_filter = use_signal(|| Some(RequestStatus::Open));
    let mut refresh_trigger = use_signal(|| 0);

    use_effect(move || {
        let status = status_filter();
        let _ = refresh_trigger();
        spawn(async move {
            is_loading.set(true);
            match services().requests.list(status, None).await {
                Ok(items) => requests.set(items),
                Err(e) => tracing::warn!(error = %e, "failed to load requests"),
            }
            is_loading.set(false);
        });
    });

    // Recipients and medical admins may open requests, once verified.
    let can_create =
        auth.has_role(&[Role::Recipient, Role::MedicalAdmin]) && auth.is_verified();

    rsx! {
        div {
            class: "flex items-center justify-between mb-6",
            h1 { class: "text-2xl font-bold text-stone-900", "Blood requests" }
            div {
                class: "flex gap-2",
                FilterButton {
                    label: "Open",
                    active: status_filter() == Some(RequestStatus::Open),
                    on_click: move |_| status_filter.set(Some(RequestStatus::Open)),
                }
                FilterButton {
                    label: "Fulfilled",
                    active: status_filter() == Some(RequestStatus::Fulfilled),
                    on_click: move |_| status_filter.set(Some(RequestStatus::Fulfilled)),
                }
                FilterButton {
                    label: "All",
                    active: status_filter().is_none(),
                    on_click: move |_| status_filter.set(None),
                }
            }
        }

        VerificationBanner {}

        if can_create {
            NewRequestForm { on_created: move |_| refresh_trigger.set(refresh_trigger() + 1) }
        }

        if is_loading() {
            div { class: "text-center py-12 text-stone-500", "Loading..." }
        } else if requests().is_empty() {
            div {
                class: "bg-white rounded-lg shadow-sm border border-stone-200 p-12 text-center",
                p { class: "text-stone-500", "No requests match this filter." }
            }
        } else {
            div {
                class: "bg-white rounded-lg shadow-sm border border-stone-200 divide-y divide-stone-200",
                for request in requests() {
                    RequestRow { request: request }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct FilterButtonProps {
    label: &'static str,
    active: bool,
    on_click: EventHandler<()>,
}

#[component]
fn FilterButton(props: FilterButtonProps) -> Element {
    let class = if props.active {
        "px-3 py-1.5 bg-red-700 text-white text-sm rounded"
    } else {
        "px-3 py-1.5 bg-white border border-stone-300 text-stone-600 text-sm rounded hover:bg-stone-50"
    };
    rsx! {
        button {
            class: class,
            onclick: move |_| props.on_click.call(()),
            "{props.label}"
        }
    }
}

#[component]
fn RequestRow(request: BloodRequest) -> Element {
    let blood = request.blood_type.label();
    let urgency = request.urgency.label();
    let status = request.status.label();
    let urgency_class = match request.urgency {
        RequestUrgency::Critical => "px-2 py-0.5 bg-red-100 text-red-700 rounded text-xs",
        RequestUrgency::Urgent => "px-2 py-0.5 bg-amber-100 text-amber-700 rounded text-xs",
        RequestUrgency::Routine => "px-2 py-0.5 bg-stone-100 text-stone-600 rounded text-xs",
    };

    rsx! {
        Link {
            to: Route::RequestDetail { id: request.id },
            class: "block p-4 hover:bg-stone-50",
            div {
                class: "flex items-center justify-between",
                div {
                    span { class: "font-semibold text-red-700 mr-3", "{blood}" }
                    span { class: "text-sm text-stone-900", "{request.hospital}" }
                    if let Some(city) = &request.city {
                        span { class: "text-sm text-stone-500 ml-2", "({city})" }
                    }
                }
                div {
                    class: "flex items-center gap-3 text-sm text-stone-500",
                    span { "{request.units_needed} units" }
                    span { class: urgency_class, "{urgency}" }
                    span { class: "text-xs", "{status}" }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct NewRequestFormProps {
    on_created: EventHandler<()>,
}

#[component]
fn NewRequestForm(props: NewRequestFormProps) -> Element {
    let mut blood_type = use_signal(|| BloodType::ONegative);
    let mut units = use_signal(|| 1u32);
    let mut urgency = use_signal(|| RequestUrgency::Routine);
    let mut hospital = use_signal(String::new);
    let mut is_sending = use_signal(|| false);

    let handle_submit = move |_| {
        let hospital_name = hospital().trim().to_string();
        if hospital_name.is_empty() || is_sending() {
            return;
        }

        spawn(async move {
            is_sending.set(true);
            let outcome = services()
                .requests
                .create(&NewBloodRequest {
                    blood_type: blood_type(),
                    units_needed: units(),
                    urgency: urgency(),
                    hospital: hospital_name,
                    city: None,
                    notes: None,
                })
                .await;
            if outcome.is_ok() {
                hospital.set(String::new());
                props.on_created.call(());
            }
            is_sending.set(false);
        });
    };

    rsx! {
        div {
            class: "mb-6 bg-white rounded-lg shadow-sm border border-stone-200 p-4",
            h2 { class: "text-sm font-semibold text-stone-900 mb-3", "New request" }
            div {
                class: "flex flex-wrap items-end gap-3",
                div {
                    label { class: "block text-xs text-stone-500 mb-1", "Blood type" }
                    select {
                        class: "border border-stone-300 rounded px-2 py-1.5 text-sm",
                        onchange: move |e| {
                            if let Some(picked) = BloodType::variants()
                                .iter()
                                .find(|bt| bt.label() == e.value())
                            {
                                blood_type.set(*picked);
                            }
                        },
                        for label in BloodType::variants().iter().map(|bt| bt.label()) {
                            option { value: label, "{label}" }
                        }
                    }
                }
                div {
                    label { class: "block text-xs text-stone-500 mb-1", "Units" }
                    input {
                        class: "w-20 border border-stone-300 rounded px-2 py-1.5 text-sm",
                        r#type: "number",
                        min: "1",
                        value: "{units}",
                        oninput: move |e| {
                            if let Ok(n) = e.value().parse::<u32>() {
                                units.set(n.max(1));
                            }
                        },
                    }
                }
                div {
                    label { class: "block text-xs text-stone-500 mb-1", "Urgency" }
                    select {
                        class: "border border-stone-300 rounded px-2 py-1.5 text-sm",
                        onchange: move |e| {
                            urgency.set(match e.value().as_str() {
                                "Critical" => RequestUrgency::Critical,
                                "Urgent" => RequestUrgency::Urgent,
                                _ => RequestUrgency::Routine,
                            });
                        },
                        option { value: "Routine", "Routine" }
                        option { value: "Urgent", "Urgent" }
                        option { value: "Critical", "Critical" }
                    }
                }
                div {
                    class: "flex-1 min-w-48",
                    label { class: "block text-xs text-stone-500 mb-1", "Hospital" }
                    input {
                        class: "w-full border border-stone-300 rounded px-2 py-1.5 text-sm",
                        value: "{hospital}",
                        oninput: move |e| hospital.set(e.value()),
                    }
                }
                button {
                    class: "px-4 py-1.5 bg-red-700 text-white text-sm rounded hover:bg-red-800 disabled:opacity-50",
                    disabled: is_sending(),
                    onclick: handle_submit,
                    "Create"
                }
            }
        }
    }
}
