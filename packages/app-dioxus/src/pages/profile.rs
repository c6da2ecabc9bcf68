//! Profile page: shallow edits round-trip through the server and replace
//! the cached user wholesale.

use client_core::types::{BloodType, UpdateProfile};
use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::services;

#[component]
pub fn Profile() -> Element {
    let auth = use_auth();

    let user = auth.user();
    let mut first_name = use_signal(|| user.as_ref().map(|u| u.first_name.clone()).unwrap_or_default());
    let mut last_name = use_signal(|| user.as_ref().map(|u| u.last_name.clone()).unwrap_or_default());
    let mut phone = use_signal(|| {
        user.as_ref()
            .and_then(|u| u.phone.clone())
            .unwrap_or_default()
    });
    let mut city = use_signal(|| {
        user.as_ref()
            .and_then(|u| u.city.clone())
            .unwrap_or_default()
    });
    let mut blood_type = use_signal(|| user.as_ref().and_then(|u| u.blood_type));
    let mut is_saving = use_signal(|| false);

    let Some(user) = user else {
        return rsx! {};
    };

    let handle_save = move |_| {
        spawn(async move {
            is_saving.set(true);
            let phone_value = phone().trim().to_string();
            let city_value = city().trim().to_string();
            services()
                .session
                .update_profile(UpdateProfile {
                    first_name: Some(first_name().trim().to_string()),
                    last_name: Some(last_name().trim().to_string()),
                    phone: (!phone_value.is_empty()).then_some(phone_value),
                    city: (!city_value.is_empty()).then_some(city_value),
                    blood_type: blood_type(),
                })
                .await;
            is_saving.set(false);
        });
    };

    let verified = [
        ("Email", user.email_verified),
        ("Phone", user.phone_verified),
        ("Medical", user.medical_verified),
    ];
    let role = user.role.label();

    rsx! {
        h1 { class: "text-2xl font-bold text-stone-900 mb-2", "Profile" }
        p { class: "text-sm text-stone-500 mb-6", "{user.email} \u{00B7} {role}" }

        div {
            class: "mb-6 flex gap-3",
            for (label, ok) in verified {
                if ok {
                    span { class: "px-2 py-1 bg-green-50 border border-green-200 text-green-700 rounded text-xs", "{label} \u{2713}" }
                } else {
                    span { class: "px-2 py-1 bg-stone-100 border border-stone-200 text-stone-500 rounded text-xs", "{label} pending" }
                }
            }
        }

        div {
            class: "bg-white rounded-lg shadow-sm border border-stone-200 p-6 max-w-lg space-y-4",
            div {
                class: "grid grid-cols-2 gap-3",
                div {
                    label { class: "block text-sm font-medium text-stone-700 mb-1", "First name" }
                    input {
                        class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                        value: "{first_name}",
                        oninput: move |e| first_name.set(e.value()),
                    }
                }
                div {
                    label { class: "block text-sm font-medium text-stone-700 mb-1", "Last name" }
                    input {
                        class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                        value: "{last_name}",
                        oninput: move |e| last_name.set(e.value()),
                    }
                }
            }
            div {
                label { class: "block text-sm font-medium text-stone-700 mb-1", "Phone" }
                input {
                    class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                    value: "{phone}",
                    oninput: move |e| phone.set(e.value()),
                }
            }
            div {
                label { class: "block text-sm font-medium text-stone-700 mb-1", "City" }
                input {
                    class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                    value: "{city}",
                    oninput: move |e| city.set(e.value()),
                }
            }
            div {
                label { class: "block text-sm font-medium text-stone-700 mb-1", "Blood type" }
                select {
                    class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                    onchange: move |e| {
                        let picked = BloodType::variants()
                            .iter()
                            .find(|bt| bt.label() == e.value())
                            .copied();
                        blood_type.set(picked);
                    },
                    option { value: "", "Unknown" }
                    for label in BloodType::variants().iter().map(|bt| bt.label()) {
                        option { value: label, "{label}" }
                    }
                }
            }
            button {
                class: "px-4 py-2 bg-red-700 text-white text-sm rounded hover:bg-red-800 disabled:opacity-50",
                disabled: is_saving(),
                onclick: handle_save,
                if is_saving() { "Saving..." } else { "Save changes" }
            }
        }
    }
}
