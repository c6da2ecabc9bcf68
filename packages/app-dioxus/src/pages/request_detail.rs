//! Request detail page: live-updating view of one blood request, its
//! matched donors and its donations.

use client_core::realtime::protocol::ServerEvent;
use client_core::types::{BloodRequest, Donation, User};
use dioxus::prelude::*;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::auth::use_auth;
use crate::services;

#[component]
pub fn RequestDetail(id: Uuid) -> Element {
    let auth = use_auth();

    let mut request = use_signal(|| None::<BloodRequest>);
    let mut matches = use_signal(Vec::<User>::new);
    let mut donations = use_signal(Vec::<Donation>::new);
    let mut refresh_trigger = use_signal(|| 0);

    // Fetch on mount and whenever a room event bumps the trigger.
    use_effect(move || {
        let _ = refresh_trigger();
        spawn(async move {
            match services().requests.get(id).await {
                Ok(r) => request.set(Some(r)),
                Err(e) => tracing::warn!(error = %e, "failed to load request"),
            }
            if let Ok(found) = services().requests.matches(id).await {
                matches.set(found);
            }
            if let Ok(given) = services().donations.for_request(id).await {
                donations.set(given);
            }
        });
    });

    // Join the request's room for the lifetime of this page; live updates
    // just re-fetch the detail.
    use_effect(move || {
        spawn(async move {
            let mut room = services().realtime.join_request_room(id).await;
            loop {
                match room.recv().await {
                    Ok(ServerEvent::BloodRequestUpdate { .. })
                    | Ok(ServerEvent::DonationUpdate { .. }) => {
                        refresh_trigger.set(refresh_trigger.peek().wrapping_add(1));
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
    });

    use_drop(move || {
        spawn(async move {
            services().realtime.leave_request_room(id).await;
        });
    });

    let Some(current) = request() else {
        return rsx! {
            div { class: "text-center py-12 text-stone-500", "Loading..." }
        };
    };

    let blood = current.blood_type.label();
    let urgency = current.urgency.label();
    let status = current.status.label();
    let can_pledge = auth.is_verified();

    rsx! {
        div {
            class: "mb-6",
            h1 {
                class: "text-2xl font-bold text-stone-900",
                span { class: "text-red-700 mr-2", "{blood}" }
                "{current.hospital}"
            }
            p { class: "text-sm text-stone-500 mt-1", "{urgency} \u{00B7} {status} \u{00B7} {current.units_needed} units needed" }
            if let Some(notes) = &current.notes {
                p { class: "text-sm text-stone-600 mt-2", "{notes}" }
            }
        }

        div {
            class: "grid md:grid-cols-2 gap-6",
            div {
                h2 { class: "text-lg font-semibold text-stone-900 mb-3", "Matched donors" }
                if matches().is_empty() {
                    p { class: "text-sm text-stone-500", "No matches yet." }
                } else {
                    div {
                        class: "bg-white rounded-lg shadow-sm border border-stone-200 divide-y divide-stone-200",
                        for donor in matches() {
                            MatchRow { donor: donor }
                        }
                    }
                }
            }
            div {
                h2 { class: "text-lg font-semibold text-stone-900 mb-3", "Donations" }
                if donations().is_empty() {
                    p { class: "text-sm text-stone-500", "No donations pledged yet." }
                } else {
                    div {
                        class: "bg-white rounded-lg shadow-sm border border-stone-200 divide-y divide-stone-200",
                        for donation in donations() {
                            DonationRow { donation: donation }
                        }
                    }
                }
                if !can_pledge {
                    p {
                        class: "text-xs text-stone-400 mt-2",
                        "Complete verification to pledge a donation."
                    }
                }
            }
        }
    }
}

#[component]
fn MatchRow(donor: User) -> Element {
    let name = donor.full_name();
    let blood = donor.blood_type.map(|bt| bt.label()).unwrap_or("?");
    rsx! {
        div {
            class: "p-3 flex items-center justify-between",
            span { class: "text-sm text-stone-900", "{name}" }
            span { class: "text-sm font-medium text-red-700", "{blood}" }
        }
    }
}

#[component]
fn DonationRow(donation: Donation) -> Element {
    let status = donation.status.label();
    rsx! {
        div {
            class: "p-3 flex items-center justify-between text-sm",
            span { class: "text-stone-900", "{donation.units} units" }
            span { class: "text-stone-500", "{status}" }
        }
    }
}
