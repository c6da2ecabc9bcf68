//! Toast overlay: renders the hub's one-shot messages and auto-dismisses
//! them after a few seconds.

use client_core::hub::{Toast, ToastLevel};
use dioxus::prelude::*;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

use crate::services;

const TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[component]
pub fn ToastHost() -> Element {
    let mut toasts = use_signal(Vec::<(u64, Toast)>::new);

    use_effect(move || {
        spawn(async move {
            let mut rx = services().hub.subscribe_toasts();
            let mut next_id = 0u64;
            loop {
                match rx.recv().await {
                    Ok(toast) => {
                        next_id += 1;
                        let id = next_id;
                        toasts.write().push((id, toast));
                        spawn(async move {
                            tokio::time::sleep(TOAST_LIFETIME).await;
                            toasts.write().retain(|(existing, _)| *existing != id);
                        });
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
    });

    rsx! {
        div {
            class: "fixed top-4 right-4 z-50 flex flex-col gap-2 w-80",
            for (id, toast) in toasts() {
                ToastCard {
                    key: "{id}",
                    id: id,
                    toast: toast,
                    on_dismiss: move |id: u64| {
                        toasts.write().retain(|(existing, _)| *existing != id);
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct ToastCardProps {
    id: u64,
    toast: Toast,
    on_dismiss: EventHandler<u64>,
}

#[component]
fn ToastCard(props: ToastCardProps) -> Element {
    let class = match props.toast.level {
        ToastLevel::Success => "bg-green-50 border-green-200 text-green-800",
        ToastLevel::Info => "bg-stone-50 border-stone-200 text-stone-800",
        ToastLevel::Error => "bg-red-50 border-red-200 text-red-800",
    };

    rsx! {
        div {
            class: "border rounded-lg shadow-sm px-4 py-3 flex items-start justify-between gap-2 {class}",
            p { class: "text-sm flex-1", "{props.toast.message}" }
            button {
                class: "text-xs opacity-60 hover:opacity-100",
                onclick: move |_| props.on_dismiss.call(props.id),
                "\u{2715}"
            }
        }
    }
}
