//! Loading spinner

use dioxus::prelude::*;

#[component]
pub fn LoadingSpinner() -> Element {
    rsx! {
        div {
            class: "flex items-center gap-2 text-stone-500",
            span { class: "animate-spin", "\u{25CC}" }
            span { class: "text-sm", "Loading..." }
        }
    }
}
