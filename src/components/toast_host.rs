//! Toast Host and Loading Bar
//!
//! Overlay components fed by the toaster and the in-flight request counter.

use leptos::prelude::*;

use crate::toast::use_toaster;

#[component]
pub fn ToastHost() -> impl IntoView {
    let toaster = use_toaster();

    view! {
        <div class="toast-host">
            <For
                each=move || toaster.toasts.get()
                key=|t| t.id
                children=move |t| {
                    let id = t.id;
                    view! {
                        <div class=t.kind.css_class() role="status">
                            <span class="toast-message">{t.message.clone()}</span>
                            <button class="toast-close" on:click=move |_| toaster.dismiss(id)>"×"</button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[component]
pub fn LoadingBar(visible: ReadSignal<bool>) -> impl IntoView {
    view! {
        <Show when=move || visible.get()>
            <div class="loading-bar" role="progressbar"></div>
        </Show>
    }
}
