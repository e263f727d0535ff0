//! Navigation Bar Component
//!
//! App title, global search box, theme switch, notifications, user menu.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::api;
use crate::components::NotificationBell;
use crate::context::use_services;
use crate::preferences::Theme;
use crate::store::{use_app_store, AppStateStoreFields, View};
use crate::theme::apply_theme;

#[component]
pub fn Navbar(theme: RwSignal<Theme>) -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let (query, set_query) = signal(String::new());
    let (menu_open, set_menu_open) = signal(false);

    let on_search = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let q = query.get();
        if !q.trim().is_empty() {
            store.view().set(View::Search(q.trim().to_string()));
        }
    };

    let cycle_theme = move |_| {
        let next = match theme.get_untracked() {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        };
        if let Err(e) = services.with_value(|s| s.prefs.set_theme(next)) {
            warn!("Failed to save theme: {}", e);
        }
        theme.set(next);
        apply_theme(next);
    };

    let logout = move |_| {
        set_menu_open.set(false);
        let services = services.get_value();
        spawn_local(async move {
            api::logout(&services.api, &services.session).await;
        });
    };

    let user_label = move || {
        store.user().with(|u| u.as_ref().map(|u| u.initials()).unwrap_or_default())
    };

    view! {
        <nav class="navbar">
            <button class="navbar-brand" on:click=move |_| store.view().set(View::Boards)>
                "TaskFlow"
            </button>

            <form class="navbar-search" on:submit=on_search>
                <input
                    type="search"
                    placeholder="Search boards, columns, cards"
                    prop:value=move || query.get()
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
            </form>

            <div class="navbar-actions">
                <button
                    class="theme-toggle"
                    title=move || format!("Theme: {}", theme.get().as_str())
                    on:click=cycle_theme
                >
                    {move || theme.get().as_str()}
                </button>

                <NotificationBell />

                <div class="user-menu">
                    <button class="user-avatar" on:click=move |_| set_menu_open.update(|open| *open = !*open)>
                        {user_label}
                    </button>
                    <Show when=move || menu_open.get()>
                        <div class="user-menu-dropdown">
                            <span class="user-menu-name">
                                {move || store.user().with(|u| u.as_ref().map(|u| u.username.clone()).unwrap_or_default())}
                            </span>
                            <button on:click=move |_| {
                                set_menu_open.set(false);
                                store.view().set(View::Settings);
                            }>
                                "Settings"
                            </button>
                            <button on:click=move |_| {
                                set_menu_open.set(false);
                                store.view().set(View::Activity);
                            }>
                                "My activity"
                            </button>
                            <button on:click=logout>"Log out"</button>
                        </div>
                    </Show>
                </div>
            </div>
        </nav>
    }
}
