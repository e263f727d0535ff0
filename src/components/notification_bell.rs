//! Notification Bell Component
//!
//! Unread badge with a dropdown of the most recent notifications.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::context::use_services;
use crate::models::Notification;
use crate::store::{use_app_store, AppStateStoreFields, View};
use crate::text::time_ago;
use crate::toast::use_toaster;

#[component]
pub fn NotificationBell() -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();
    let (open, set_open) = signal(false);

    let unread = move || store.notifications().with(|f| f.unread);
    let recent = move || store.notifications().with(|f| f.recent().to_vec());

    let mark_read = move |notification: Notification| {
        if !notification.is_read {
            let services = services.get_value();
            let id = notification.id.clone();
            spawn_local(async move {
                match api::mark_notification_read(&services.api, &id).await {
                    Ok(()) => store.notifications().update(|f| f.mark_read(&id)),
                    Err(e) => {
                        toaster.error(e.user_message());
                    }
                }
            });
        }
        if notification.entity_type.as_deref() == Some("BOARD") {
            if let Some(board_id) = notification.entity_id {
                set_open.set(false);
                store.view().set(View::Board(board_id));
            }
        }
    };

    let mark_all = move |_| {
        let services = services.get_value();
        spawn_local(async move {
            match api::mark_all_notifications_read(&services.api).await {
                Ok(()) => store.notifications().update(|f| f.mark_all_read()),
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    };

    view! {
        <div class="notification-bell">
            <button class="bell-btn" on:click=move |_| set_open.update(|o| *o = !*o)>
                "Notifications"
                <Show when=move || { unread() > 0 }>
                    <span class="bell-badge">{move || unread().to_string()}</span>
                </Show>
            </button>
            <Show when=move || store.notifications().with(|f| !f.connected)>
                <span class="bell-offline" title="Live updates paused"></span>
            </Show>

            <Show when=move || open.get()>
                <div class="bell-dropdown">
                    <div class="bell-header">
                        <span>"Notifications"</span>
                        <button class="bell-mark-all" on:click=mark_all>"Mark all as read"</button>
                    </div>
                    <Show
                        when=move || !recent().is_empty()
                        fallback=|| view! { <p class="bell-empty">"You're all caught up"</p> }
                    >
                        <ul class="bell-list">
                            <For
                                each=recent
                                key=|n| (n.id.clone(), n.is_read)
                                children=move |n| {
                                    let class = if n.is_read { "bell-item" } else { "bell-item unread" };
                                    let title = n.title.clone();
                                    let message = n.message.clone().unwrap_or_default();
                                    let when = time_ago(&n.created_at);
                                    view! {
                                        <li class=class on:click=move |_| mark_read(n.clone())>
                                            <strong>{title}</strong>
                                            <p>{message}</p>
                                            <small>{when}</small>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
