//! Workspace Tab Bar Component
//!
//! Switches the board list between workspaces, or shows every board, and
//! opens a workspace's members and settings.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::api;
use crate::context::use_services;
use crate::models::WorkspaceCreate;
use crate::store::{store_add_workspace, use_app_store, AppStateStoreFields, View};
use crate::text::normalize_to_single_line;
use crate::toast::use_toaster;

#[component]
pub fn WorkspaceTabBar() -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();
    let (adding, set_adding) = signal(false);
    let (new_name, set_new_name) = signal(String::new());

    let select = move |id: Option<String>| {
        if let Err(e) = services.with_value(|s| s.prefs.set_current_workspace(id.as_deref())) {
            warn!("Failed to save workspace selection: {}", e);
        }
        store.current_workspace_id().set(id);
    };

    let on_add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = normalize_to_single_line(&new_name.get());
        if name.is_empty() {
            return;
        }
        let services = services.get_value();
        spawn_local(async move {
            let body = WorkspaceCreate { name, description: None, is_private: None };
            match api::create_workspace(&services.api, &body).await {
                Ok(workspace) => {
                    let id = workspace.id.clone();
                    store_add_workspace(&store, workspace);
                    select(Some(id));
                    toaster.success("Workspace created");
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
        set_new_name.set(String::new());
        set_adding.set(false);
    };

    view! {
        <div class="workspace-tab-bar">
            <button
                class=move || if store.current_workspace_id().with(Option::is_none) { "workspace-tab active" } else { "workspace-tab" }
                on:click=move |_| select(None)
            >
                "All boards"
            </button>
            <For
                each=move || store.workspaces().get()
                key=|ws| (ws.id.clone(), ws.name.clone())
                children=move |ws| {
                    let id = StoredValue::new(ws.id.clone());
                    let is_active = move || store.current_workspace_id().with(|c| id.with_value(|id| c.as_deref() == Some(id.as_str())));
                    view! {
                        <div class="workspace-tab-row">
                            <button
                                class=move || if is_active() { "workspace-tab active" } else { "workspace-tab" }
                                on:click=move |_| select(Some(id.get_value()))
                            >
                                {ws.name.clone()}
                            </button>
                            <button
                                class="workspace-manage"
                                title="Members and settings"
                                on:click=move |_| store.view().set(View::Workspace(id.get_value()))
                            >
                                "⚙"
                            </button>
                        </div>
                    }
                }
            />

            {move || if adding.get() {
                view! {
                    <form class="workspace-add-form" on:submit=on_add>
                        <input
                            type="text"
                            placeholder="Workspace name"
                            prop:value=move || new_name.get()
                            on:input=move |ev| set_new_name.set(event_target_value(&ev))
                        />
                        <button type="submit">"Create"</button>
                        <button type="button" on:click=move |_| set_adding.set(false)>"Cancel"</button>
                    </form>
                }.into_any()
            } else {
                view! {
                    <button class="workspace-add-btn" on:click=move |_| set_adding.set(true)>
                        "+ Workspace"
                    </button>
                }.into_any()
            }}
        </div>
    }
}
