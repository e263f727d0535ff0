//! Workspace Page Component
//!
//! Members, settings and activity of one workspace.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::api::{self, ActivityScope};
use crate::components::{member_display_name, ActivityFeed, DeleteConfirmButton, UserPicker};
use crate::context::use_services;
use crate::error::ApiResult;
use crate::models::{MemberRole, UserSummary, Workspace, WorkspaceMember, WorkspaceUpdate};
use crate::permissions;
use crate::store::{reload_boards, store_remove_workspace, store_update_workspace, use_app_store, AppStateStoreFields, View};
use crate::text::normalize_to_single_line;
use crate::toast::use_toaster;

#[derive(Debug, Clone, Copy, PartialEq)]
enum WorkspaceTab {
    Members,
    Settings,
    Activity,
}

/// Role of `user_id` in the member list; strangers only get to look
pub fn workspace_role(members: &[WorkspaceMember], user_id: Option<&str>) -> MemberRole {
    user_id
        .and_then(|uid| members.iter().find(|m| m.user_id == uid))
        .map(|m| m.role)
        .unwrap_or(MemberRole::Viewer)
}

/// Changes between the saved workspace and the form, or `None` if nothing changed
pub fn workspace_changes(workspace: &Workspace, name: &str, description: &str, is_private: bool) -> Option<WorkspaceUpdate> {
    let name = normalize_to_single_line(name);
    let description = description.trim();
    let update = WorkspaceUpdate {
        name: (!name.is_empty() && name != workspace.name).then_some(name),
        description: (description != workspace.description.as_deref().unwrap_or_default()).then(|| description.to_string()),
        is_private: (is_private != workspace.is_private).then_some(is_private),
    };
    let changed = update.name.is_some() || update.description.is_some() || update.is_private.is_some();
    changed.then_some(update)
}

#[component]
pub fn WorkspacePage(workspace_id: String) -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();
    let workspace_id = StoredValue::new(workspace_id);

    let workspace = RwSignal::new(None::<Workspace>);
    let members = RwSignal::new(Vec::<WorkspaceMember>::new());
    let (tab, set_tab) = signal(WorkspaceTab::Members);
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (is_private, set_is_private) = signal(false);

    let fill_form = move |ws: &Workspace| {
        set_name.set(ws.name.clone());
        set_description.set(ws.description.clone().unwrap_or_default());
        set_is_private.set(ws.is_private);
    };

    let load_members = move || {
        let api = services.with_value(|s| s.api.clone());
        let id = workspace_id.get_value();
        spawn_local(async move {
            match api::list_workspace_members(&api, &id).await {
                Ok(list) => members.set(list),
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    };

    {
        let api = services.with_value(|s| s.api.clone());
        let id = workspace_id.get_value();
        spawn_local(async move {
            match api::get_workspace(&api, &id).await {
                Ok(ws) => {
                    fill_form(&ws);
                    workspace.set(Some(ws));
                }
                Err(e) => {
                    toaster.error(e.user_message());
                    store.view().set(View::Boards);
                }
            }
        });
    }
    load_members();

    let user_id = Memo::new(move |_| store.user().with(|u| u.as_ref().map(|u| u.id.clone())));
    let role = Memo::new(move |_| members.with(|m| workspace_role(m, user_id.get().as_deref())));

    let after_member_change = move |result: ApiResult<()>, done: String| match result {
        Ok(()) => {
            load_members();
            toaster.success(done);
        }
        Err(e) => {
            toaster.error(e.user_message());
        }
    };

    let add_member = move |user: UserSummary| {
        let api = services.with_value(|s| s.api.clone());
        let id = workspace_id.get_value();
        spawn_local(async move {
            let result = api::add_workspace_member(&api, &id, &user.id, MemberRole::Member).await.map(|_| ());
            after_member_change(result, format!("Added {}", user.username));
        });
    };

    let change_role = move |user_id: String, role: MemberRole| {
        let api = services.with_value(|s| s.api.clone());
        let id = workspace_id.get_value();
        spawn_local(async move {
            let result = api::update_workspace_member(&api, &id, &user_id, role).await.map(|_| ());
            after_member_change(result, format!("Role changed to {}", role.label()));
        });
    };

    let remove_member = move |user_id: String| {
        let api = services.with_value(|s| s.api.clone());
        let id = workspace_id.get_value();
        spawn_local(async move {
            let result = api::remove_workspace_member(&api, &id, &user_id).await;
            after_member_change(result, "Member removed".to_string());
        });
    };

    let on_save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(update) = workspace.with_untracked(|ws| {
            ws.as_ref()
                .and_then(|ws| workspace_changes(ws, &name.get_untracked(), &description.get_untracked(), is_private.get_untracked()))
        }) else {
            return;
        };
        let api = services.with_value(|s| s.api.clone());
        let id = workspace_id.get_value();
        spawn_local(async move {
            match api::update_workspace(&api, &id, &update).await {
                Ok(ws) => {
                    fill_form(&ws);
                    store_update_workspace(&store, ws.clone());
                    workspace.set(Some(ws));
                    toaster.success("Workspace saved");
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    };

    let on_delete = move || {
        let services = services.get_value();
        let id = workspace_id.get_value();
        spawn_local(async move {
            match api::delete_workspace(&services.api, &id).await {
                Ok(()) => {
                    if services.prefs.current_workspace().as_deref() == Some(id.as_str()) {
                        if let Err(e) = services.prefs.set_current_workspace(None) {
                            warn!("Failed to clear workspace selection: {}", e);
                        }
                    }
                    store_remove_workspace(&store, &id);
                    reload_boards(&store);
                    store.view().set(View::Boards);
                    toaster.success("Workspace deleted");
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    };

    let title = move || workspace.with(|ws| ws.as_ref().map(|ws| ws.name.clone()).unwrap_or_default());
    let member_ids = Signal::derive(move || members.with(|m| m.iter().map(|m| m.user_id.clone()).collect::<Vec<_>>()));
    let tab_class = move |t: WorkspaceTab| move || if tab.get() == t { "workspace-page-tab active" } else { "workspace-page-tab" };

    view! {
        <section class="workspace-page">
            <header class="workspace-page-header">
                <button class="board-back" on:click=move |_| store.view().set(View::Boards)>"← Boards"</button>
                <h2>{title}</h2>
                <nav>
                    <button class=tab_class(WorkspaceTab::Members) on:click=move |_| set_tab.set(WorkspaceTab::Members)>"Members"</button>
                    <button class=tab_class(WorkspaceTab::Settings) on:click=move |_| set_tab.set(WorkspaceTab::Settings)>"Settings"</button>
                    <button class=tab_class(WorkspaceTab::Activity) on:click=move |_| set_tab.set(WorkspaceTab::Activity)>"Activity"</button>
                </nav>
            </header>

            {move || match tab.get() {
                WorkspaceTab::Members => view! {
                    <ul class="member-list">
                        <For
                            each=move || members.get()
                            key=|m| (m.user_id.clone(), m.role)
                            children=move |member| {
                                let editable = permissions::can_manage_workspace_members(role.get_untracked())
                                    && member.role != MemberRole::Owner
                                    && user_id.with_untracked(|uid| uid.as_deref() != Some(member.user_id.as_str()));
                                view! {
                                    <WorkspaceMemberRow
                                        member=member
                                        editable=editable
                                        on_role=Callback::new(move |(id, role): (String, MemberRole)| change_role(id, role))
                                        on_remove=Callback::new(move |id: String| remove_member(id))
                                    />
                                }
                            }
                        />
                    </ul>
                    <Show when=move || permissions::can_manage_workspace_members(role.get())>
                        <h4>"Add people"</h4>
                        <UserPicker exclude=member_ids on_pick=Callback::new(move |user: UserSummary| add_member(user)) />
                    </Show>
                }.into_any(),
                WorkspaceTab::Settings => view! {
                    <form class="workspace-settings" on:submit=on_save>
                        <label>
                            "Name"
                            <input
                                type="text"
                                prop:value=move || name.get()
                                prop:readonly=move || !permissions::can_edit_workspace(role.get())
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                            />
                        </label>
                        <label>
                            "Description"
                            <textarea
                                prop:value=move || description.get()
                                prop:readonly=move || !permissions::can_edit_workspace(role.get())
                                on:input=move |ev| set_description.set(event_target_value(&ev))
                            ></textarea>
                        </label>
                        <label>
                            <input
                                type="checkbox"
                                prop:checked=move || is_private.get()
                                prop:disabled=move || !permissions::can_edit_workspace(role.get())
                                on:change=move |ev| set_is_private.set(event_target_checked(&ev))
                            />
                            "Private workspace"
                        </label>
                        <Show when=move || permissions::can_edit_workspace(role.get())>
                            <button type="submit">"Save"</button>
                        </Show>
                    </form>
                    <Show when=move || permissions::can_delete_workspace(role.get())>
                        <div class="danger-zone">
                            <DeleteConfirmButton
                                button_class="workspace-delete"
                                label="Delete workspace"
                                prompt="Delete this workspace and all of its boards?"
                                on_confirm=Callback::new(move |_| on_delete())
                            />
                        </div>
                    </Show>
                }.into_any(),
                WorkspaceTab::Activity => view! {
                    <ActivityFeed scope=ActivityScope::Workspace(workspace_id.get_value()) />
                }.into_any(),
            }}
        </section>
    }
}

#[component]
fn WorkspaceMemberRow(
    member: WorkspaceMember,
    editable: bool,
    on_role: Callback<(String, MemberRole)>,
    on_remove: Callback<String>,
) -> impl IntoView {
    let name = member_display_name(member.username.as_deref(), member.email.as_deref(), &member.user_id);
    let user_id = StoredValue::new(member.user_id.clone());
    let current = member.role;

    view! {
        <li class="member-row">
            <span class="member-name">{name}</span>
            {if editable {
                view! {
                    <select on:change=move |ev| {
                        if let Some(role) = MemberRole::parse(&event_target_value(&ev)) {
                            if role != current {
                                on_role.run((user_id.get_value(), role));
                            }
                        }
                    }>
                        {MemberRole::ASSIGNABLE.iter().map(|role| view! {
                            <option value=role.as_str() selected={*role == current}>{role.label()}</option>
                        }).collect_view()}
                    </select>
                    <DeleteConfirmButton
                        button_class="member-remove"
                        label="Remove"
                        prompt="Remove from workspace?"
                        on_confirm=Callback::new(move |_| on_remove.run(user_id.get_value()))
                    />
                }.into_any()
            } else {
                view! { <span class="member-role">{current.label()}</span> }.into_any()
            }}
        </li>
    }
}
