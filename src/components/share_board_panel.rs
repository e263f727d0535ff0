//! Share Board Panel
//!
//! Board members with role changes, removal and adding people by search.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::{use_board, DeleteConfirmButton, UserPicker};
use crate::error::ApiResult;
use crate::models::{BoardMember, MemberRole, UserSummary};
use crate::store::{store_upsert_board, use_app_store};

/// The owner and the signed-in user keep their own rows untouched
pub fn may_change_member(member: &BoardMember, current_user_id: Option<&str>) -> bool {
    member.role != MemberRole::Owner && Some(member.user_id.as_str()) != current_user_id
}

pub fn member_display_name(username: Option<&str>, email: Option<&str>, user_id: &str) -> String {
    username.or(email).unwrap_or(user_id).to_string()
}

#[component]
pub fn ShareBoardPanel(#[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let ctx = use_board();
    let store = use_app_store();

    // Member changes answer with the member only; pull the whole board back in
    let after_change = move |result: ApiResult<()>, done: String| {
        let api = ctx.api();
        let board_id = ctx.board_id.get_value();
        spawn_local(async move {
            let refreshed = match result {
                Ok(()) => api::get_board(&api, &board_id).await,
                Err(e) => Err(e),
            };
            match refreshed {
                Ok(board) => {
                    ctx.state.update(|s| {
                        if let Some(s) = s {
                            s.board = board.clone();
                        }
                    });
                    store_upsert_board(&store, board);
                    ctx.toaster.success(done);
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let add_member = move |user: UserSummary| {
        let api = ctx.api();
        let board_id = ctx.board_id.get_value();
        spawn_local(async move {
            let result = api::add_board_member(&api, &board_id, &user.id, MemberRole::Member).await.map(|_| ());
            after_change(result, format!("Added {}", user.username));
        });
    };

    let change_role = move |user_id: String, role: MemberRole| {
        let api = ctx.api();
        let board_id = ctx.board_id.get_value();
        spawn_local(async move {
            let result = api::update_board_member(&api, &board_id, &user_id, role).await.map(|_| ());
            after_change(result, format!("Role changed to {}", role.label()));
        });
    };

    let remove_member = move |user_id: String| {
        let api = ctx.api();
        let board_id = ctx.board_id.get_value();
        spawn_local(async move {
            let result = api::remove_board_member(&api, &board_id, &user_id).await;
            after_change(result, "Member removed".to_string());
        });
    };

    let members = move || ctx.state.with(|s| s.as_ref().map(|s| s.board.members.clone()).unwrap_or_default());
    let member_ids = Signal::derive(move || members().into_iter().map(|m| m.user_id).collect::<Vec<_>>());

    view! {
        <aside class="share-panel">
            <header>
                <h3>"Share board"</h3>
                <button class="panel-close" on:click=move |_| on_close.run(())>"×"</button>
            </header>

            <ul class="member-list">
                <For
                    each=members
                    key=|m| (m.user_id.clone(), m.role)
                    children=move |member| view! {
                        <MemberRow
                            member=member
                            on_role=Callback::new(move |(id, role): (String, MemberRole)| change_role(id, role))
                            on_remove=Callback::new(move |id: String| remove_member(id))
                        />
                    }
                />
            </ul>

            <h4>"Add people"</h4>
            <UserPicker exclude=member_ids on_pick=Callback::new(move |user: UserSummary| add_member(user)) />
        </aside>
    }
}

#[component]
fn MemberRow(member: BoardMember, on_role: Callback<(String, MemberRole)>, on_remove: Callback<String>) -> impl IntoView {
    let ctx = use_board();
    let editable = may_change_member(&member, ctx.user_id.get_untracked().as_deref());
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
                        prompt="Remove from board?"
                        on_confirm=Callback::new(move |_| on_remove.run(user_id.get_value()))
                    />
                }.into_any()
            } else {
                view! { <span class="member-role">{current.label()}</span> }.into_any()
            }}
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: &str, role: MemberRole) -> BoardMember {
        BoardMember {
            id: format!("m-{}", user_id),
            board_id: "b1".into(),
            user_id: user_id.into(),
            username: None,
            email: Some(format!("{}@example.com", user_id)),
            role,
        }
    }

    #[test]
    fn test_owner_and_self_are_locked() {
        assert!(!may_change_member(&member("u9", MemberRole::Owner), Some("u1")));
        assert!(!may_change_member(&member("u1", MemberRole::Admin), Some("u1")));
        assert!(may_change_member(&member("u2", MemberRole::Viewer), Some("u1")));
    }

    #[test]
    fn test_display_name_falls_back() {
        assert_eq!(member_display_name(Some("bob"), Some("b@x.io"), "u2"), "bob");
        assert_eq!(member_display_name(None, Some("b@x.io"), "u2"), "b@x.io");
        assert_eq!(member_display_name(None, None, "u2"), "u2");
    }
}
