//! Card Members Component
//!
//! Assignees and watchers of a card, picked from the board's members.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::{member_display_name, use_board};
use crate::error::ApiResult;
use crate::models::{BoardMember, Card, CardRole};

const CARD_ROLES: [CardRole; 2] = [CardRole::Assignee, CardRole::Watcher];

/// Board members who are not on the card yet
pub fn assignable_members(board_members: &[BoardMember], card: &Card) -> Vec<BoardMember> {
    board_members
        .iter()
        .filter(|m| card.role_of(&m.user_id).is_none())
        .cloned()
        .collect()
}

#[component]
pub fn CardMembers(
    card: RwSignal<Option<Card>>,
    #[prop(into)] can_edit: Signal<bool>,
    #[prop(into)] on_updated: Callback<Card>,
) -> impl IntoView {
    let ctx = use_board();

    let card_id = move || card.with_untracked(|c| c.as_ref().map(|c| c.id.clone()));
    let apply = move |result: ApiResult<Card>| match result {
        Ok(updated) => on_updated.run(updated),
        Err(e) => {
            ctx.toaster.error(e.user_message());
        }
    };

    let assign = move |user_id: String| {
        let Some(id) = card_id() else { return };
        let api = ctx.api();
        spawn_local(async move { apply(api::assign_user(&api, &id, &user_id).await) });
    };

    let unassign = move |user_id: String| {
        let Some(id) = card_id() else { return };
        let api = ctx.api();
        spawn_local(async move { apply(api::unassign_user(&api, &id, &user_id).await) });
    };

    let change_role = move |user_id: String, role: CardRole| {
        let Some(id) = card_id() else { return };
        let api = ctx.api();
        spawn_local(async move { apply(api::set_member_role(&api, &id, &user_id, role).await) });
    };

    let members = move || card.with(|c| c.as_ref().map(|c| c.members.clone()).unwrap_or_default());
    let candidates = move || {
        let board_members = ctx.state.with(|s| s.as_ref().map(|s| s.board.members.clone()).unwrap_or_default());
        card.with(|c| c.as_ref().map(|c| assignable_members(&board_members, c)).unwrap_or_default())
    };

    view! {
        <section class="card-detail-members">
            <h4>"Members"</h4>
            <ul>
                <For
                    each=members
                    key=|m| (m.user_id.clone(), m.role)
                    children=move |member| {
                        let user_id = StoredValue::new(member.user_id.clone());
                        let current = member.role;
                        let name = member_display_name(member.username.as_deref(), member.email.as_deref(), &member.user_id);
                        view! {
                            <li class="card-member">
                                <span class="member-name">{name}</span>
                                <select
                                    prop:disabled=move || !can_edit.get()
                                    on:change=move |ev| {
                                        if let Some(role) = CardRole::parse(&event_target_value(&ev)) {
                                            if role != current {
                                                change_role(user_id.get_value(), role);
                                            }
                                        }
                                    }
                                >
                                    {CARD_ROLES.iter().map(|role| view! {
                                        <option value=role.as_str() selected={*role == current}>{role.as_str().to_lowercase()}</option>
                                    }).collect_view()}
                                </select>
                                <Show when=move || can_edit.get()>
                                    <button class="member-remove" on:click=move |_| unassign(user_id.get_value())>"×"</button>
                                </Show>
                            </li>
                        }
                    }
                />
            </ul>
            <Show when=move || can_edit.get() && !candidates().is_empty()>
                <select class="member-add" on:change=move |ev| {
                    let user_id = event_target_value(&ev);
                    if !user_id.is_empty() {
                        assign(user_id);
                    }
                }>
                    <option value="" selected=true>"Add member..."</option>
                    {move || candidates().into_iter().map(|m| {
                        let name = member_display_name(m.username.as_deref(), m.email.as_deref(), &m.user_id);
                        view! { <option value=m.user_id.clone()>{name}</option> }
                    }).collect_view()}
                </select>
            </Show>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardMember, MemberRole};
    use crate::test_support::card;

    fn board_member(user_id: &str) -> BoardMember {
        BoardMember {
            id: format!("bm-{}", user_id),
            board_id: "b1".into(),
            user_id: user_id.into(),
            username: Some(user_id.to_uppercase()),
            email: None,
            role: MemberRole::Member,
        }
    }

    #[test]
    fn test_members_already_on_card_are_skipped() {
        let mut c = card("c1", "todo", 0);
        c.members.push(CardMember {
            id: "cm1".into(),
            card_id: "c1".into(),
            user_id: "u2".into(),
            username: None,
            email: None,
            role: CardRole::Watcher,
        });
        let board = vec![board_member("u1"), board_member("u2"), board_member("u3")];
        let left: Vec<_> = assignable_members(&board, &c).into_iter().map(|m| m.user_id).collect();
        assert_eq!(left, vec!["u1", "u3"]);
    }
}
