//! Board Column Component
//!
//! One column: draggable header, its cards with drop slots between them,
//! and an add-card form.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{make_on_mousedown, make_on_mouseleave, make_on_slot_mouseenter, DndSignals, DragSource, DropSlot};

use crate::api;
use crate::components::{use_board, DeleteConfirmButton};
use crate::models::{BoardColumn, Card, CardCreate, ColumnUpdate};
use crate::permissions;
use crate::text::{date_input_value, due_status, normalize_to_single_line, priority_label, time_ago, DueStatus};

/// CSS class of a drop marker for the current drag state
pub fn drop_marker_class(vertical: bool, dragging: bool, active: bool) -> String {
    let mut class = String::from("drop-marker");
    if vertical {
        class.push_str(" drop-marker-vertical");
    }
    if !dragging {
        class.push_str(" idle");
    } else if active {
        class.push_str(" active");
    }
    class
}

/// Drop target line shown between draggables while a drag is active
#[component]
pub fn DropMarker(
    dnd: DndSignals<String>,
    target: DropSlot<String>,
    #[prop(optional)] vertical: bool,
) -> impl IntoView {
    let active_slot = target.clone();
    view! {
        <div
            class=move || drop_marker_class(vertical, dnd.is_dragging(), dnd.is_active_slot(&active_slot))
            on:mouseenter=make_on_slot_mouseenter(dnd, target)
            on:mouseleave=make_on_mouseleave(dnd)
        ></div>
    }
}

/// "3/5" style count; `None` limit shows the count alone
pub fn wip_label(count: usize, limit: Option<u32>) -> String {
    match limit {
        Some(limit) if limit > 0 => format!("{}/{}", count, limit),
        _ => count.to_string(),
    }
}

pub fn over_wip_limit(count: usize, limit: Option<u32>) -> bool {
    matches!(limit, Some(limit) if limit > 0 && count > limit as usize)
}

#[component]
pub fn BoardColumnView(column: BoardColumn, index: usize) -> impl IntoView {
    let ctx = use_board();
    let column_id = StoredValue::new(column.id.clone());
    let wip_limit = column.wip_limit;
    let (editing, set_editing) = signal(false);
    let (name, set_name) = signal(column.name.clone());
    let (new_card, set_new_card) = signal(String::new());

    let source = DragSource { container: ctx.board_id.get_value(), index };
    let dragged_source = source.clone();
    let on_header_mousedown = make_on_mousedown(ctx.columns_dnd, source);

    let cards = move || {
        ctx.state.with(|s| {
            s.as_ref()
                .map(|s| s.cards_for(&column_id.get_value()).to_vec())
                .unwrap_or_default()
        })
    };
    let card_count = move || ctx.state.with(|s| s.as_ref().map(|s| s.cards_for(&column_id.get_value()).len()).unwrap_or(0));

    let save_column = move |update: ColumnUpdate| {
        let api = ctx.api();
        let id = column_id.get_value();
        spawn_local(async move {
            match api::update_column(&api, &id, &update).await {
                Ok(column) => ctx.state.update(|s| {
                    if let Some(s) = s {
                        s.replace_column(column);
                    }
                }),
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                    ctx.reload(true);
                }
            }
        });
    };

    let commit_rename = move || {
        set_editing.set(false);
        let trimmed = normalize_to_single_line(&name.get_untracked());
        if trimmed.is_empty() {
            return;
        }
        save_column(ColumnUpdate { name: Some(trimmed), ..Default::default() });
    };

    let on_delete = move || {
        let api = ctx.api();
        let id = column_id.get_value();
        spawn_local(async move {
            match api::delete_column(&api, &id).await {
                Ok(()) => {
                    ctx.state.update(|s| {
                        if let Some(s) = s {
                            s.remove_column(&id);
                        }
                    });
                    ctx.toaster.success("Column deleted");
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let on_add_card = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let title = normalize_to_single_line(&new_card.get());
        if title.is_empty() {
            return;
        }
        let body = CardCreate {
            title,
            column_id: column_id.get_value(),
            description: None,
            position: Some(card_count() as i32),
            due_date: None,
            start_date: None,
            priority: None,
        };
        let api = ctx.api();
        spawn_local(async move {
            match api::create_card(&api, &body).await {
                Ok(card) => ctx.state.update(|s| {
                    if let Some(s) = s {
                        s.push_card(card);
                    }
                }),
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
        set_new_card.set(String::new());
    };

    view! {
        <div class=move || {
            if ctx.columns_dnd.is_dragged(&dragged_source) { "board-column dragging" } else { "board-column" }
        }>
            <div
                class="column-header"
                on:mousedown=move |ev| {
                    if permissions::can_edit_column(ctx.role.get_untracked()) {
                        on_header_mousedown(ev);
                    }
                }
            >
                {move || if editing.get() {
                    view! {
                        <input
                            class="column-name-input"
                            type="text"
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                            on:blur=move |_| commit_rename()
                            on:keydown=move |ev| {
                                if ev.key() == "Enter" {
                                    commit_rename();
                                } else if ev.key() == "Escape" {
                                    set_editing.set(false);
                                }
                            }
                        />
                    }.into_any()
                } else {
                    view! {
                        <h3
                            class="column-name"
                            on:dblclick=move |_| {
                                if permissions::can_edit_column(ctx.role.get_untracked()) {
                                    set_editing.set(true);
                                }
                            }
                        >
                            {move || name.get()}
                        </h3>
                    }.into_any()
                }}
                <span class=move || if over_wip_limit(card_count(), wip_limit) { "column-count over-limit" } else { "column-count" }>
                    {move || wip_label(card_count(), wip_limit)}
                </span>
                <Show when=move || permissions::can_edit_column(ctx.role.get())>
                    <button
                        class="column-archive"
                        title="Archive column"
                        on:click=move |_| save_column(ColumnUpdate { archived: Some(true), ..Default::default() })
                    >"Archive"</button>
                </Show>
                <Show when=move || permissions::can_delete_column(ctx.role.get())>
                    <DeleteConfirmButton
                        button_class="column-delete"
                        prompt="Delete column and its cards?"
                        on_confirm=Callback::new(move |_| on_delete())
                    />
                </Show>
            </div>

            <div class="column-cards">
                {move || {
                    let cards = cards();
                    let count = cards.len();
                    let id = column_id.get_value();
                    view! {
                        {cards
                            .into_iter()
                            .enumerate()
                            .map(|(index, card)| {
                                let target = DropSlot { container: id.clone(), index };
                                view! {
                                    <DropMarker dnd=ctx.cards_dnd target=target />
                                    <CardTile card=card index=index />
                                }
                            })
                            .collect_view()}
                        <DropMarker dnd=ctx.cards_dnd target=DropSlot { container: id.clone(), index: count } />
                    }
                }}
            </div>

            <Show when=move || permissions::can_create_card(ctx.role.get())>
                <form class="card-add-form" on:submit=on_add_card>
                    <input
                        type="text"
                        placeholder="Add a card"
                        prop:value=move || new_card.get()
                        on:input=move |ev| set_new_card.set(event_target_value(&ev))
                    />
                </form>
            </Show>
        </div>
    }
}

#[component]
pub fn CardTile(card: Card, index: usize) -> impl IntoView {
    let ctx = use_board();
    let card_id = StoredValue::new(card.id.clone());
    let source = DragSource { container: card.column_id.clone(), index };
    let dragged_source = source.clone();
    let on_mousedown = make_on_mousedown(ctx.cards_dnd, source);
    let snapshot = StoredValue::new(card.clone());
    let card_role = move || {
        ctx.user_id.with(|uid| uid.as_deref().and_then(|uid| snapshot.with_value(|c| c.role_of(uid))))
    };
    let can_edit = move || permissions::can_edit_card(ctx.role.get(), card_role());
    let achieved = card.achieved;

    let toggle_achieved = move |ev: web_sys::Event| {
        ev.stop_propagation();
        let value = event_target_checked(&ev);
        let api = ctx.api();
        let id = card_id.get_value();
        spawn_local(async move {
            match api::set_card_achieved(&api, &id, value).await {
                Ok(_) => ctx.state.update(|s| {
                    if let Some(s) = s {
                        s.set_card_achieved(&id, value);
                    }
                }),
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let labels = card
        .labels
        .iter()
        .map(|l| view! { <span class="card-label" style=format!("background-color: {}", l.color) title=l.name.clone()></span> })
        .collect_view();
    let due = card.due_date.as_deref().map(|d| {
        let class = due_status(d, chrono::Utc::now()).unwrap_or(DueStatus::Later).css_class();
        (class, date_input_value(d))
    });
    let priority = priority_label(card.priority);
    let updated = card.updated_at.as_deref().map(time_ago);
    let comments = card.comment_count.filter(|n| *n > 0);
    let member_badges = card
        .members
        .iter()
        .filter_map(|m| m.username.clone())
        .map(|name| {
            let initial: String = name.chars().take(1).flat_map(char::to_uppercase).collect();
            view! { <span class="card-member" title=name>{initial}</span> }
        })
        .collect_view();

    view! {
        <div
            class=move || {
                let mut class = String::from("card-tile");
                if achieved { class.push_str(" achieved"); }
                if ctx.cards_dnd.is_dragged(&dragged_source) { class.push_str(" dragging"); }
                class
            }
            on:mousedown=move |ev| {
                if can_edit() {
                    on_mousedown(ev);
                }
            }
            on:click=move |_| {
                if !ctx.cards_dnd.drag_just_ended_read.get_untracked() {
                    ctx.selected_card.set(Some(card_id.get_value()));
                }
            }
        >
            <div class="card-labels">{labels}</div>
            <div class="card-title">
                <input
                    type="checkbox"
                    class="card-achieved"
                    prop:checked=achieved
                    prop:disabled=move || !can_edit()
                    on:click=|ev| ev.stop_propagation()
                    on:change=toggle_achieved
                />
                {card.title.clone()}
            </div>
            <div class="card-meta">
                {priority.map(|p| view! { <span class="card-priority">{p}</span> })}
                {due.map(|(class, d)| view! { <span class=class>{d}</span> })}
                {comments.map(|n| view! { <span class="card-comments">{format!("💬 {}", n)}</span> })}
                <span class="card-members">{member_badges}</span>
                {updated.map(|u| view! { <span class="card-updated">{u}</span> })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_marker_class() {
        assert_eq!(drop_marker_class(false, false, false), "drop-marker idle");
        assert_eq!(drop_marker_class(false, true, false), "drop-marker");
        assert_eq!(drop_marker_class(true, true, true), "drop-marker drop-marker-vertical active");
    }

    #[test]
    fn test_marker_activates_for_hovered_slot() {
        let owner = Owner::new();
        owner.with(|| {
            let dnd = leptos_dragdrop::create_dnd_signals::<String>();
            let todo_0 = DropSlot { container: "todo".to_string(), index: 0 };
            let todo_1 = DropSlot { container: "todo".to_string(), index: 1 };

            dnd.hover_slot(todo_1.clone());
            assert!(!dnd.is_active_slot(&todo_1), "no drag in progress");

            dnd.dragging_write.set(Some(DragSource { container: "todo".to_string(), index: 0 }));
            dnd.hover_slot(todo_1.clone());
            let class_for = |slot: &DropSlot<String>| drop_marker_class(false, dnd.is_dragging(), dnd.is_active_slot(slot));
            assert_eq!(class_for(&todo_1), "drop-marker active");
            assert_eq!(class_for(&todo_0), "drop-marker");
        });
    }

    #[test]
    fn test_wip_label() {
        assert_eq!(wip_label(3, Some(5)), "3/5");
        assert_eq!(wip_label(3, None), "3");
        assert_eq!(wip_label(3, Some(0)), "3");
    }

    #[test]
    fn test_over_wip_limit() {
        assert!(over_wip_limit(6, Some(5)));
        assert!(!over_wip_limit(5, Some(5)));
        assert!(!over_wip_limit(50, None));
    }
}
