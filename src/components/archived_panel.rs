//! Archived Items Panel
//!
//! Archived cards and columns of the open board, with restore.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::board_state::BoardState;
use crate::components::use_board;
use crate::models::{Card, ColumnUpdate};
use crate::permissions;

#[component]
pub fn ArchivedPanel(#[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let ctx = use_board();
    let (cards, set_cards) = signal(Vec::<Card>::new());

    let api = ctx.api();
    let board_id = ctx.board_id.get_value();
    spawn_local(async move {
        match api::list_archived_cards(&api, &board_id).await {
            Ok(list) => set_cards.set(list),
            Err(e) => {
                ctx.toaster.error(e.user_message());
            }
        }
    });

    let restore_card = move |card_id: String| {
        let api = ctx.api();
        spawn_local(async move {
            match api::set_card_archived(&api, &card_id, false).await {
                Ok(card) => {
                    set_cards.update(|list| list.retain(|c| c.id != card_id));
                    ctx.state.update(|s| {
                        if let Some(s) = s {
                            s.restore_card(card);
                        }
                    });
                    ctx.toaster.success("Card restored");
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let restore_column = move |column_id: String| {
        let position = ctx.state.with_untracked(|s| s.as_ref().map(BoardState::next_column_position).unwrap_or(0));
        let update = ColumnUpdate {
            archived: Some(false),
            position: Some(position),
            ..Default::default()
        };
        let api = ctx.api();
        spawn_local(async move {
            match api::update_column(&api, &column_id, &update).await {
                Ok(column) => {
                    ctx.state.update(|s| {
                        if let Some(s) = s {
                            s.replace_column(column);
                        }
                    });
                    ctx.toaster.success("Column restored");
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let archived_columns = move || ctx.state.with(|s| s.as_ref().map(BoardState::archived_columns).unwrap_or_default());
    let column_name = move |column_id: &str| {
        ctx.state.with(|s| {
            s.as_ref()
                .and_then(|s| s.column_name(column_id).map(str::to_string))
                .unwrap_or_default()
        })
    };
    let can_restore = move || permissions::can_edit_column(ctx.role.get());

    view! {
        <aside class="archived-panel">
            <header>
                <h3>"Archived items"</h3>
                <button class="panel-close" on:click=move |_| on_close.run(())>"×"</button>
            </header>

            <h4>"Cards"</h4>
            <Show when=move || cards.with(|c| !c.is_empty()) fallback=|| view! { <p class="empty">"No archived cards"</p> }>
                <ul class="archived-list">
                    <For
                        each=move || cards.get()
                        key=|c| c.id.clone()
                        children=move |card| {
                            let id = card.id.clone();
                            let from = column_name(&card.column_id);
                            view! {
                                <li>
                                    <span class="archived-title">{card.title.clone()}</span>
                                    <span class="archived-origin">{from}</span>
                                    <Show when=can_restore>
                                        {
                                            let id = id.clone();
                                            view! { <button on:click=move |_| restore_card(id.clone())>"Restore"</button> }
                                        }
                                    </Show>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>

            <h4>"Columns"</h4>
            <Show when=move || !archived_columns().is_empty() fallback=|| view! { <p class="empty">"No archived columns"</p> }>
                <ul class="archived-list">
                    <For
                        each=archived_columns
                        key=|c| c.id.clone()
                        children=move |column| {
                            let id = column.id.clone();
                            view! {
                                <li>
                                    <span class="archived-title">{column.name.clone()}</span>
                                    <Show when=can_restore>
                                        {
                                            let id = id.clone();
                                            view! { <button on:click=move |_| restore_column(id.clone())>"Restore"</button> }
                                        }
                                    </Show>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </aside>
    }
}
