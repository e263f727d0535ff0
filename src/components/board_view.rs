//! Board View Component
//!
//! Columns and cards of one board with drag-and-drop reordering. Drops are
//! applied locally first, then confirmed with the server; a rejected drop
//! reloads the whole board.

use std::future::Future;
use std::sync::Arc;

use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{bind_global_listeners, create_dnd_signals, resolve_insert_index, DndSignals, DragSource, DropSlot, GlobalListeners};
use tracing::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::api;
use crate::board_state::BoardState;
use crate::board_sync::{commit_change, load_board, settle, BoardChange, Settlement};
use crate::components::{ArchivedPanel, BoardColumnView, CardDetail, DeleteConfirmButton, DropMarker, ShareBoardPanel};
use crate::context::{use_services, Services};
use crate::http::ApiClient;
use crate::models::{ColumnCreate, MemberRole};
use crate::permissions;
use crate::store::{store_remove_board, store_upsert_board, use_app_store, AppStateStoreFields, View};
use crate::text::normalize_to_single_line;
use crate::toast::{use_toaster, Toaster};

/// Board-wide handles shared with columns, cards and the detail panel
#[derive(Clone, Copy)]
pub struct BoardCtx {
    pub board_id: StoredValue<String>,
    pub state: RwSignal<Option<BoardState>>,
    pub role: Memo<MemberRole>,
    pub user_id: Memo<Option<String>>,
    pub cards_dnd: DndSignals<String>,
    pub columns_dnd: DndSignals<String>,
    pub selected_card: RwSignal<Option<String>>,
    /// Optimistic changes still waiting for the server
    pub pending: RwSignal<u32>,
    services: StoredValue<Services>,
    pub toaster: Toaster,
}

impl BoardCtx {
    pub fn api(&self) -> Arc<ApiClient> {
        self.services.with_value(|s| s.api.clone())
    }

    pub fn services(&self) -> Services {
        self.services.get_value()
    }

    /// Fetch the board again. `quiet` suppresses the error toast.
    pub fn reload(&self, quiet: bool) {
        let this = *self;
        let api = self.api();
        let board_id = self.board_id.get_value();
        spawn_local(async move {
            match load_board(&api, &board_id).await {
                Ok(state) => this.state.set(Some(state)),
                Err(e) if quiet => debug!("Background refresh of {} failed: {}", board_id, e),
                Err(e) => {
                    this.toaster.error(e.user_message());
                }
            }
        });
    }

    fn drop_card(&self, source: DragSource<String>, slot: DropSlot<String>) {
        let change = self.state.try_update(|s| s.as_mut().and_then(|s| card_drop(s, &source, &slot))).flatten();
        if let Some(change) = change {
            self.confirm(change);
        }
    }

    fn drop_column(&self, source: DragSource<String>, slot: DropSlot<String>) {
        let change = self.state.try_update(|s| s.as_mut().and_then(|s| column_drop(s, &source, &slot))).flatten();
        if let Some(change) = change {
            self.confirm(change);
        }
    }

    fn confirm(&self, change: BoardChange) {
        let this = *self;
        let confirmation = confirm_change(self.api(), self.board_id.get_value(), self.pending, change);
        spawn_local(async move {
            if let Some(message) = absorb_settlement(this.state, confirmation.await) {
                this.toaster.error(message);
            }
        });
    }

    fn is_dragging(&self) -> bool {
        self.cards_dnd.dragging_read.with_untracked(Option::is_some)
            || self.columns_dnd.dragging_read.with_untracked(Option::is_some)
    }
}

fn card_drop(state: &mut BoardState, source: &DragSource<String>, slot: &DropSlot<String>) -> Option<BoardChange> {
    let to_index = resolve_insert_index(source, slot);
    let mv = state.move_card(&source.container, source.index, &slot.container, to_index)?;
    info!("Card {} moved to {} at {}", mv.card_id, mv.to_column, mv.to_index);
    Some(BoardChange::Card(mv))
}

fn column_drop(state: &mut BoardState, source: &DragSource<String>, slot: &DropSlot<String>) -> Option<BoardChange> {
    let mv = state.reorder_column(source.index, resolve_insert_index(source, slot))?;
    info!("Column {} moved to {}", mv.column_id, mv.to_index);
    Some(BoardChange::Column(mv))
}

/// Counts the change as pending right away; the returned future commits it,
/// settles the outcome and releases the count.
fn confirm_change(
    api: Arc<ApiClient>,
    board_id: String,
    pending: RwSignal<u32>,
    change: BoardChange,
) -> impl Future<Output = Settlement> + 'static {
    pending.update(|n| *n += 1);
    async move {
        let result = commit_change(&api, &change).await;
        let settlement = settle(&api, &board_id, result).await;
        pending.update(|n| *n = n.saturating_sub(1));
        settlement
    }
}

/// Take in a reloaded board; returns the message to show, if any
fn absorb_settlement(state: RwSignal<Option<BoardState>>, settlement: Settlement) -> Option<String> {
    match settlement {
        Settlement::Confirmed => None,
        Settlement::Reloaded { state: fresh, error } => {
            state.set(Some(fresh));
            Some(error.user_message())
        }
        Settlement::ReloadFailed { error } => Some(format!("{} The board could not be refreshed.", error.user_message())),
    }
}

/// Single-flag board edits from the header
#[derive(Debug, Clone, Copy, PartialEq)]
enum BoardToggle {
    Archived(bool),
    Private(bool),
}

impl BoardToggle {
    fn done_message(self) -> &'static str {
        match self {
            BoardToggle::Archived(true) => "Board archived",
            BoardToggle::Archived(false) => "Board restored",
            BoardToggle::Private(true) => "Board is now private",
            BoardToggle::Private(false) => "Board is now public",
        }
    }
}

pub fn use_board() -> BoardCtx {
    expect_context::<BoardCtx>()
}

/// Refresh triggers that live as long as the board view
struct BackgroundRefresh {
    _interval: Interval,
    on_visible: Closure<dyn FnMut(web_sys::Event)>,
}

impl BackgroundRefresh {
    fn start(ctx: BoardCtx, period_ms: u32) -> Self {
        let refresh = move || {
            let hidden = web_sys::window()
                .and_then(|w| w.document())
                .map(|d| d.hidden())
                .unwrap_or(false);
            if !hidden && !ctx.is_dragging() && ctx.pending.get_untracked() == 0 {
                ctx.reload(true);
            }
        };
        let interval = Interval::new(period_ms, refresh);
        let on_visible = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| refresh());
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            let _ = doc.add_event_listener_with_callback("visibilitychange", on_visible.as_ref().unchecked_ref());
        }
        Self { _interval: interval, on_visible }
    }
}

impl Drop for BackgroundRefresh {
    fn drop(&mut self) {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            let _ = doc.remove_event_listener_with_callback("visibilitychange", self.on_visible.as_ref().unchecked_ref());
        }
    }
}

#[component]
pub fn BoardView(board_id: String) -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();

    let state = RwSignal::new(None::<BoardState>);
    let user_id = Memo::new(move |_| store.user().with(|u| u.as_ref().map(|u| u.id.clone())));
    let role = Memo::new(move |_| {
        let uid = user_id.get();
        state.with(|s| {
            s.as_ref()
                .zip(uid.as_deref())
                .and_then(|(s, uid)| s.board.role_of(uid))
                .unwrap_or(MemberRole::Member)
        })
    });

    let ctx = BoardCtx {
        board_id: StoredValue::new(board_id),
        state,
        role,
        user_id,
        cards_dnd: create_dnd_signals(),
        columns_dnd: create_dnd_signals(),
        selected_card: RwSignal::new(None),
        pending: RwSignal::new(0),
        services,
        toaster,
    };
    provide_context(ctx);
    ctx.reload(false);

    let period = services.with_value(|s| s.config.board_refresh_interval_ms);
    let listeners: StoredValue<Option<(GlobalListeners, GlobalListeners, BackgroundRefresh)>, LocalStorage> =
        StoredValue::new_local(Some((
            bind_global_listeners(ctx.cards_dnd, move |source, slot| ctx.drop_card(source, slot)),
            bind_global_listeners(ctx.columns_dnd, move |source, slot| ctx.drop_column(source, slot)),
            BackgroundRefresh::start(ctx, period),
        )));
    on_cleanup(move || {
        let _ = listeners.try_update_value(Option::take);
    });

    let (show_archived, set_show_archived) = signal(false);
    let (show_share, set_show_share) = signal(false);
    let (new_column, set_new_column) = signal(String::new());

    let on_add_column = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = normalize_to_single_line(&new_column.get());
        if name.is_empty() {
            return;
        }
        let position = state.with_untracked(|s| s.as_ref().map(BoardState::next_column_position).unwrap_or(0));
        let body = ColumnCreate {
            name,
            board_id: ctx.board_id.get_value(),
            position: Some(position),
            wip_limit: None,
        };
        let api = ctx.api();
        spawn_local(async move {
            match api::create_column(&api, &body).await {
                Ok(column) => state.update(|s| {
                    if let Some(s) = s {
                        s.push_column(column);
                    }
                }),
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
        set_new_column.set(String::new());
    };

    let toggle_board = move |toggle: BoardToggle| {
        let api = ctx.api();
        let board_id = ctx.board_id.get_value();
        spawn_local(async move {
            let result = match toggle {
                BoardToggle::Archived(archived) => api::set_board_archived(&api, &board_id, archived).await,
                BoardToggle::Private(private) => api::set_board_private(&api, &board_id, private).await,
            };
            match result {
                Ok(board) => {
                    state.update(|s| {
                        if let Some(s) = s {
                            s.board = board.clone();
                        }
                    });
                    store_upsert_board(&store, board);
                    toaster.success(toggle.done_message());
                    if toggle == BoardToggle::Archived(true) {
                        store.view().set(View::Boards);
                    }
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    };

    let on_delete_board = move || {
        let api = ctx.api();
        let board_id = ctx.board_id.get_value();
        spawn_local(async move {
            match api::delete_board(&api, &board_id).await {
                Ok(()) => {
                    store_remove_board(&store, &board_id);
                    store.view().set(View::Boards);
                    toaster.success("Board deleted");
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    };

    let board_name = move || state.with(|s| s.as_ref().map(|s| s.board.name.clone()).unwrap_or_default());
    let is_private = move || state.with(|s| s.as_ref().is_some_and(|s| s.board.is_private));
    let is_archived = move || state.with(|s| s.as_ref().is_some_and(|s| s.board.archived));
    let background = move || {
        state.with(|s| {
            s.as_ref()
                .and_then(|s| s.board.background_color.clone())
                .map(|c| format!("background-color: {}", c))
                .unwrap_or_default()
        })
    };

    view! {
        <section class="board-view" style=background>
            <header class="board-header">
                <button class="board-back" on:click=move |_| store.view().set(View::Boards)>"← Boards"</button>
                <h2>{board_name}</h2>
                <Show when=move || permissions::can_edit_board(role.get())>
                    <button class="board-privacy" on:click=move |_| toggle_board(BoardToggle::Private(!is_private()))>
                        {move || if is_private() { "Private" } else { "Public" }}
                    </button>
                    <button class="board-archive" on:click=move |_| toggle_board(BoardToggle::Archived(!is_archived()))>
                        {move || if is_archived() { "Restore board" } else { "Archive board" }}
                    </button>
                </Show>
                <Show when=move || permissions::can_manage_board_members(role.get())>
                    <button class="board-share" on:click=move |_| set_show_share.update(|v| *v = !*v)>"Share"</button>
                </Show>
                <button class="board-archived-toggle" on:click=move |_| set_show_archived.update(|v| *v = !*v)>
                    "Archived items"
                </button>
                <Show when=move || permissions::can_delete_board(role.get())>
                    <DeleteConfirmButton
                        button_class="board-delete"
                        label="Delete board"
                        prompt="Delete this board and everything on it?"
                        on_confirm=Callback::new(move |_| on_delete_board())
                    />
                </Show>
            </header>

            <Show when=move || state.with(Option::is_some) fallback=|| view! { <p class="board-loading">"Loading board..."</p> }>
                <div class="board-columns">
                    {move || {
                        let columns = state.with(|s| s.as_ref().map(BoardState::active_columns).unwrap_or_default());
                        let count = columns.len();
                        let board_id = ctx.board_id.get_value();
                        let tail_id = board_id.clone();
                        view! {
                            {columns
                                .into_iter()
                                .enumerate()
                                .map(|(index, column)| {
                                    let target = DropSlot { container: board_id.clone(), index };
                                    view! {
                                        <DropMarker dnd=ctx.columns_dnd target=target vertical=true />
                                        <BoardColumnView column=column index=index />
                                    }
                                })
                                .collect_view()}
                            <DropMarker dnd=ctx.columns_dnd target=DropSlot { container: tail_id, index: count } vertical=true />
                        }
                    }}
                    <Show when=move || permissions::can_create_column(role.get())>
                        <form class="column-add-form" on:submit=on_add_column>
                            <input
                                type="text"
                                placeholder="Add a column"
                                prop:value=move || new_column.get()
                                on:input=move |ev| set_new_column.set(event_target_value(&ev))
                            />
                        </form>
                    </Show>
                </div>
            </Show>

            <Show when=move || show_share.get()>
                <ShareBoardPanel on_close=Callback::new(move |_| set_show_share.set(false)) />
            </Show>

            <Show when=move || show_archived.get()>
                <ArchivedPanel on_close=Callback::new(move |_| set_show_archived.set(false)) />
            </Show>

            {move || ctx.selected_card.get().map(|card_id| view! { <CardDetail card_id=card_id /> })}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{card, column, harness, MockBackend};
    use futures::executor::block_on;
    use serde_json::json;

    fn script_board(backend: &MockBackend) {
        backend
            .respond(200, r#"{"id":"b1","name":"Roadmap","workspaceId":"w1"}"#)
            .respond_json(200, json!([column("todo", 0), column("done", 1)]))
            .respond_json(200, json!([card("c1", "todo", 0), card("c2", "todo", 1)]))
            .respond_json(200, json!([card("c3", "done", 0)]));
    }

    fn ids(state: RwSignal<Option<BoardState>>, column_id: &str) -> Vec<String> {
        state.with_untracked(|s| {
            s.as_ref()
                .map(|s| s.cards_for(column_id).iter().map(|c| c.id.clone()).collect())
                .unwrap_or_default()
        })
    }

    fn slot(container: &str, index: usize) -> DropSlot<String> {
        DropSlot { container: container.to_string(), index }
    }

    fn source(container: &str, index: usize) -> DragSource<String> {
        DragSource { container: container.to_string(), index }
    }

    #[test]
    fn test_confirmed_drop_keeps_local_order() {
        let owner = Owner::new();
        owner.with(|| {
            let h = harness();
            let backend = h.backend.clone();
            let api = Arc::new(h.api);
            script_board(&backend);
            let state = RwSignal::new(block_on(load_board(&api, "b1")).ok());
            let pending = RwSignal::new(0u32);

            let change = state
                .try_update(|s| s.as_mut().and_then(|s| card_drop(s, &source("todo", 0), &slot("done", 1))))
                .flatten()
                .unwrap();
            assert_eq!(ids(state, "done"), vec!["c3", "c1"]);

            backend.respond_json(200, json!(card("c1", "done", 1)));
            let confirmation = confirm_change(api.clone(), "b1".into(), pending, change);
            assert_eq!(pending.get_untracked(), 1);
            let settlement = block_on(confirmation);
            assert_eq!(pending.get_untracked(), 0);

            assert_eq!(absorb_settlement(state, settlement), None);
            assert_eq!(ids(state, "todo"), vec!["c2"]);
            assert_eq!(ids(state, "done"), vec!["c3", "c1"]);
        });
    }

    #[test]
    fn test_rejected_drop_restores_server_order() {
        let owner = Owner::new();
        owner.with(|| {
            let h = harness();
            let backend = h.backend.clone();
            let api = Arc::new(h.api);
            script_board(&backend);
            let state = RwSignal::new(block_on(load_board(&api, "b1")).ok());
            let pending = RwSignal::new(0u32);

            let change = state
                .try_update(|s| s.as_mut().and_then(|s| card_drop(s, &source("todo", 1), &slot("done", 0))))
                .flatten()
                .unwrap();
            assert_eq!(ids(state, "done"), vec!["c2", "c3"]);

            backend.respond(409, r#"{"message":"Card was moved by someone else"}"#);
            script_board(&backend);
            let settlement = block_on(confirm_change(api.clone(), "b1".into(), pending, change));
            assert_eq!(pending.get_untracked(), 0);

            let message = absorb_settlement(state, settlement);
            assert_eq!(message.as_deref(), Some("Card was moved by someone else"));
            assert_eq!(ids(state, "todo"), vec!["c1", "c2"]);
            assert_eq!(ids(state, "done"), vec!["c3"]);
        });
    }

    #[test]
    fn test_column_drop_on_neighbour_slot_is_ignored() {
        let owner = Owner::new();
        owner.with(|| {
            let h = harness();
            script_board(&h.backend);
            let mut board = block_on(load_board(&h.api, "b1")).unwrap();
            assert!(column_drop(&mut board, &source("b1", 0), &slot("b1", 1)).is_none());
            match column_drop(&mut board, &source("b1", 1), &slot("b1", 0)) {
                Some(BoardChange::Column(mv)) => assert_eq!(mv.column_id, "done"),
                other => panic!("expected column change, got {:?}", other),
            }
        });
    }
}
