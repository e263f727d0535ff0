//! Board List Component
//!
//! Boards of the current workspace (or every workspace), favorites first.

use std::collections::BTreeSet;

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::api;
use crate::context::use_services;
use crate::models::{Board, BoardCreate};
use crate::preferences::ViewMode;
use crate::store::{store_upsert_board, use_app_store, AppStateStoreFields, View};
use crate::text::{normalize_to_single_line, truncate};
use crate::toast::use_toaster;

const DESCRIPTION_PREVIEW: usize = 120;

/// Filter by workspace and archive flag, favorites first, then by position
pub fn arrange_boards(
    boards: &[Board],
    workspace_id: Option<&str>,
    show_archived: bool,
    favorites: &BTreeSet<String>,
) -> Vec<Board> {
    let mut visible: Vec<Board> = boards
        .iter()
        .filter(|b| workspace_id.is_none_or(|ws| b.workspace_id == ws))
        .filter(|b| b.archived == show_archived)
        .cloned()
        .collect();
    visible.sort_by_key(|b| (!favorites.contains(&b.id), b.position, b.name.to_lowercase()));
    visible
}

#[component]
pub fn BoardList() -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();

    let (favorites, set_favorites) = signal(services.with_value(|s| s.prefs.favorite_boards()));
    let (view_mode, set_view_mode) = signal(services.with_value(|s| s.prefs.view_mode()));
    let (show_archived, set_show_archived) = signal(false);
    let (adding, set_adding) = signal(false);
    let (new_name, set_new_name) = signal(String::new());

    // Load boards when the workspace changes or a reload is requested
    Effect::new(move |_| {
        let _ = store.boards_version().get();
        let workspace_id = store.current_workspace_id().get();
        let services = services.get_value();
        spawn_local(async move {
            match api::list_boards(&services.api, workspace_id.as_deref()).await {
                Ok(boards) => store.boards().set(boards),
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    });

    let arranged = move || {
        let workspace_id = store.current_workspace_id().get();
        favorites.with(|favs| {
            store.boards().with(|boards| arrange_boards(boards, workspace_id.as_deref(), show_archived.get(), favs))
        })
    };

    let toggle_favorite = move |board_id: String| {
        let result = services.with_value(|s| s.prefs.toggle_favorite(&board_id));
        match result {
            Ok(_) => set_favorites.set(services.with_value(|s| s.prefs.favorite_boards())),
            Err(e) => {
                warn!("Failed to save favorite: {}", e);
                toaster.error("Could not save favorite");
            }
        }
    };

    let switch_view = move |mode: ViewMode| {
        if let Err(e) = services.with_value(|s| s.prefs.set_view_mode(mode)) {
            warn!("Failed to save view mode: {}", e);
        }
        set_view_mode.set(mode);
    };

    let on_create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = normalize_to_single_line(&new_name.get());
        if name.is_empty() {
            return;
        }
        let Some(workspace_id) = store.current_workspace_id().get_untracked() else {
            toaster.warning("Pick a workspace first");
            return;
        };
        let services = services.get_value();
        spawn_local(async move {
            let body = BoardCreate {
                name,
                workspace_id,
                description: None,
                is_private: None,
                background_color: None,
            };
            match api::create_board(&services.api, &body).await {
                Ok(board) => {
                    let id = board.id.clone();
                    store_upsert_board(&store, board);
                    store.view().set(View::Board(id));
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
        <section class="board-list">
            <header class="board-list-header">
                <h2>{move || if show_archived.get() { "Archived boards" } else { "Boards" }}</h2>
                <div class="board-list-controls">
                    <button
                        class=move || if view_mode.get() == ViewMode::Grid { "view-btn active" } else { "view-btn" }
                        on:click=move |_| switch_view(ViewMode::Grid)
                    >"Grid"</button>
                    <button
                        class=move || if view_mode.get() == ViewMode::List { "view-btn active" } else { "view-btn" }
                        on:click=move |_| switch_view(ViewMode::List)
                    >"List"</button>
                    <label class="archived-toggle">
                        <input
                            type="checkbox"
                            prop:checked=move || show_archived.get()
                            on:change=move |ev| set_show_archived.set(event_target_checked(&ev))
                        />
                        "Show archived"
                    </label>
                </div>
            </header>

            <div class=move || match view_mode.get() {
                ViewMode::Grid => "boards boards-grid",
                ViewMode::List => "boards boards-list",
            }>
                <For
                    each=arranged
                    key=|b| (b.id.clone(), b.name.clone(), b.archived)
                    children=move |board| {
                        let id = board.id.clone();
                        let open_id = id.clone();
                        let fav_id = id.clone();
                        let is_favorite = Signal::derive(move || favorites.with(|f| f.contains(&id)));
                        let style = board
                            .background_color
                            .as_ref()
                            .map(|c| format!("background-color: {}", c))
                            .unwrap_or_default();
                        view! {
                            <div class="board-tile" style=style on:click=move |_| store.view().set(View::Board(open_id.clone()))>
                                <div class="board-tile-title">
                                    {board.name.clone()}
                                    {board.is_private.then(|| view! { <span class="board-private" title="Private">"🔒"</span> })}
                                </div>
                                {board.description.as_deref().map(|d| view! {
                                    <p class="board-tile-desc">{truncate(d, DESCRIPTION_PREVIEW)}</p>
                                })}
                                {board.workspace_name.clone().map(|ws| view! { <span class="board-tile-ws">{ws}</span> })}
                                <button
                                    class=move || if is_favorite.get() { "favorite-btn active" } else { "favorite-btn" }
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        toggle_favorite(fav_id.clone());
                                    }
                                >
                                    {move || if is_favorite.get() { "★" } else { "☆" }}
                                </button>
                            </div>
                        }
                    }
                />

                <Show when=move || !show_archived.get() && store.current_workspace_id().with(Option::is_some)>
                    {move || if adding.get() {
                        view! {
                            <form class="board-add-form" on:submit=on_create>
                                <input
                                    type="text"
                                    placeholder="Board name"
                                    prop:value=move || new_name.get()
                                    on:input=move |ev| set_new_name.set(event_target_value(&ev))
                                />
                                <button type="submit">"Create"</button>
                                <button type="button" on:click=move |_| set_adding.set(false)>"Cancel"</button>
                            </form>
                        }.into_any()
                    } else {
                        view! {
                            <button class="board-add-btn" on:click=move |_| set_adding.set(true)>"+ New board"</button>
                        }.into_any()
                    }}
                </Show>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(id: &str, workspace: &str, position: i32, archived: bool) -> Board {
        let mut board: Board = serde_json::from_value(serde_json::json!({
            "id": id, "name": id.to_uppercase(), "workspaceId": workspace, "position": position,
        }))
        .unwrap();
        board.archived = archived;
        board
    }

    fn ids(boards: &[Board]) -> Vec<&str> {
        boards.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_favorites_first_then_position() {
        let boards = vec![board("a", "w1", 0, false), board("b", "w1", 1, false), board("c", "w1", 2, false)];
        let favorites = BTreeSet::from(["c".to_string()]);
        assert_eq!(ids(&arrange_boards(&boards, None, false, &favorites)), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_filters_workspace_and_archived() {
        let boards = vec![board("a", "w1", 0, false), board("b", "w2", 0, false), board("c", "w1", 1, true)];
        let none = BTreeSet::new();
        assert_eq!(ids(&arrange_boards(&boards, Some("w1"), false, &none)), vec!["a"]);
        assert_eq!(ids(&arrange_boards(&boards, Some("w1"), true, &none)), vec!["c"]);
        assert_eq!(ids(&arrange_boards(&boards, None, false, &none)), vec!["a", "b"]);
    }
}
