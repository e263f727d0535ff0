//! Search Panel Component
//!
//! Results of a global search, grouped by kind.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::api;
use crate::context::use_services;
use crate::models::SearchResult;
use crate::store::{use_app_store, AppStateStoreFields, View};
use crate::toast::use_toaster;

#[component]
pub fn SearchPanel(query: String) -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();
    let result = RwSignal::new(None::<SearchResult>);
    let heading = format!("Results for \"{}\"", query.trim());

    let api = services.with_value(|s| s.api.clone());
    spawn_local(async move {
        match api::search(&api, &query).await {
            Ok(found) => result.set(Some(found)),
            Err(e) => {
                toaster.error(e.user_message());
                result.set(Some(SearchResult::default()));
            }
        }
    });

    let open_workspace = move |id: String| {
        if let Err(e) = services.with_value(|s| s.prefs.set_current_workspace(Some(&id))) {
            warn!("Failed to save workspace selection: {}", e);
        }
        store.current_workspace_id().set(Some(id));
        store.view().set(View::Boards);
    };
    let open_board = move |id: String| store.view().set(View::Board(id));

    view! {
        <section class="search-panel">
            <h2>{heading}</h2>
            {move || match result.get() {
                None => view! { <p>"Searching..."</p> }.into_any(),
                Some(found) if found.is_empty() => view! { <p class="empty">"Nothing matched"</p> }.into_any(),
                Some(found) => view! {
                    <p class="search-total">{format!("{} results", found.total())}</p>
                    {(!found.workspaces.is_empty()).then(|| view! {
                        <h3>"Workspaces"</h3>
                        <ul>
                            {found.workspaces.iter().map(|ws| {
                                let id = ws.id.clone();
                                view! { <li on:click=move |_| open_workspace(id.clone())>{ws.name.clone()}</li> }
                            }).collect_view()}
                        </ul>
                    })}
                    {(!found.boards.is_empty()).then(|| view! {
                        <h3>"Boards"</h3>
                        <ul>
                            {found.boards.iter().map(|b| {
                                let id = b.id.clone();
                                view! {
                                    <li on:click=move |_| open_board(id.clone())>
                                        {b.name.clone()}
                                        <span class="search-context">{b.workspace_name.clone()}</span>
                                    </li>
                                }
                            }).collect_view()}
                        </ul>
                    })}
                    {(!found.columns.is_empty()).then(|| view! {
                        <h3>"Columns"</h3>
                        <ul>
                            {found.columns.iter().map(|c| {
                                let id = c.board_id.clone();
                                view! {
                                    <li on:click=move |_| open_board(id.clone())>
                                        {c.name.clone()}
                                        <span class="search-context">{format!("{} / {}", c.workspace_name, c.board_name)}</span>
                                    </li>
                                }
                            }).collect_view()}
                        </ul>
                    })}
                    {(!found.cards.is_empty()).then(|| view! {
                        <h3>"Cards"</h3>
                        <ul>
                            {found.cards.iter().map(|c| {
                                let id = c.board_id.clone();
                                view! {
                                    <li on:click=move |_| open_board(id.clone())>
                                        {c.title.clone()}
                                        <span class="search-context">{format!("{} / {} / {}", c.workspace_name, c.board_name, c.column_name)}</span>
                                    </li>
                                }
                            }).collect_view()}
                        </ul>
                    })}
                }.into_any(),
            }}
        </section>
    }
}
