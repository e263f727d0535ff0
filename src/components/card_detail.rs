//! Card Detail Component
//!
//! Side panel for one card: title, description (markdown), due date,
//! members, labels, comments and recent activity.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{self, ActivityScope};
use crate::components::{use_board, ActivityFeed, CardMembers, DeleteConfirmButton, LabelManager};
use crate::models::{Card, CardUpdate, Comment, Label};
use crate::markdown::render_markdown;
use crate::permissions;
use crate::text::{date_input_value, due_date_from_input, normalize_to_single_line, time_ago};

/// Changes between the saved card and the form, or `None` if nothing changed
pub fn card_changes(card: &Card, title: &str, description: &str, due_input: &str) -> Option<CardUpdate> {
    let mut update = CardUpdate::default();
    let title = normalize_to_single_line(title);
    if !title.is_empty() && title != card.title {
        update.title = Some(title);
    }
    if description != card.description.as_deref().unwrap_or_default() {
        update.description = Some(description.to_string());
    }
    let saved_due = card.due_date.as_deref().map(date_input_value).unwrap_or_default();
    if due_input.trim() != saved_due {
        match due_date_from_input(due_input) {
            Some(due) => update.due_date = Some(due),
            None => update.clear_due_date = Some(true),
        }
    }
    let changed = update.title.is_some()
        || update.description.is_some()
        || update.due_date.is_some()
        || update.clear_due_date.is_some();
    changed.then_some(update)
}

#[component]
pub fn CardDetail(card_id: String) -> impl IntoView {
    let ctx = use_board();
    let card_id = StoredValue::new(card_id);
    let card = RwSignal::new(None::<Card>);
    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (due, set_due) = signal(String::new());
    let (previewing, set_previewing) = signal(true);
    let board_labels = RwSignal::new(Vec::<Label>::new());
    let (managing_labels, set_managing_labels) = signal(false);
    let (comments, set_comments) = signal(Vec::<Comment>::new());
    let (new_comment, set_new_comment) = signal(String::new());

    let fill_form = move |c: &Card| {
        set_title.set(c.title.clone());
        set_description.set(c.description.clone().unwrap_or_default());
        set_due.set(c.due_date.as_deref().map(date_input_value).unwrap_or_default());
    };

    // Fresh copy of the card plus everything hanging off it
    {
        let api = ctx.api();
        let id = card_id.get_value();
        let board_id = ctx.board_id.get_value();
        spawn_local(async move {
            match api::get_card(&api, &id).await {
                Ok(c) => {
                    fill_form(&c);
                    card.set(Some(c));
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                    ctx.selected_card.set(None);
                    return;
                }
            }
            if let Ok(labels) = api::list_labels(&api, &board_id).await {
                board_labels.set(labels);
            }
            if let Ok(list) = api::list_comments(&api, &id).await {
                set_comments.set(list);
            }
        });
    }

    let role = move || ctx.role.get();
    let user_id = move || ctx.user_id.get().unwrap_or_default();
    let can_edit = move || {
        let uid = user_id();
        let card_role = card.with(|c| c.as_ref().and_then(|c| c.role_of(&uid)));
        permissions::can_edit_card(role(), card_role)
    };

    let store_card = move |c: Card| {
        ctx.state.update(|s| {
            if let Some(s) = s {
                s.upsert_card(c.clone());
            }
        });
        card.set(Some(c));
    };

    let close = move || ctx.selected_card.set(None);

    let on_save = move |_| {
        let Some(update) = card.with_untracked(|c| {
            c.as_ref().and_then(|c| card_changes(c, &title.get_untracked(), &description.get_untracked(), &due.get_untracked()))
        }) else {
            return;
        };
        let api = ctx.api();
        let id = card_id.get_value();
        spawn_local(async move {
            match api::update_card(&api, &id, &update).await {
                Ok(c) => {
                    fill_form(&c);
                    store_card(c);
                    set_previewing.set(true);
                    ctx.toaster.success("Card saved");
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let on_archive = move |_| {
        let api = ctx.api();
        let id = card_id.get_value();
        spawn_local(async move {
            match api::set_card_archived(&api, &id, true).await {
                Ok(_) => {
                    ctx.state.update(|s| {
                        if let Some(s) = s {
                            s.remove_card(&id);
                        }
                    });
                    ctx.toaster.success("Card archived");
                    close();
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let on_delete = move || {
        let api = ctx.api();
        let id = card_id.get_value();
        spawn_local(async move {
            match api::delete_card(&api, &id).await {
                Ok(()) => {
                    ctx.state.update(|s| {
                        if let Some(s) = s {
                            s.remove_card(&id);
                        }
                    });
                    ctx.toaster.success("Card deleted");
                    close();
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let toggle_label = move |label_id: String| {
        let attached = card.with_untracked(|c| c.as_ref().is_some_and(|c| c.labels.iter().any(|l| l.id == label_id)));
        let api = ctx.api();
        let id = card_id.get_value();
        spawn_local(async move {
            let result = if attached {
                api::remove_label_from_card(&api, &id, &label_id).await
            } else {
                api::add_label_to_card(&api, &id, &label_id).await
            };
            let refreshed = match result {
                Ok(()) => api::get_card(&api, &id).await,
                Err(e) => Err(e),
            };
            match refreshed {
                Ok(c) => store_card(c),
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let on_comment = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let content = new_comment.get().trim().to_string();
        if content.is_empty() {
            return;
        }
        let api = ctx.api();
        let id = card_id.get_value();
        spawn_local(async move {
            match api::add_comment(&api, &id, &content).await {
                Ok(comment) => {
                    set_comments.update(|list| list.push(comment));
                    set_new_comment.set(String::new());
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let edit_comment = move |comment_id: String, content: String| {
        let api = ctx.api();
        spawn_local(async move {
            match api::update_comment(&api, &comment_id, &content).await {
                Ok(updated) => set_comments.update(|list| {
                    if let Some(c) = list.iter_mut().find(|c| c.id == updated.id) {
                        *c = updated;
                    }
                }),
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let delete_comment = move |comment_id: String| {
        let api = ctx.api();
        spawn_local(async move {
            match api::delete_comment(&api, &comment_id).await {
                Ok(()) => set_comments.update(|list| list.retain(|c| c.id != comment_id)),
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let column_name = move || {
        let column_id = card.with(|c| c.as_ref().map(|c| c.column_id.clone()));
        ctx.state.with(|s| {
            s.as_ref()
                .zip(column_id.as_deref())
                .and_then(|(s, id)| s.column_name(id).map(str::to_string))
                .unwrap_or_default()
        })
    };

    view! {
        <aside class="card-detail">
            <header class="card-detail-header">
                <span class="card-detail-column">{column_name}</span>
                <button class="panel-close" on:click=move |_| close()>"×"</button>
            </header>

            <Show when=move || card.with(Option::is_some) fallback=|| view! { <p>"Loading card..."</p> }>
                <input
                    class="card-detail-title"
                    type="text"
                    prop:value=move || title.get()
                    prop:readonly=move || !can_edit()
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                />

                <CardMembers card=card can_edit=Signal::derive(can_edit) on_updated=Callback::new(store_card) />

                <section class="card-detail-labels">
                    <h4>"Labels"</h4>
                    <For
                        each=move || board_labels.get()
                        key=|l| l.id.clone()
                        children=move |label| {
                            let id = label.id.clone();
                            let check_id = id.clone();
                            let on_card = move || card.with(|c| c.as_ref().is_some_and(|c| c.labels.iter().any(|l| l.id == check_id)));
                            view! {
                                <button
                                    class=move || if on_card() { "label-chip selected" } else { "label-chip" }
                                    style=format!("background-color: {}", label.color)
                                    disabled=move || !can_edit()
                                    on:click=move |_| toggle_label(id.clone())
                                >
                                    {label.name.clone()}
                                </button>
                            }
                        }
                    />
                    <Show when=move || permissions::can_manage_labels(role())>
                        <button class="label-manage-toggle" on:click=move |_| set_managing_labels.update(|v| *v = !*v)>
                            {move || if managing_labels.get() { "Done" } else { "Manage labels" }}
                        </button>
                    </Show>
                    <Show when=move || managing_labels.get()>
                        <LabelManager labels=board_labels />
                    </Show>
                </section>

                <section class="card-detail-due">
                    <h4>"Due date"</h4>
                    <input
                        type="date"
                        prop:value=move || due.get()
                        prop:disabled=move || !can_edit()
                        on:change=move |ev| set_due.set(event_target_value(&ev))
                    />
                    <Show when=move || !due.get().is_empty() && can_edit()>
                        <button class="due-clear" on:click=move |_| set_due.set(String::new())>"Clear"</button>
                    </Show>
                </section>

                <section class="card-detail-description">
                    <h4>"Description"</h4>
                    {move || if previewing.get() {
                        let html = render_markdown(&description.get());
                        view! {
                            <div class="markdown" inner_html=html on:dblclick=move |_| {
                                if can_edit() {
                                    set_previewing.set(false);
                                }
                            }></div>
                        }.into_any()
                    } else {
                        view! {
                            <textarea
                                class="description-editor"
                                prop:value=move || description.get()
                                on:input=move |ev| set_description.set(event_target_value(&ev))
                            ></textarea>
                        }.into_any()
                    }}
                </section>

                <Show when=can_edit>
                    <div class="card-detail-actions">
                        <button class="card-save" on:click=on_save>"Save"</button>
                        <button on:click=move |_| set_previewing.update(|p| *p = !*p)>
                            {move || if previewing.get() { "Edit description" } else { "Preview" }}
                        </button>
                        <button class="card-archive" on:click=on_archive>"Archive"</button>
                    </div>
                </Show>
                <Show when=move || permissions::can_delete_card(role())>
                    <DeleteConfirmButton
                        button_class="card-delete"
                        label="Delete card"
                        on_confirm=Callback::new(move |_| on_delete())
                    />
                </Show>

                <section class="card-detail-comments">
                    <h4>"Comments"</h4>
                    <For
                        each=move || comments.get()
                        key=|c| (c.id.clone(), c.content.clone())
                        children=move |comment| {
                            view! {
                                <CommentItem
                                    comment=comment
                                    on_edit=Callback::new(move |(id, content): (String, String)| edit_comment(id, content))
                                    on_delete=Callback::new(move |id: String| delete_comment(id))
                                />
                            }
                        }
                    />
                    <Show when=move || permissions::can_add_comment(role())>
                        <form class="comment-form" on:submit=on_comment>
                            <textarea
                                placeholder="Write a comment... use @name to mention"
                                prop:value=move || new_comment.get()
                                on:input=move |ev| set_new_comment.set(event_target_value(&ev))
                            ></textarea>
                            <button type="submit">"Comment"</button>
                        </form>
                    </Show>
                </section>

                <section class="card-detail-activity">
                    <h4>"Activity"</h4>
                    <ActivityFeed scope=ActivityScope::Entity(card_id.get_value()) />
                </section>
            </Show>
        </aside>
    }
}

#[component]
fn CommentItem(
    comment: Comment,
    on_edit: Callback<(String, String)>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let ctx = use_board();
    let author = StoredValue::new(comment.author_id.clone());
    let may_edit = move || {
        let uid = ctx.user_id.get().unwrap_or_default();
        author.with_value(|a| permissions::can_edit_comment(a, &uid, ctx.role.get()))
    };
    let may_delete = move || {
        let uid = ctx.user_id.get().unwrap_or_default();
        author.with_value(|a| permissions::can_delete_comment(a, &uid, ctx.role.get()))
    };
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(comment.content.clone());
    let id = StoredValue::new(comment.id.clone());
    let html = render_markdown(&comment.content);

    view! {
        <div class="comment">
            <div class="comment-meta">
                <strong>{comment.author_username.clone()}</strong>
                <span class="comment-time">{time_ago(&comment.created_at)}</span>
                {comment.edited.then(|| view! { <span class="comment-edited">"(edited)"</span> })}
            </div>
            {move || if editing.get() {
                view! {
                    <textarea
                        prop:value=move || draft.get()
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                    ></textarea>
                    <button on:click=move |_| {
                        let content = draft.get().trim().to_string();
                        if !content.is_empty() {
                            on_edit.run((id.get_value(), content));
                        }
                        set_editing.set(false);
                    }>"Save"</button>
                    <button on:click=move |_| set_editing.set(false)>"Cancel"</button>
                }.into_any()
            } else {
                view! { <div class="comment-body markdown" inner_html=html.clone()></div> }.into_any()
            }}
            <div class="comment-actions">
                <Show when=may_edit>
                    <button on:click=move |_| set_editing.set(true)>"Edit"</button>
                </Show>
                <Show when=may_delete>
                    <DeleteConfirmButton
                        button_class="comment-delete"
                        on_confirm=Callback::new(move |_| on_delete.run(id.get_value()))
                    />
                </Show>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::card;

    #[test]
    fn test_no_changes() {
        let mut c = card("c1", "todo", 0);
        c.description = Some("notes".into());
        assert!(card_changes(&c, "Card c1", "notes", "").is_none());
        assert!(card_changes(&c, "  ", "notes", "").is_none());
    }

    #[test]
    fn test_title_and_due_date() {
        let c = card("c1", "todo", 0);
        let update = card_changes(&c, "Ship\nit", "", "2026-04-01").unwrap();
        assert_eq!(update.title.as_deref(), Some("Ship it"));
        assert_eq!(update.due_date.as_deref(), Some("2026-04-01T12:00:00.000Z"));
        assert!(update.clear_due_date.is_none());
    }

    #[test]
    fn test_cleared_due_date() {
        let mut c = card("c1", "todo", 0);
        c.due_date = Some("2026-04-01T12:00:00.000Z".into());
        let update = card_changes(&c, "Card c1", "", "").unwrap();
        assert_eq!(update.clear_due_date, Some(true));
        assert!(update.due_date.is_none());
    }
}
