//! Label Manager Component
//!
//! Create, rename, recolor and delete the labels of the open board.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::{use_board, DeleteConfirmButton};
use crate::models::{Label, LabelCreate, LabelUpdate};
use crate::text::normalize_to_single_line;

const DEFAULT_COLOR: &str = "#3498db";
const MAX_LABEL_NAME: usize = 50;

/// Cleaned-up `(name, color)` or the reason the form is rejected
pub fn validate_label(name: &str, color: &str) -> Result<(String, String), &'static str> {
    let name = normalize_to_single_line(name);
    if name.is_empty() {
        return Err("Label name is required");
    }
    if name.chars().count() > MAX_LABEL_NAME {
        return Err("Label name is too long");
    }
    let color = color.trim().to_ascii_lowercase();
    let hex = color.strip_prefix('#').unwrap_or_default();
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Color must look like #rrggbb");
    }
    Ok((name, color))
}

#[component]
pub fn LabelManager(labels: RwSignal<Vec<Label>>) -> impl IntoView {
    let ctx = use_board();
    let (name, set_name) = signal(String::new());
    let (color, set_color) = signal(DEFAULT_COLOR.to_string());
    let editing = RwSignal::new(None::<String>);

    let reset_form = move || {
        editing.set(None);
        set_name.set(String::new());
        set_color.set(DEFAULT_COLOR.to_string());
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (clean_name, clean_color) = match validate_label(&name.get(), &color.get()) {
            Ok(valid) => valid,
            Err(reason) => {
                ctx.toaster.warning(reason);
                return;
            }
        };
        let api = ctx.api();
        let board_id = ctx.board_id.get_value();
        let editing_id = editing.get_untracked();
        spawn_local(async move {
            let result = match editing_id {
                Some(id) => {
                    let update = LabelUpdate {
                        name: Some(clean_name),
                        color: Some(clean_color),
                    };
                    api::update_label(&api, &id, &update).await
                }
                None => {
                    let body = LabelCreate {
                        name: clean_name,
                        color: clean_color,
                        board_id,
                    };
                    api::create_label(&api, &body).await
                }
            };
            match result {
                Ok(label) => {
                    labels.update(|list| match list.iter_mut().find(|l| l.id == label.id) {
                        Some(existing) => *existing = label,
                        None => list.push(label),
                    });
                    reset_form();
                    // Card tiles show label colors
                    ctx.reload(true);
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    let on_delete = move |label_id: String| {
        let api = ctx.api();
        spawn_local(async move {
            match api::delete_label(&api, &label_id).await {
                Ok(()) => {
                    labels.update(|list| list.retain(|l| l.id != label_id));
                    if editing.get_untracked().as_deref() == Some(label_id.as_str()) {
                        reset_form();
                    }
                    ctx.reload(true);
                    ctx.toaster.success("Label deleted");
                }
                Err(e) => {
                    ctx.toaster.error(e.user_message());
                }
            }
        });
    };

    view! {
        <div class="label-manager">
            <ul>
                <For
                    each=move || labels.get()
                    key=|l| (l.id.clone(), l.name.clone(), l.color.clone())
                    children=move |label| {
                        let id = StoredValue::new(label.id.clone());
                        let edit_name = label.name.clone();
                        let edit_color = label.color.clone();
                        view! {
                            <li>
                                <span class="label-swatch" style=format!("background-color: {}", label.color)></span>
                                <span class="label-name">{label.name.clone()}</span>
                                <button class="label-edit" on:click=move |_| {
                                    editing.set(Some(id.get_value()));
                                    set_name.set(edit_name.clone());
                                    set_color.set(edit_color.clone());
                                }>"Edit"</button>
                                <DeleteConfirmButton
                                    button_class="label-delete"
                                    prompt="Delete label from every card?"
                                    on_confirm=Callback::new(move |_| on_delete(id.get_value()))
                                />
                            </li>
                        }
                    }
                />
            </ul>
            <form class="label-form" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Label name"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <input
                    type="color"
                    prop:value=move || color.get()
                    on:input=move |ev| set_color.set(event_target_value(&ev))
                />
                <button type="submit">{move || if editing.with(Option::is_some) { "Save label" } else { "Add label" }}</button>
                <Show when=move || editing.with(Option::is_some)>
                    <button type="button" on:click=move |_| reset_form()>"Cancel"</button>
                </Show>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_label_is_cleaned() {
        assert_eq!(
            validate_label("  Bug\nfix ", "#E74C3C"),
            Ok(("Bug fix".to_string(), "#e74c3c".to_string()))
        );
    }

    #[test]
    fn test_rejected_labels() {
        assert_eq!(validate_label("   ", "#e74c3c"), Err("Label name is required"));
        assert_eq!(validate_label(&"x".repeat(51), "#e74c3c"), Err("Label name is too long"));
        assert_eq!(validate_label("Bug", "e74c3c"), Err("Color must look like #rrggbb"));
        assert_eq!(validate_label("Bug", "#e74c3"), Err("Color must look like #rrggbb"));
        assert_eq!(validate_label("Bug", "#zzzzzz"), Err("Color must look like #rrggbb"));
    }
}
