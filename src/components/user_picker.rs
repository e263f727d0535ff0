//! User Picker Component
//!
//! Debounced user search for adding members to boards and workspaces.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::context::use_services;
use crate::models::UserSummary;
use crate::toast::use_toaster;

const SEARCH_DELAY_MS: u32 = 300;
const MIN_KEYWORD_LEN: usize = 2;

/// Search results minus users that are already members
pub fn addable_users(results: Vec<UserSummary>, exclude_ids: &[String]) -> Vec<UserSummary> {
    results.into_iter().filter(|u| !exclude_ids.contains(&u.id)).collect()
}

#[component]
pub fn UserPicker(
    /// Ids of users already present
    #[prop(into)]
    exclude: Signal<Vec<String>>,
    #[prop(into)] on_pick: Callback<UserSummary>,
) -> impl IntoView {
    let services = StoredValue::new(use_services());
    let toaster = use_toaster();
    let (keyword, set_keyword) = signal(String::new());
    let (results, set_results) = signal(Vec::<UserSummary>::new());
    let pending: StoredValue<Option<Timeout>, LocalStorage> = StoredValue::new_local(None);

    let schedule_search = move |text: String| {
        set_keyword.set(text.clone());
        let text = text.trim().to_string();
        if text.chars().count() < MIN_KEYWORD_LEN {
            pending.set_value(None);
            set_results.set(Vec::new());
            return;
        }
        let timer = Timeout::new(SEARCH_DELAY_MS, move || {
            let api = services.with_value(|s| s.api.clone());
            spawn_local(async move {
                match api::search_users(&api, &text).await {
                    Ok(found) => set_results.set(found),
                    Err(e) => {
                        toaster.error(e.user_message());
                    }
                }
            });
        });
        pending.set_value(Some(timer));
    };

    let visible = move || addable_users(results.get(), &exclude.get());

    view! {
        <div class="user-picker">
            <input
                type="search"
                placeholder="Search users by name or email"
                prop:value=move || keyword.get()
                on:input=move |ev| schedule_search(event_target_value(&ev))
            />
            <ul class="user-picker-results">
                <For
                    each=visible
                    key=|u| u.id.clone()
                    children=move |user| {
                        let picked = user.clone();
                        view! {
                            <li on:click=move |_| {
                                on_pick.run(picked.clone());
                                set_keyword.set(String::new());
                                set_results.set(Vec::new());
                            }>
                                <strong>{user.username.clone()}</strong>
                                <span class="user-email">{user.email.clone()}</span>
                            </li>
                        }
                    }
                />
            </ul>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> UserSummary {
        UserSummary {
            id: id.into(),
            username: format!("user-{}", id),
            email: format!("{}@example.com", id),
        }
    }

    #[test]
    fn test_members_are_filtered_out() {
        let found = vec![summary("u1"), summary("u2"), summary("u3")];
        let left = addable_users(found, &["u1".to_string(), "u3".to_string()]);
        assert_eq!(left, vec![summary("u2")]);
    }

    #[test]
    fn test_nothing_excluded() {
        assert_eq!(addable_users(vec![summary("u1")], &[]).len(), 1);
    }
}
