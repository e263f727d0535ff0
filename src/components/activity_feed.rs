//! Activity Feed Component
//!
//! Recent activity for a card, a workspace or the signed-in user.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{self, ActivityScope};
use crate::context::use_services;
use crate::markdown::render_markdown_inline;
use crate::models::ActivityLog;
use crate::text::time_ago;
use crate::toast::use_toaster;

/// "alice moved", falling back to the user id when no name came back
pub fn activity_headline(entry: &ActivityLog) -> String {
    let who = entry.performed_by_username.as_deref().unwrap_or(&entry.performed_by);
    format!("{} {}", who, entry.action.to_lowercase())
}

#[component]
pub fn ActivityFeed(scope: ActivityScope) -> impl IntoView {
    let services = StoredValue::new(use_services());
    let toaster = use_toaster();
    let entries = RwSignal::new(None::<Vec<ActivityLog>>);

    let api = services.with_value(|s| s.api.clone());
    spawn_local(async move {
        match api::list_activity(&api, &scope).await {
            Ok(list) => entries.set(Some(list)),
            Err(e) => {
                toaster.error(e.user_message());
                entries.set(Some(Vec::new()));
            }
        }
    });

    view! {
        <div class="activity-feed">
            {move || match entries.get() {
                None => view! { <p>"Loading activity..."</p> }.into_any(),
                Some(list) if list.is_empty() => view! { <p class="empty">"No activity yet"</p> }.into_any(),
                Some(list) => view! {
                    <ul>
                        {list.into_iter().map(|entry| view! {
                            <li>
                                <strong>{activity_headline(&entry)}</strong>
                                " "
                                <span class="activity-details" inner_html=render_markdown_inline(&entry.details)></span>
                                <span class="activity-time">{time_ago(&entry.timestamp)}</span>
                            </li>
                        }).collect_view()}
                    </ul>
                }.into_any(),
            }}
        </div>
    }
}

/// The signed-in user's own activity across workspaces
#[component]
pub fn ActivityPage() -> impl IntoView {
    view! {
        <section class="activity-page">
            <h2>"My activity"</h2>
            <ActivityFeed scope=ActivityScope::Mine />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(username: Option<&str>) -> ActivityLog {
        ActivityLog {
            id: "a1".into(),
            entity_id: "c1".into(),
            entity_type: "CARD".into(),
            action: "MOVED".into(),
            details: "to **Done**".into(),
            timestamp: "2026-01-01T00:00:00Z".into(),
            performed_by: "u1".into(),
            performed_by_username: username.map(str::to_string),
        }
    }

    #[test]
    fn test_headline_prefers_username() {
        assert_eq!(activity_headline(&entry(Some("alice"))), "alice moved");
        assert_eq!(activity_headline(&entry(None)), "u1 moved");
    }
}
