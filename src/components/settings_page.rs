//! Settings Page Component
//!
//! Appearance, notification preferences, profile and password.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::api;
use crate::context::use_services;
use crate::models::ProfileUpdate;
use crate::preferences::Theme;
use crate::store::{use_app_store, AppStateStoreFields};
use crate::text::{is_valid_email, passwords_match, PasswordStrength};
use crate::theme::apply_theme;
use crate::toast::use_toaster;

/// Fields that differ from the current profile, trimmed
pub fn profile_changes(current_username: &str, current_email: &str, username: &str, email: &str) -> ProfileUpdate {
    let username = username.trim();
    let email = email.trim();
    ProfileUpdate {
        username: (!username.is_empty() && username != current_username).then(|| username.to_string()),
        email: (!email.is_empty() && email != current_email).then(|| email.to_string()),
    }
}

#[component]
pub fn SettingsPage(theme: RwSignal<Theme>) -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();

    let (notify_assigned, set_notify_assigned) = signal(services.with_value(|s| s.prefs.notify_email_assigned()));
    let (notify_digest, set_notify_digest) = signal(services.with_value(|s| s.prefs.notify_email_digest()));

    let current = store.user().get_untracked();
    let (username, set_username) = signal(current.as_ref().map(|u| u.username.clone()).unwrap_or_default());
    let (email, set_email) = signal(current.as_ref().map(|u| u.email.clone()).unwrap_or_default());

    let (old_password, set_old_password) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (confirmation, set_confirmation) = signal(String::new());
    let (log_dump, set_log_dump) = signal(None::<String>);

    let choose_theme = move |next: Theme| {
        if let Err(e) = services.with_value(|s| s.prefs.set_theme(next)) {
            warn!("Failed to save theme: {}", e);
        }
        theme.set(next);
        apply_theme(next);
    };

    let on_assigned = move |ev: web_sys::Event| {
        let enabled = event_target_checked(&ev);
        if let Err(e) = services.with_value(|s| s.prefs.set_notify_email_assigned(enabled)) {
            warn!("Failed to save notification preference: {}", e);
        }
        set_notify_assigned.set(enabled);
    };

    let on_digest = move |ev: web_sys::Event| {
        let enabled = event_target_checked(&ev);
        if let Err(e) = services.with_value(|s| s.prefs.set_notify_email_digest(enabled)) {
            warn!("Failed to save notification preference: {}", e);
        }
        set_notify_digest.set(enabled);
    };

    let on_profile = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (current_username, current_email) = store
            .user()
            .with_untracked(|u| u.as_ref().map(|u| (u.username.clone(), u.email.clone())))
            .unwrap_or_default();
        let update = profile_changes(&current_username, &current_email, &username.get(), &email.get());
        if update.username.is_none() && update.email.is_none() {
            toaster.info("Nothing to update");
            return;
        }
        if update.email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            toaster.warning("Enter a valid email address");
            return;
        }
        let services = services.get_value();
        spawn_local(async move {
            match api::update_profile(&services.api, &services.session, &update).await {
                Ok(user) => {
                    store.user().set(Some(user));
                    toaster.success("Profile updated");
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    };

    let on_password = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let old = old_password.get();
        let new = new_password.get();
        if old.is_empty() {
            toaster.warning("Enter your current password");
            return;
        }
        if !PasswordStrength::check(&new).is_strong() {
            toaster.warning("Password needs 8+ characters with upper and lower case letters, a number and a symbol");
            return;
        }
        if !passwords_match(&new, &confirmation.get()) {
            toaster.warning("Passwords do not match");
            return;
        }
        let services = services.get_value();
        spawn_local(async move {
            match api::change_password(&services.api, &old, &new).await {
                Ok(()) => {
                    set_old_password.set(String::new());
                    set_new_password.set(String::new());
                    set_confirmation.set(String::new());
                    toaster.success("Password changed");
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    };

    let strength = move || PasswordStrength::check(&new_password.get());

    view! {
        <section class="settings-page">
            <h2>"Settings"</h2>

            <fieldset>
                <legend>"Appearance"</legend>
                {[Theme::Light, Theme::Dark, Theme::System].into_iter().map(|option| view! {
                    <label>
                        <input
                            type="radio"
                            name="theme"
                            prop:checked=move || theme.get() == option
                            on:change=move |_| choose_theme(option)
                        />
                        {option.as_str()}
                    </label>
                }).collect_view()}
            </fieldset>

            <fieldset>
                <legend>"Email notifications"</legend>
                <label>
                    <input type="checkbox" prop:checked=move || notify_assigned.get() on:change=on_assigned />
                    "When I am assigned to a card"
                </label>
                <label>
                    <input type="checkbox" prop:checked=move || notify_digest.get() on:change=on_digest />
                    "Daily digest"
                </label>
            </fieldset>

            <form class="settings-profile" on:submit=on_profile>
                <h3>"Profile"</h3>
                <input type="text" placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev)) />
                <input type="email" placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev)) />
                <button type="submit">"Save profile"</button>
            </form>

            <form class="settings-password" on:submit=on_password>
                <h3>"Change password"</h3>
                <input type="password" placeholder="Current password"
                    prop:value=move || old_password.get()
                    on:input=move |ev| set_old_password.set(event_target_value(&ev)) />
                <input type="password" placeholder="New password"
                    prop:value=move || new_password.get()
                    on:input=move |ev| set_new_password.set(event_target_value(&ev)) />
                <ul class="password-rules">
                    <li class:met=move || strength().is_length_valid>"At least 8 characters"</li>
                    <li class:met=move || strength().has_upper_case>"An upper case letter"</li>
                    <li class:met=move || strength().has_lower_case>"A lower case letter"</li>
                    <li class:met=move || strength().has_number>"A number"</li>
                    <li class:met=move || strength().has_special_char>"A symbol"</li>
                </ul>
                <input type="password" placeholder="Confirm new password"
                    prop:value=move || confirmation.get()
                    on:input=move |ev| set_confirmation.set(event_target_value(&ev)) />
                <button type="submit">"Change password"</button>
            </form>

            <details class="settings-diagnostics" on:toggle=move |_| {
                set_log_dump.set(rolling_logger::global_buffer().map(|b| b.dump()));
            }>
                <summary>"Diagnostics"</summary>
                <pre>{move || log_dump.get().unwrap_or_else(|| "Logging is not initialized".to_string())}</pre>
            </details>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_changes() {
        let update = profile_changes("ada", "ada@example.com", " ada ", "ada@new.io");
        assert!(update.username.is_none());
        assert_eq!(update.email.as_deref(), Some("ada@new.io"));

        let update = profile_changes("ada", "ada@example.com", "", "");
        assert!(update.username.is_none() && update.email.is_none());
    }
}
