//! Authentication Pages
//!
//! Login, registration, email verification and password reset.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::api;
use crate::context::use_services;
use crate::models::RegisterRequest;
use crate::store::{use_app_store, AppStateStoreFields, View};
use crate::text::{has_surrounding_whitespace, is_valid_email, passwords_match, PasswordStrength};
use crate::toast::use_toaster;

#[component]
pub fn LoginPage() -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();
    let (login, set_login) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let identifier = login.get();
        let secret = password.get();
        if identifier.trim().is_empty() || secret.is_empty() {
            toaster.warning("Enter your username or email and password");
            return;
        }
        set_submitting.set(true);
        let services = services.get_value();
        spawn_local(async move {
            match api::login(&services.api, &services.session, &identifier, &secret).await {
                Ok(auth) => {
                    store.user().set(Some(auth.user));
                    store.view().set(View::Boards);
                    toaster.success("Welcome back");
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-form" on:submit=on_submit>
                <h1>"Sign in"</h1>
                <input
                    type="text"
                    placeholder="Username or email"
                    autocomplete="username"
                    prop:value=move || login.get()
                    on:input=move |ev| set_login.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || submitting.get()>"Sign in"</button>
                <div class="auth-links">
                    <button type="button" on:click=move |_| store.view().set(View::Register)>"Create an account"</button>
                    <button type="button" on:click=move |_| store.view().set(View::ForgotPassword)>"Forgot password?"</button>
                </div>
            </form>
        </div>
    }
}

/// Problems with a registration form, in display order
pub fn registration_errors(username: &str, email: &str, password: &str, confirmation: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push("Username is required");
    } else if has_surrounding_whitespace(username) {
        errors.push("Username cannot start or end with spaces");
    }
    if !is_valid_email(email) {
        errors.push("Enter a valid email address");
    }
    errors.extend(new_password_errors(password, confirmation));
    errors
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();
    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirmation, set_confirmation) = signal(String::new());
    let (errors, set_errors) = signal(Vec::<&'static str>::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let problems = registration_errors(&username.get(), &email.get(), &password.get(), &confirmation.get());
        if !problems.is_empty() {
            set_errors.set(problems);
            return;
        }
        set_errors.set(Vec::new());
        let request = RegisterRequest {
            username: username.get(),
            email: email.get(),
            password: password.get(),
        };
        let services = services.get_value();
        spawn_local(async move {
            match api::register(&services.api, &services.session, &request).await {
                Ok(auth) => {
                    store.user().set(Some(auth.user));
                    store.view().set(View::Boards);
                    toaster.success("Account created");
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-form" on:submit=on_submit>
                <h1>"Create account"</h1>
                <input type="text" placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev)) />
                <input type="email" placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev)) />
                <input type="password" placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev)) />
                <input type="password" placeholder="Confirm password"
                    prop:value=move || confirmation.get()
                    on:input=move |ev| set_confirmation.set(event_target_value(&ev)) />
                <ul class="form-errors">
                    {move || errors.get().into_iter().map(|e| view! { <li>{e}</li> }).collect_view()}
                </ul>
                <button type="submit">"Create account"</button>
                <div class="auth-links">
                    <button type="button" on:click=move |_| store.view().set(View::Login)>"Back to sign in"</button>
                </div>
            </form>
        </div>
    }
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();
    let (email, set_email) = signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let address = email.get();
        if !is_valid_email(address.trim()) {
            toaster.warning("Enter a valid email address");
            return;
        }
        let services = services.get_value();
        spawn_local(async move {
            match api::forgot_password(&services.api, &address).await {
                Ok(()) => {
                    toaster.info("If the address is registered, a reset link is on its way");
                    store.view().set(View::Login);
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-form" on:submit=on_submit>
                <h1>"Reset password"</h1>
                <input type="email" placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev)) />
                <button type="submit">"Send reset link"</button>
                <div class="auth-links">
                    <button type="button" on:click=move |_| store.view().set(View::Login)>"Back to sign in"</button>
                </div>
            </form>
        </div>
    }
}

/// Problems with a new password, in display order
pub fn new_password_errors(password: &str, confirmation: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();
    if !PasswordStrength::check(password).is_strong() {
        errors.push("Password needs 8+ characters with upper and lower case letters, a number and a symbol");
    }
    if !passwords_match(password, confirmation) {
        errors.push("Passwords do not match");
    }
    errors
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Verification {
    Pending,
    Verified,
    Failed,
}

/// Landing page for the link in the verification email
#[component]
pub fn VerifyEmailPage(token: String) -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let (status, set_status) = signal(Verification::Pending);

    let api = services.with_value(|s| s.api.clone());
    spawn_local(async move {
        match api::verify_email(&api, &token).await {
            Ok(()) => set_status.set(Verification::Verified),
            Err(e) => {
                warn!("Email verification failed: {}", e);
                set_status.set(Verification::Failed);
            }
        }
    });

    view! {
        <div class="auth-page">
            <div class="auth-form">
                <h1>"Email verification"</h1>
                {move || match status.get() {
                    Verification::Pending => view! { <p>"Verifying your email..."</p> }.into_any(),
                    Verification::Verified => view! { <p class="success">"Your email is verified. You can sign in now."</p> }.into_any(),
                    Verification::Failed => view! { <p class="error">"This verification link is invalid or has expired."</p> }.into_any(),
                }}
                <div class="auth-links">
                    <button type="button" on:click=move |_| store.view().set(View::Login)>"Go to sign in"</button>
                </div>
            </div>
        </div>
    }
}

/// Landing page for the link in the password reset email
#[component]
pub fn ResetPasswordPage(token: String) -> impl IntoView {
    let services = StoredValue::new(use_services());
    let store = use_app_store();
    let toaster = use_toaster();
    let token = StoredValue::new(token);
    let (password, set_password) = signal(String::new());
    let (confirmation, set_confirmation) = signal(String::new());
    let (errors, set_errors) = signal(Vec::<&'static str>::new());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let secret = password.get();
        let problems = new_password_errors(&secret, &confirmation.get());
        if !problems.is_empty() {
            set_errors.set(problems);
            return;
        }
        set_errors.set(Vec::new());
        set_submitting.set(true);
        let api = services.with_value(|s| s.api.clone());
        let token = token.get_value();
        spawn_local(async move {
            match api::reset_password(&api, &token, &secret).await {
                Ok(()) => {
                    toaster.success("Password changed. Sign in with your new password.");
                    store.view().set(View::Login);
                }
                Err(e) => {
                    toaster.error(e.user_message());
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-form" on:submit=on_submit>
                <h1>"Choose a new password"</h1>
                <input type="password" placeholder="New password" autocomplete="new-password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev)) />
                <input type="password" placeholder="Confirm password" autocomplete="new-password"
                    prop:value=move || confirmation.get()
                    on:input=move |ev| set_confirmation.set(event_target_value(&ev)) />
                <ul class="form-errors">
                    {move || errors.get().into_iter().map(|e| view! { <li>{e}</li> }).collect_view()}
                </ul>
                <button type="submit" disabled=move || submitting.get()>"Change password"</button>
                <div class="auth-links">
                    <button type="button" on:click=move |_| store.view().set(View::Login)>"Back to sign in"</button>
                </div>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_errors() {
        assert!(registration_errors("ada", "ada@example.com", "Secret#123", "Secret#123").is_empty());
        let errors = registration_errors(" ada", "ada", "weak", "other");
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], "Username cannot start or end with spaces");
    }

    #[test]
    fn test_new_password_errors() {
        assert!(new_password_errors("Secret#123", "Secret#123").is_empty());
        assert_eq!(new_password_errors("Secret#123", "Secret#124"), vec!["Passwords do not match"]);
        assert_eq!(new_password_errors("short", "short").len(), 1);
    }
}
