//! TaskFlow App
//!
//! Root component: provides services, store and toaster, owns the
//! notification stream, and switches between pages.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use tracing::{info, warn};

use crate::api;
use crate::components::{
    ActivityPage, BoardList, BoardView, ForgotPasswordPage, LoadingBar, LoginPage, Navbar, RegisterPage,
    ResetPasswordPage, SearchPanel, SettingsPage, ToastHost, VerifyEmailPage, WorkspacePage, WorkspaceTabBar,
};
use crate::config::AppConfig;
use crate::context::Services;
use crate::http::ApiClient;
use crate::notification_stream::{NotificationStream, StreamSignal};
use crate::notifications::{ReconnectPolicy, StreamEvent};
use crate::store::{pick_current_workspace, view_from_location, AppState, AppStateStoreFields, AppStore, View};
use crate::theme::{apply_theme, watch_system_theme};
use crate::toast::Toaster;

/// Notification list and unread count, fetched together
async fn load_notifications(api: &ApiClient, store: AppStore) {
    let items = api::list_notifications(api).await;
    let unread = api::unread_count(api).await;
    match (items, unread) {
        (Ok(items), Ok(unread)) => store.notifications().update(|feed| feed.replace(items, unread)),
        (Err(e), _) | (_, Err(e)) => warn!("Failed to load notifications: {}", e),
    }
}

/// Page named by an emailed link in the address bar; the token is then
/// dropped from the URL
fn emailed_link_view() -> Option<View> {
    let window = web_sys::window()?;
    let location = window.location();
    let view = view_from_location(&location.pathname().ok()?, &location.search().ok()?)?;
    if let Ok(history) = window.history() {
        if let Err(e) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some("/")) {
            warn!("Failed to clean up the address bar: {:?}", e);
        }
    }
    Some(view)
}

/// Workspaces plus the restored selection
fn load_workspaces(services: &Services, store: AppStore, toaster: Toaster) {
    let api = services.api.clone();
    let saved = services.prefs.current_workspace();
    spawn_local(async move {
        match api::list_workspaces(&api).await {
            Ok(workspaces) => {
                let current = pick_current_workspace(saved.as_deref(), &workspaces);
                store.workspaces().set(workspaces);
                store.current_workspace_id().set(current);
            }
            Err(e) => {
                toaster.error(e.user_message());
            }
        }
    });
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let policy = ReconnectPolicy::new(config.sse_reconnect_delay_ms, config.sse_max_reconnect_attempts);
    let services = Services::browser(config);
    provide_context(services.clone());

    let store = Store::new(AppState::default());
    provide_context(store);

    let toaster = Toaster::new();
    provide_context(toaster);

    let (loading, set_loading) = signal(false);
    services.loading.set_listener(move |visible| set_loading.set(visible));

    let theme = RwSignal::new(services.prefs.theme());
    apply_theme(theme.get_untracked());
    watch_system_theme(move || theme.get_untracked());

    let (sidebar_collapsed, set_sidebar_collapsed) = signal(services.prefs.sidebar_collapsed());
    let services_value = StoredValue::new(services.clone());
    let toggle_sidebar = move |_| {
        let collapsed = !sidebar_collapsed.get_untracked();
        if let Err(e) = services_value.with_value(|s| s.prefs.set_sidebar_collapsed(collapsed)) {
            warn!("Failed to save sidebar state: {}", e);
        }
        set_sidebar_collapsed.set(collapsed);
    };

    // Notification stream
    let stream_services = services.clone();
    let signal_services = services.clone();
    let stream = StoredValue::new_local(NotificationStream::new(
        policy,
        move || {
            stream_services
                .session
                .access_token()
                .map(|token| api::notification_stream_url(&stream_services.config, &token))
        },
        move |signal| match signal {
            StreamSignal::Opened { reconnected } => {
                store.notifications().update(|feed| feed.connected = true);
                if reconnected {
                    let api = signal_services.api.clone();
                    spawn_local(async move { load_notifications(&api, store).await });
                }
            }
            StreamSignal::Event(StreamEvent::Notification(notification)) => {
                toaster.info(notification.title.clone());
                store.notifications().update(|feed| feed.push(notification));
            }
            StreamSignal::Event(_) => {}
            StreamSignal::Dropped => store.notifications().update(|feed| feed.connected = false),
            StreamSignal::GaveUp => {
                warn!("Notification stream gave up reconnecting");
                store.notifications().update(|feed| feed.connected = false);
            }
        },
    ));
    on_cleanup(move || {
        let _ = stream.try_with_value(NotificationStream::disconnect);
    });

    // Session ended anywhere (logout, failed refresh): back to the login page
    let loading_counter = services.loading.clone();
    services.session.set_logout_listener(move || {
        info!("Session ended");
        loading_counter.force_hide();
        let _ = stream.try_with_value(NotificationStream::disconnect);
        store.notifications().update(|feed| feed.clear());
        store.user().set(None);
        store.workspaces().set(Vec::new());
        store.boards().set(Vec::new());
        store.view().set(View::Login);
    });

    // Restore a previous session
    if services.session.is_authenticated() {
        store.user().set(services.session.user());
        store.view().set(View::Boards);
        let api = services.api.clone();
        let session = services.session.clone();
        spawn_local(async move {
            match api::current_user(&api).await {
                Ok(user) => {
                    session.set_user(&user);
                    store.user().set(Some(user));
                }
                Err(e) => warn!("Could not refresh the current user: {}", e),
            }
        });
    }

    // Verification and reset links win over the restored page
    if let Some(view) = emailed_link_view() {
        store.view().set(view);
    }

    // Signed-in bootstrap: workspaces, notifications, live stream
    let signed_in = Memo::new(move |_| store.user().with(Option::is_some));
    Effect::new(move |_| {
        if !signed_in.get() {
            return;
        }
        let api = services_value.with_value(|s| {
            load_workspaces(s, store, toaster);
            s.api.clone()
        });
        spawn_local(async move {
            load_notifications(&api, store).await;
            stream.with_value(NotificationStream::connect);
        });
    });

    // Guard pages that need a session
    Effect::new(move |_| {
        let needs_auth = store.view().with(View::requires_auth);
        let authenticated = services_value.with_value(|s| s.session.is_authenticated());
        if needs_auth && !authenticated {
            store.view().set(View::Login);
        }
    });

    let page = move || match store.view().get() {
        View::Login => view! { <LoginPage /> }.into_any(),
        View::Register => view! { <RegisterPage /> }.into_any(),
        View::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        View::Boards => view! { <BoardList /> }.into_any(),
        View::Board(id) => view! { <BoardView board_id=id /> }.into_any(),
        View::Search(query) => view! { <SearchPanel query=query /> }.into_any(),
        View::Settings => view! { <SettingsPage theme=theme /> }.into_any(),
        View::Workspace(id) => view! { <WorkspacePage workspace_id=id /> }.into_any(),
        View::Activity => view! { <ActivityPage /> }.into_any(),
        View::VerifyEmail(token) => view! { <VerifyEmailPage token=token /> }.into_any(),
        View::ResetPassword(token) => view! { <ResetPasswordPage token=token /> }.into_any(),
    };

    view! {
        <LoadingBar visible=loading />
        <Show
            when=move || store.view().with(View::requires_auth)
            fallback=page
        >
            <div class="app-layout">
                <Navbar theme=theme />
                <div class="app-body">
                    <aside class=move || if sidebar_collapsed.get() { "sidebar collapsed" } else { "sidebar" }>
                        <button class="sidebar-toggle" on:click=toggle_sidebar>
                            {move || if sidebar_collapsed.get() { "»" } else { "«" }}
                        </button>
                        <Show when=move || !sidebar_collapsed.get()>
                            <WorkspaceTabBar />
                        </Show>
                    </aside>
                    <main class="main-content">{page}</main>
                </div>
            </div>
        </Show>
        <ToastHost />
    }
}
