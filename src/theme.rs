//! Theme Application
//!
//! Writes the resolved theme to `data-theme` on the document element.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::preferences::Theme;

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn dark_media_query() -> Option<web_sys::MediaQueryList> {
    web_sys::window()?.match_media(DARK_QUERY).ok().flatten()
}

pub fn prefers_dark() -> bool {
    dark_media_query().map(|q| q.matches()).unwrap_or(false)
}

pub fn apply_theme(theme: Theme) {
    let resolved = theme.resolve(prefers_dark());
    if let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    {
        let _ = root.set_attribute("data-theme", resolved.as_str());
    }
}

/// Re-apply whenever the OS color scheme changes. Lives for the whole app.
pub fn watch_system_theme(current: impl Fn() -> Theme + 'static) {
    let Some(query) = dark_media_query() else {
        return;
    };
    let on_change = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
        let theme = current();
        if theme == Theme::System {
            apply_theme(theme);
        }
    });
    let _ = query.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
    on_change.forget();
}
