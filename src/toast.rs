//! Toast Messages
//!
//! Timed, dismissable messages. The queue owns one timer handle per toast;
//! dismissing a toast drops its handle, which cancels the timer.

use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn default_duration_ms(&self) -> u32 {
        match self {
            ToastKind::Success => 4_000,
            ToastKind::Error => 5_000,
            ToastKind::Warning => 4_500,
            ToastKind::Info => 4_000,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Warning => "toast toast-warning",
            ToastKind::Info => "toast toast-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
    /// 0 keeps the toast until dismissed
    pub duration_ms: u32,
}

/// Toasts plus their pending auto-dismiss timers
#[derive(Debug)]
pub struct ToastQueue<H> {
    next_id: u32,
    toasts: Vec<Toast>,
    timers: HashMap<u32, H>,
}

impl<H> Default for ToastQueue<H> {
    fn default() -> Self {
        Self {
            next_id: 1,
            toasts: Vec::new(),
            timers: HashMap::new(),
        }
    }
}

impl<H> ToastQueue<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a toast. `schedule(id, ms)` arms the auto-dismiss timer and is
    /// skipped for sticky toasts.
    pub fn push(
        &mut self,
        kind: ToastKind,
        message: impl Into<String>,
        duration_ms: Option<u32>,
        schedule: impl FnOnce(u32, u32) -> H,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let duration_ms = duration_ms.unwrap_or_else(|| kind.default_duration_ms());
        if duration_ms > 0 {
            self.timers.insert(id, schedule(id, duration_ms));
        }
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
            duration_ms,
        });
        id
    }

    pub fn dismiss(&mut self, id: u32) -> bool {
        self.timers.remove(&id);
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn dismiss_all(&mut self) {
        self.timers.clear();
        self.toasts.clear();
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

/// Toast service provided via context
#[derive(Clone, Copy)]
pub struct Toaster {
    pub toasts: ReadSignal<Vec<Toast>>,
    set_toasts: WriteSignal<Vec<Toast>>,
    queue: StoredValue<ToastQueue<Timeout>, LocalStorage>,
}

impl Toaster {
    pub fn new() -> Self {
        let (toasts, set_toasts) = signal(Vec::new());
        Self {
            toasts,
            set_toasts,
            queue: StoredValue::new_local(ToastQueue::new()),
        }
    }

    fn sync(&self) {
        let current = self.queue.with_value(|q| q.toasts().to_vec());
        self.set_toasts.set(current);
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>, duration_ms: Option<u32>) -> u32 {
        let this = *self;
        let message = message.into();
        let id = self
            .queue
            .try_update_value(|queue| {
                queue.push(kind, message, duration_ms, |id, ms| {
                    Timeout::new(ms, move || this.dismiss(id))
                })
            })
            .unwrap_or_default();
        self.sync();
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u32 {
        self.show(ToastKind::Success, message, None)
    }

    pub fn error(&self, message: impl Into<String>) -> u32 {
        self.show(ToastKind::Error, message, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> u32 {
        self.show(ToastKind::Warning, message, None)
    }

    pub fn info(&self, message: impl Into<String>) -> u32 {
        self.show(ToastKind::Info, message, None)
    }

    pub fn dismiss(&self, id: u32) {
        let removed = self.queue.try_update_value(|q| q.dismiss(id)).unwrap_or(false);
        if removed {
            self.sync();
        }
    }

    pub fn dismiss_all(&self) {
        self.queue.update_value(|q| q.dismiss_all());
        self.sync();
    }
}

/// Get the toaster from context
pub fn use_toaster() -> Toaster {
    expect_context::<Toaster>()
}
