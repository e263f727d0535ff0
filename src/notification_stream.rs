//! Notification Stream Transport
//!
//! Browser `EventSource` connection with a bounded, fixed-delay reconnect.
//! There is no catch-up of missed events; callers refetch on reconnect.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use tracing::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};

use crate::notifications::{parse_event, ReconnectPolicy, StreamEvent};

const EVENT_NAMES: [&str; 2] = ["connected", "notification"];

/// What the stream reports to its owner
#[derive(Debug, Clone, PartialEq)]
pub enum StreamSignal {
    /// `reconnected` is set when this open follows a dropped connection
    Opened { reconnected: bool },
    Event(StreamEvent),
    Dropped,
    /// Reconnect attempts exhausted
    GaveUp,
}

/// Next step after the connection drops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterDrop {
    Retry { attempt: u32, delay_ms: u32 },
    GiveUp,
}

/// Open/drop bookkeeping of one stream, apart from the browser transport
#[derive(Debug, Clone)]
pub struct StreamLifecycle {
    policy: ReconnectPolicy,
}

impl StreamLifecycle {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy }
    }

    /// Signal for a successful open; resets the retry budget
    pub fn opened(&mut self) -> StreamSignal {
        let reconnected = self.policy.attempts() > 0;
        self.policy.reset();
        StreamSignal::Opened { reconnected }
    }

    pub fn dropped(&mut self) -> AfterDrop {
        match self.policy.next_delay() {
            Some(delay_ms) => AfterDrop::Retry {
                attempt: self.policy.attempts(),
                delay_ms,
            },
            None => AfterDrop::GiveUp,
        }
    }

    pub fn reset(&mut self) {
        self.policy.reset();
    }
}

type UrlProvider = Rc<dyn Fn() -> Option<String>>;
type SignalHandler = Rc<dyn Fn(StreamSignal)>;

struct Listeners {
    open: Closure<dyn FnMut(web_sys::Event)>,
    error: Closure<dyn FnMut(web_sys::Event)>,
    events: Vec<Closure<dyn FnMut(MessageEvent)>>,
}

struct Inner {
    source: Option<EventSource>,
    listeners: Option<Listeners>,
    /// Listeners of a connection closed from inside its own callback
    retired: Option<Listeners>,
    retry: Option<Timeout>,
    lifecycle: StreamLifecycle,
    url: UrlProvider,
    on_signal: SignalHandler,
}

#[derive(Clone)]
pub struct NotificationStream {
    inner: Rc<RefCell<Inner>>,
}

impl NotificationStream {
    /// `url` yields the stream URL, or `None` when there is no access token
    pub fn new(
        policy: ReconnectPolicy,
        url: impl Fn() -> Option<String> + 'static,
        on_signal: impl Fn(StreamSignal) + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                source: None,
                listeners: None,
                retired: None,
                retry: None,
                lifecycle: StreamLifecycle::new(policy),
                url: Rc::new(url),
                on_signal: Rc::new(on_signal),
            })),
        }
    }

    fn from_weak(weak: &Weak<RefCell<Inner>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn emit(&self, signal: StreamSignal) {
        let handler = self.inner.borrow().on_signal.clone();
        handler(signal);
    }

    pub fn is_open(&self) -> bool {
        self.inner.borrow().source.is_some()
    }

    /// Open the connection unless one exists or there is no token
    pub fn connect(&self) {
        if self.is_open() {
            return;
        }
        let url_provider = self.inner.borrow().url.clone();
        let Some(url) = url_provider() else {
            debug!("No access token; notification stream not started");
            return;
        };
        let source = match EventSource::new(&url) {
            Ok(source) => source,
            Err(e) => {
                warn!("Failed to open notification stream: {:?}", e);
                return;
            }
        };

        let weak = Rc::downgrade(&self.inner);
        let open = {
            let weak = weak.clone();
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
                if let Some(stream) = Self::from_weak(&weak) {
                    stream.handle_open();
                }
            })
        };
        let error = {
            let weak = weak.clone();
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
                if let Some(stream) = Self::from_weak(&weak) {
                    stream.handle_error();
                }
            })
        };
        source.set_onopen(Some(open.as_ref().unchecked_ref()));
        source.set_onerror(Some(error.as_ref().unchecked_ref()));

        let events = EVENT_NAMES
            .iter()
            .map(|&name| {
                let weak = weak.clone();
                let listener = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
                    let data = ev.data().as_string().unwrap_or_default();
                    if let (Some(stream), Some(event)) = (Self::from_weak(&weak), parse_event(name, &data)) {
                        stream.emit(StreamSignal::Event(event));
                    }
                });
                let _ = source.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
                listener
            })
            .collect();

        let mut inner = self.inner.borrow_mut();
        inner.retired = None;
        inner.source = Some(source);
        inner.listeners = Some(Listeners { open, error, events });
    }

    fn handle_open(&self) {
        let signal = self.inner.borrow_mut().lifecycle.opened();
        info!("Notification stream open");
        self.emit(signal);
    }

    fn handle_error(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(source) = inner.source.take() {
                source.close();
            }
            // Still executing inside one of these closures
            inner.retired = inner.listeners.take();
        }
        self.emit(StreamSignal::Dropped);

        let next = self.inner.borrow_mut().lifecycle.dropped();
        match next {
            AfterDrop::Retry { attempt, delay_ms } => {
                warn!("Notification stream lost; retry {} in {} ms", attempt, delay_ms);
                let weak = Rc::downgrade(&self.inner);
                let retry = Timeout::new(delay_ms, move || {
                    if let Some(stream) = Self::from_weak(&weak) {
                        stream.connect();
                    }
                });
                self.inner.borrow_mut().retry = Some(retry);
            }
            AfterDrop::GiveUp => {
                warn!("Notification stream reconnect attempts exhausted");
                self.emit(StreamSignal::GaveUp);
            }
        }
    }

    /// Close the connection and cancel any pending reconnect
    pub fn disconnect(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.retry = None;
        if let Some(source) = inner.source.take() {
            source.close();
            debug!("Notification stream closed");
        }
        inner.listeners = None;
        inner.retired = None;
        inner.lifecycle.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_open_is_not_a_reconnect() {
        let mut lifecycle = StreamLifecycle::new(ReconnectPolicy::new(3_000, 5));
        assert_eq!(lifecycle.opened(), StreamSignal::Opened { reconnected: false });
    }

    #[test]
    fn test_open_after_drop_resets_retry_budget() {
        let mut lifecycle = StreamLifecycle::new(ReconnectPolicy::new(3_000, 5));
        assert_eq!(lifecycle.dropped(), AfterDrop::Retry { attempt: 1, delay_ms: 3_000 });
        assert_eq!(lifecycle.dropped(), AfterDrop::Retry { attempt: 2, delay_ms: 3_000 });
        assert_eq!(lifecycle.opened(), StreamSignal::Opened { reconnected: true });

        // A full budget again after the successful open
        for attempt in 1..=5 {
            assert_eq!(lifecycle.dropped(), AfterDrop::Retry { attempt, delay_ms: 3_000 });
        }
        assert_eq!(lifecycle.dropped(), AfterDrop::GiveUp);
        assert_eq!(lifecycle.dropped(), AfterDrop::GiveUp);
    }

    #[test]
    fn test_disconnect_reset_clears_attempts() {
        let mut lifecycle = StreamLifecycle::new(ReconnectPolicy::new(100, 1));
        assert_eq!(lifecycle.dropped(), AfterDrop::Retry { attempt: 1, delay_ms: 100 });
        assert_eq!(lifecycle.dropped(), AfterDrop::GiveUp);
        lifecycle.reset();
        assert_eq!(lifecycle.opened(), StreamSignal::Opened { reconnected: false });
    }
}
