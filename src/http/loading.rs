use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{HttpRequest, HttpResponse, Interceptor, Next};
use crate::error::ApiResult;

/// Request header that opts out of the loading indicator. Stripped before send.
pub const SKIP_LOADING_HEADER: &str = "X-Skip-Loading";

const SKIPPED_PREFIXES: [&str; 2] = ["/health", "/actuator"];

type VisibilityListener = Arc<dyn Fn(bool) + Send + Sync>;

/// In-flight request counter driving the global loading bar
#[derive(Default)]
pub struct LoadingCounter {
    count: Mutex<usize>,
    listener: Mutex<Option<VisibilityListener>>,
}

impl LoadingCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with `true` when the first request starts and `false` when the
    /// last one finishes
    pub fn set_listener(&self, listener: impl Fn(bool) + Send + Sync + 'static) {
        *self.listener.lock() = Some(Arc::new(listener));
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        *self.count.lock()
    }

    pub fn show(&self) {
        let became_visible = {
            let mut count = self.count.lock();
            *count += 1;
            *count == 1
        };
        if became_visible {
            self.notify(true);
        }
    }

    /// Never goes below zero
    pub fn hide(&self) {
        let became_hidden = {
            let mut count = self.count.lock();
            if *count == 0 {
                return;
            }
            *count -= 1;
            *count == 0
        };
        if became_hidden {
            self.notify(false);
        }
    }

    pub fn force_hide(&self) {
        let was_visible = std::mem::take(&mut *self.count.lock()) > 0;
        if was_visible {
            self.notify(false);
        }
    }

    fn notify(&self, visible: bool) {
        let listener = self.listener.lock().clone();
        if let Some(listener) = listener {
            listener(visible);
        }
    }
}

/// Decrements on drop so an abandoned request still releases its count
struct InFlight<'a>(&'a LoadingCounter);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.hide();
    }
}

pub struct LoadingInterceptor {
    counter: Arc<LoadingCounter>,
}

impl LoadingInterceptor {
    pub fn new(counter: Arc<LoadingCounter>) -> Self {
        Self { counter }
    }

    fn should_track(request: &mut HttpRequest) -> bool {
        if request.remove_header(SKIP_LOADING_HEADER).is_some() {
            return false;
        }
        !SKIPPED_PREFIXES.iter().any(|p| request.path.starts_with(p))
    }
}

#[async_trait(?Send)]
impl Interceptor for LoadingInterceptor {
    async fn intercept(&self, mut request: HttpRequest, next: Next<'_>) -> ApiResult<HttpResponse> {
        if !Self::should_track(&mut request) {
            return next.run(request).await;
        }
        self.counter.show();
        let _guard = InFlight(&self.counter);
        next.run(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ApiClient;
    use crate::test_support::MockBackend;
    use futures::executor::block_on;

    #[test]
    fn test_counter_shows_once_and_never_negative() {
        let counter = LoadingCounter::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        counter.set_listener(move |visible| sink.lock().push(visible));

        counter.show();
        counter.show();
        counter.hide();
        assert!(counter.in_flight() > 0);
        counter.hide();
        counter.hide();
        assert_eq!(counter.in_flight(), 0);
        assert_eq!(*events.lock(), vec![true, false]);
    }

    #[test]
    fn test_force_hide() {
        let counter = LoadingCounter::new();
        counter.show();
        counter.show();
        counter.force_hide();
        assert_eq!(counter.in_flight(), 0);
        counter.hide();
        assert_eq!(counter.in_flight(), 0);
    }

    #[test]
    fn test_interceptor_tracks_and_releases() {
        let backend = MockBackend::new();
        backend.respond(200, "{}").respond(200, "{}").respond(200, "{}");
        let counter = Arc::new(LoadingCounter::new());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        counter.set_listener(move |visible| sink.lock().push(visible));
        let api = ApiClient::new(backend.clone()).with(LoadingInterceptor::new(counter.clone()));

        block_on(api.send(HttpRequest::get("/boards"))).unwrap();
        block_on(api.send(HttpRequest::get("/health"))).unwrap();
        block_on(api.send(HttpRequest::get("/notifications/unread-count").skip_loading())).unwrap();

        assert_eq!(*events.lock(), vec![true, false]);
        assert_eq!(counter.in_flight(), 0);
        assert!(backend.requests()[2].header_value(SKIP_LOADING_HEADER).is_none());
    }

    #[test]
    fn test_failed_request_releases_count() {
        let backend = MockBackend::new();
        backend.fail_network();
        let counter = Arc::new(LoadingCounter::new());
        let api = ApiClient::new(backend).with(LoadingInterceptor::new(counter.clone()));
        assert!(block_on(api.send(HttpRequest::get("/boards"))).is_err());
        assert_eq!(counter.in_flight(), 0);
    }
}
