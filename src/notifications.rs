//! Notification Feed
//!
//! Unread count and recent notifications, fed by REST fetches and the
//! server-sent event stream. The transport lives in `notification_stream`.

use tracing::{debug, info, warn};

use crate::models::Notification;

/// Notifications shown in the bell dropdown
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFeed {
    /// Newest first
    pub items: Vec<Notification>,
    pub unread: u32,
    pub connected: bool,
}

impl NotificationFeed {
    pub fn recent(&self) -> &[Notification] {
        &self.items[..self.items.len().min(RECENT_LIMIT)]
    }

    pub fn replace(&mut self, items: Vec<Notification>, unread: u32) {
        self.items = items;
        self.unread = unread;
    }

    /// A pushed notification goes to the top and counts as unread
    pub fn push(&mut self, notification: Notification) {
        self.items.insert(0, notification);
        self.unread += 1;
    }

    pub fn mark_read(&mut self, id: &str) {
        if let Some(item) = self.items.iter_mut().find(|n| n.id == id) {
            item.is_read = true;
        }
        self.unread = self.unread.saturating_sub(1);
    }

    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            item.is_read = true;
        }
        self.unread = 0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A decoded server-sent event
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Connected,
    Notification(Notification),
    /// Payload that could not be decoded; dropped
    Malformed,
}

/// Decode one event by name and data payload
pub fn parse_event(name: &str, data: &str) -> Option<StreamEvent> {
    match name {
        "connected" => {
            info!("Notification stream connected: {}", data);
            Some(StreamEvent::Connected)
        }
        "notification" => match serde_json::from_str::<Notification>(data) {
            Ok(notification) => Some(StreamEvent::Notification(notification)),
            Err(e) => {
                warn!("Ignoring malformed notification event: {}", e);
                Some(StreamEvent::Malformed)
            }
        },
        other => {
            debug!("Ignoring stream event '{}'", other);
            None
        }
    }
}

/// Bounded, fixed-delay reconnect schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub delay_ms: u32,
    pub max_attempts: u32,
    attempts: u32,
}

impl ReconnectPolicy {
    pub fn new(delay_ms: u32, max_attempts: u32) -> Self {
        Self {
            delay_ms,
            max_attempts,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay before the next attempt, or `None` once attempts are exhausted
    pub fn next_delay(&mut self) -> Option<u32> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        Some(self.delay_ms)
    }

    /// A successful open starts the budget over
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;

    fn notification(id: &str) -> Notification {
        Notification {
            id: id.into(),
            kind: NotificationType::CardAssigned,
            title: format!("Notification {}", id),
            message: None,
            entity_id: None,
            entity_type: None,
            is_read: false,
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_push_prepends_and_counts() {
        let mut feed = NotificationFeed::default();
        feed.replace(vec![notification("n1")], 1);
        feed.push(notification("n2"));
        assert_eq!(feed.items[0].id, "n2");
        assert_eq!(feed.unread, 2);
    }

    #[test]
    fn test_recent_is_first_five() {
        let mut feed = NotificationFeed::default();
        for i in 0..7 {
            feed.push(notification(&format!("n{}", i)));
        }
        let recent: Vec<_> = feed.recent().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(recent, vec!["n6", "n5", "n4", "n3", "n2"]);
        assert_eq!(NotificationFeed::default().recent().len(), 0);
    }

    #[test]
    fn test_mark_read_saturates() {
        let mut feed = NotificationFeed::default();
        feed.replace(vec![notification("n1")], 0);
        feed.mark_read("n1");
        assert!(feed.items[0].is_read);
        assert_eq!(feed.unread, 0);
        feed.push(notification("n2"));
        feed.mark_all_read();
        assert_eq!(feed.unread, 0);
        assert!(feed.items.iter().all(|n| n.is_read));
    }

    #[test]
    fn test_clear() {
        let mut feed = NotificationFeed::default();
        feed.push(notification("n1"));
        feed.connected = true;
        feed.clear();
        assert_eq!(feed, NotificationFeed::default());
    }

    #[test]
    fn test_parse_events() {
        assert_eq!(parse_event("connected", "ok"), Some(StreamEvent::Connected));
        assert_eq!(parse_event("notification", "{oops"), Some(StreamEvent::Malformed));
        assert_eq!(parse_event("heartbeat", ""), None);
        let data = serde_json::to_string(&notification("n1")).unwrap();
        assert_eq!(parse_event("notification", &data), Some(StreamEvent::Notification(notification("n1"))));
    }

    #[test]
    fn test_reconnect_stops_after_max_and_resets_on_open() {
        let mut policy = ReconnectPolicy::new(3_000, 5);
        for _ in 0..5 {
            assert_eq!(policy.next_delay(), Some(3_000));
        }
        assert_eq!(policy.next_delay(), None);
        assert_eq!(policy.attempts(), 5);
        policy.reset();
        assert_eq!(policy.next_delay(), Some(3_000));
        assert_eq!(policy.attempts(), 1);
    }
}
