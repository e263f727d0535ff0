//! Text Helpers
//!
//! Normalization, display formatting, and form validation.

use chrono::{DateTime, Utc};

/// Collapse line breaks and runs of whitespace into single spaces
pub fn normalize_to_single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut to `limit` characters, appending `...` when anything was removed
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str("...");
    out
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// "just now", "5 minutes ago", ... falling back to a date after a week
pub fn relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    let then = then.with_timezone(&Utc);
    let elapsed = now.signed_duration_since(then);

    if elapsed.num_seconds() < 60 {
        "just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        plural(elapsed.num_minutes(), "minute")
    } else if elapsed.num_hours() < 24 {
        plural(elapsed.num_hours(), "hour")
    } else if elapsed.num_days() < 7 {
        plural(elapsed.num_days(), "day")
    } else {
        then.format("%b %-d, %Y").to_string()
    }
}

/// `relative_time` against the current clock
pub fn time_ago(timestamp: &str) -> String {
    relative_time(timestamp, Utc::now())
}

/// Date part of an ISO 8601 timestamp, for `<input type="date">`
pub fn date_input_value(timestamp: &str) -> String {
    timestamp.get(..10).unwrap_or_default().to_string()
}

/// How close a card is to its due date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    /// Due within the next two days
    DueSoon,
    Later,
}

impl DueStatus {
    pub fn css_class(&self) -> &'static str {
        match self {
            DueStatus::Overdue => "card-due overdue",
            DueStatus::DueSoon => "card-due due-soon",
            DueStatus::Later => "card-due",
        }
    }
}

pub fn due_status(due: &str, now: DateTime<Utc>) -> Option<DueStatus> {
    let due = DateTime::parse_from_rfc3339(due).ok()?.with_timezone(&Utc);
    if due < now {
        return Some(DueStatus::Overdue);
    }
    // Whole days remaining, rounded up
    let seconds = due.signed_duration_since(now).num_seconds();
    let days = (seconds + 86_399) / 86_400;
    Some(if days <= 2 { DueStatus::DueSoon } else { DueStatus::Later })
}

/// Date from `<input type="date">` as the timestamp stored on a card
pub fn due_date_from_input(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| format!("{}T12:00:00.000Z", value))
}

/// 1 = High, 2 = Medium, 3 = Low, then P4...
pub fn priority_label(priority: Option<i32>) -> Option<String> {
    match priority? {
        1 => Some("High".to_string()),
        2 => Some("Medium".to_string()),
        3 => Some("Low".to_string()),
        p if p > 0 => Some(format!("P{}", p)),
        _ => None,
    }
}

// ========================
// Validation
// ========================

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Which strong-password rules a candidate satisfies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub has_upper_case: bool,
    pub has_lower_case: bool,
    pub has_number: bool,
    pub has_special_char: bool,
    pub is_length_valid: bool,
}

impl PasswordStrength {
    pub fn check(password: &str) -> Self {
        Self {
            has_upper_case: password.chars().any(|c| c.is_ascii_uppercase()),
            has_lower_case: password.chars().any(|c| c.is_ascii_lowercase()),
            has_number: password.chars().any(|c| c.is_ascii_digit()),
            has_special_char: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
            is_length_valid: password.chars().count() >= 8,
        }
    }

    pub fn is_strong(&self) -> bool {
        self.has_upper_case && self.has_lower_case && self.has_number && self.has_special_char && self.is_length_valid
    }
}

pub fn has_surrounding_whitespace(value: &str) -> bool {
    value.trim().len() != value.len()
}

/// Loose shape check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    password == confirmation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_to_single_line() {
        assert_eq!(normalize_to_single_line("  Fix\r\nlogin   bug\n"), "Fix login bug");
        assert_eq!(normalize_to_single_line(""), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
        assert_eq!(truncate("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_relative_time() {
        let now = DateTime::parse_from_rfc3339("2026-03-10T12:00:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(relative_time("2026-03-10T11:59:30Z", now), "just now");
        assert_eq!(relative_time("2026-03-10T11:59:00Z", now), "1 minute ago");
        assert_eq!(relative_time("2026-03-10T11:55:00Z", now), "5 minutes ago");
        assert_eq!(relative_time("2026-03-10T09:00:00Z", now), "3 hours ago");
        assert_eq!(relative_time("2026-03-08T12:00:00Z", now), "2 days ago");
        assert_eq!(relative_time("2026-01-02T12:00:00Z", now), "Jan 2, 2026");
        assert_eq!(relative_time("yesterday", now), "yesterday");
    }

    #[test]
    fn test_due_status() {
        let now = DateTime::parse_from_rfc3339("2026-03-10T12:00:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(due_status("2026-03-09T12:00:00.000Z", now), Some(DueStatus::Overdue));
        assert_eq!(due_status("2026-03-12T12:00:00.000Z", now), Some(DueStatus::DueSoon));
        assert_eq!(due_status("2026-03-13T12:00:00.000Z", now), Some(DueStatus::Later));
        assert_eq!(due_status("soon", now), None);
    }

    #[test]
    fn test_due_date_from_input() {
        assert_eq!(due_date_from_input("2026-03-10").as_deref(), Some("2026-03-10T12:00:00.000Z"));
        assert_eq!(due_date_from_input("  "), None);
    }

    #[test]
    fn test_priority_label() {
        assert_eq!(priority_label(Some(1)).as_deref(), Some("High"));
        assert_eq!(priority_label(Some(3)).as_deref(), Some("Low"));
        assert_eq!(priority_label(Some(7)).as_deref(), Some("P7"));
        assert_eq!(priority_label(None), None);
    }

    #[test]
    fn test_password_strength() {
        assert!(PasswordStrength::check("Secret#123").is_strong());
        let weak = PasswordStrength::check("secret");
        assert!(!weak.is_strong());
        assert!(!weak.has_upper_case);
        assert!(!weak.is_length_valid);
        assert!(weak.has_lower_case);
    }

    #[test]
    fn test_email_and_whitespace() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.io"));
        assert!(!is_valid_email("@x.io"));
        assert!(has_surrounding_whitespace(" bob"));
        assert!(!has_surrounding_whitespace("bob"));
        assert!(passwords_match("a", "a"));
    }

    #[test]
    fn test_date_input_value() {
        assert_eq!(date_input_value("2026-03-10T12:00:00Z"), "2026-03-10");
        assert_eq!(date_input_value(""), "");
    }
}
