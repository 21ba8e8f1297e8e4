use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::core::{NotificationSink, Severity};

const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone)]
pub struct Toast {
    pub severity: Severity,
    pub message: String,
    shown_at: Instant,
}

/// Short-lived notifications drawn over the bottom-right corner.
#[derive(Debug, Default)]
pub struct Toasts {
    items: VecDeque<Toast>,
}

impl Toasts {
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops toasts older than the display time. Returns true if any went.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_TTL);
        self.items.len() != before
    }
}

impl NotificationSink for Toasts {
    fn notify(&mut self, severity: Severity, message: &str) {
        self.items.push_back(Toast {
            severity,
            message: message.to_string(),
            shown_at: Instant::now(),
        });
        while self.items.len() > MAX_TOASTS {
            self.items.pop_front();
        }
    }
}
