//! Dismissible toast notifications

use std::time::{Duration, Instant};

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// A single toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.duration
    }

    /// Fraction of the lifetime already elapsed, 0.0 to 1.0
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.created_at).as_secs_f32();
        (elapsed / self.duration.as_secs_f32()).min(1.0)
    }
}

/// Toast queue
#[derive(Debug)]
pub struct Notifications {
    toasts: Vec<Toast>,
    next_id: u64,
    max_toasts: usize,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 0,
            max_toasts: 5,
        }
    }
}

impl Notifications {
    const DEFAULT_DURATION: Duration = Duration::from_secs(4);
    const ERROR_DURATION: Duration = Duration::from_secs(8);

    pub fn push(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let duration = match kind {
            ToastKind::Error => Self::ERROR_DURATION,
            _ => Self::DEFAULT_DURATION,
        };

        self.toasts.push(Toast {
            id,
            kind,
            title: title.into(),
            description: description.into(),
            created_at: Instant::now(),
            duration,
        });

        // Drop oldest
        while self.toasts.len() > self.max_toasts {
            self.toasts.remove(0);
        }
        id
    }

    pub fn info(&mut self, title: impl Into<String>, description: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, title, description)
    }

    pub fn success(&mut self, title: impl Into<String>, description: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, title, description)
    }

    pub fn error(&mut self, title: impl Into<String>, description: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, title, description)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    /// Remove expired toasts
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|toast| !toast.is_expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_dropped_past_limit() {
        let mut notifications = Notifications::default();
        for i in 0..7 {
            notifications.info(format!("toast {i}"), "");
        }
        let titles: Vec<_> = notifications.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles.len(), 5);
        assert_eq!(titles[0], "toast 2");
    }

    #[test]
    fn test_dismiss_and_expiry() {
        let mut notifications = Notifications::default();
        let id = notifications.success("Saved", "");
        notifications.error("Export failed", "");

        notifications.dismiss(id);
        assert_eq!(notifications.iter().count(), 1);

        let later = Instant::now() + Duration::from_secs(60);
        notifications.prune(later);
        assert!(notifications.is_empty());
    }
}
