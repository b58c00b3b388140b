use std::any::Any;
use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use taskflow_states::{State, state_assign_impl};

/// How long a toast stays on screen.
pub const TOAST_LIFETIME: Duration = Duration::seconds(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    /// Set on the first [`Toasts::expire`] after the push.
    pub created_at: Option<DateTime<Utc>>,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
            created_at: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
            created_at: None,
        }
    }
}

/// Confirmation and failure notices, newest last.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    items: VecDeque<Toast>,
}

impl Toasts {
    pub fn push(&mut self, toast: Toast) {
        self.items.push_back(toast);
    }

    /// Stamp new toasts with `now` and drop the ones older than [`TOAST_LIFETIME`].
    pub fn expire(&mut self, now: DateTime<Utc>) {
        for toast in &mut self.items {
            toast.created_at.get_or_insert(now);
        }
        self.items.retain(|toast| {
            toast
                .created_at
                .is_none_or(|created| now - created < TOAST_LIFETIME)
        });
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl State for Toasts {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
