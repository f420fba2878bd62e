//! Transient toasts and the persistent connection banner.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use super::state::AdminState;

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub text: String,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self::with_kind(ToastKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::with_kind(ToastKind::Error, text)
    }

    fn with_kind(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            text: text.into(),
        }
    }
}

/// Single-slot toast channel. A newer toast replaces the visible one; each
/// toast's dismissal timer only ever clears that same toast.
#[derive(Debug, Clone)]
pub struct ToastCenter {
    slot: Arc<watch::Sender<Option<Toast>>>,
    ttl: Duration,
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

impl ToastCenter {
    pub fn new(ttl: Duration) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            slot: Arc::new(sender),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Toast>> {
        self.slot.subscribe()
    }

    pub fn current(&self) -> Option<Toast> {
        self.slot.borrow().clone()
    }

    pub fn success(&self, text: impl Into<String>) -> Uuid {
        self.show(Toast::success(text))
    }

    pub fn error(&self, text: impl Into<String>) -> Uuid {
        self.show(Toast::error(text))
    }

    pub fn show(&self, toast: Toast) -> Uuid {
        let id = toast.id;
        tracing::debug!(
            target = "happyart::notify",
            toast_id = %id,
            kind = toast.kind.as_str(),
            text = %toast.text,
            "toast shown"
        );
        self.slot.send_replace(Some(toast));
        self.schedule_dismiss(id);
        id
    }

    /// Clear the toast with `id` if it is still the visible one.
    pub fn dismiss(&self, id: Uuid) -> bool {
        dismiss_matching(&self.slot, id)
    }

    fn schedule_dismiss(&self, id: Uuid) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let slot = Arc::clone(&self.slot);
        let ttl = self.ttl;
        handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            dismiss_matching(&slot, id);
        });
    }
}

fn dismiss_matching(slot: &watch::Sender<Option<Toast>>, id: Uuid) -> bool {
    slot.send_if_modified(|current| {
        if current.as_ref().is_some_and(|toast| toast.id == id) {
            *current = None;
            true
        } else {
            false
        }
    })
}

/// Connection-health notice, present only while degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionBanner {
    pub using_mock_data: bool,
    pub message: Option<String>,
}

impl ConnectionBanner {
    pub fn from_state(state: &AdminState) -> Option<Self> {
        if !state.mode.is_mock() && state.last_error.is_none() {
            return None;
        }
        Some(Self {
            using_mock_data: state.mode.is_mock(),
            message: state.last_error.clone(),
        })
    }

    pub fn headline(&self) -> &'static str {
        if self.using_mock_data {
            "Using mock data"
        } else {
            "Connection problem"
        }
    }
}
