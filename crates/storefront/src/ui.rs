//! Transient UI state: cart drawer, mobile nav, modal, toasts, loading flag.
//!
//! Nothing here is persisted. The only link to the cart is the badge count
//! read through [`CartQuery`] when a snapshot is taken.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::CartQuery;

/// How long a toast stays visible unless told otherwise.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Toast {
    /// Toast expiring after `duration` (zero means the default).
    #[must_use]
    pub fn new(kind: ToastKind, message: impl Into<String>, duration: Duration) -> Self {
        Self::issued_at(kind, message, duration, Utc::now())
    }

    fn issued_at(
        kind: ToastKind,
        message: impl Into<String>,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let duration = if duration.is_zero() {
            DEFAULT_TOAST_DURATION
        } else {
            duration
        };
        let lifetime = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX);

        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            expires_at: now.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message, DEFAULT_TOAST_DURATION)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message, DEFAULT_TOAST_DURATION)
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    ToggleCartDrawer,
    SetCartDrawer(bool),
    ToggleMobileNav,
    SetMobileNav(bool),
    /// Opening stores the content; closing discards it.
    ToggleModal(Option<String>),
    SetModal {
        open: bool,
        content: Option<String>,
    },
    CloseModal,
    AddToast(Toast),
    RemoveToast(Uuid),
    SetLoading(bool),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub cart_drawer_open: bool,
    pub mobile_nav_open: bool,
    pub modal_open: bool,
    pub modal_content: Option<String>,
    pub toasts: Vec<Toast>,
    pub loading: bool,
}

impl UiState {
    pub fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::ToggleCartDrawer => self.cart_drawer_open = !self.cart_drawer_open,
            UiAction::SetCartDrawer(open) => self.cart_drawer_open = open,
            UiAction::ToggleMobileNav => self.mobile_nav_open = !self.mobile_nav_open,
            UiAction::SetMobileNav(open) => self.mobile_nav_open = open,
            UiAction::ToggleModal(content) => {
                self.modal_content = if self.modal_open { None } else { content };
                self.modal_open = !self.modal_open;
            }
            UiAction::SetModal { open, content } => {
                self.modal_open = open;
                self.modal_content = content;
            }
            UiAction::CloseModal => {
                self.modal_open = false;
                self.modal_content = None;
            }
            UiAction::AddToast(toast) => {
                self.prune_expired(Utc::now());
                self.toasts.push(toast);
            }
            UiAction::RemoveToast(id) => self.toasts.retain(|toast| toast.id != id),
            UiAction::SetLoading(loading) => self.loading = loading,
        }
    }

    /// Push a toast and return its id.
    pub fn push_toast(&mut self, toast: Toast) -> Uuid {
        let id = toast.id;
        self.apply(UiAction::AddToast(toast));
        id
    }

    /// Drop toasts whose expiry has passed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) {
        self.toasts.retain(|toast| !toast.is_expired(now));
    }
}

/// UI state plus the cart badge count, as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiSnapshot {
    #[serde(flatten)]
    pub state: UiState,
    pub cart_count: u64,
}

impl UiSnapshot {
    /// Capture `state` (minus expired toasts) alongside the cart count.
    #[must_use]
    pub fn capture(state: &UiState, cart: &dyn CartQuery) -> Self {
        Self::capture_at(state, cart, Utc::now())
    }

    fn capture_at(state: &UiState, cart: &dyn CartQuery, now: DateTime<Utc>) -> Self {
        let mut state = state.clone();
        state.prune_expired(now);
        Self {
            state,
            cart_count: cart.get_total_items(),
        }
    }
}
