// ── UI store ──
//
// Sidebar, theme, and transient notifications. Notifications carry their
// creation time and are pruned once older than the configured TTL.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::store::Reducer;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub sidebar_open: bool,
    pub theme: ThemeMode,
    pub notifications: Vec<Notification>,
    next_id: u64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            theme: ThemeMode::default(),
            notifications: Vec::new(),
            next_id: 1,
        }
    }
}

impl UiState {
    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}

#[derive(Debug, Clone)]
pub enum UiAction {
    ToggleSidebar,
    SetSidebar(bool),
    SetTheme(ThemeMode),
    Notify {
        level: NotificationLevel,
        message: String,
        at: DateTime<Utc>,
    },
    Dismiss(u64),
    /// Drop notifications older than `ttl` as of `now`.
    Prune { ttl: Duration, now: DateTime<Utc> },
    ClearNotifications,
}

impl UiAction {
    pub fn notify(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self::Notify {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

impl Reducer for UiState {
    type Action = UiAction;

    fn reduce(&mut self, action: UiAction) {
        match action {
            UiAction::ToggleSidebar => self.sidebar_open = !self.sidebar_open,
            UiAction::SetSidebar(open) => self.sidebar_open = open,
            UiAction::SetTheme(theme) => self.theme = theme,
            UiAction::Notify { level, message, at } => {
                let id = self.next_id;
                self.next_id += 1;
                self.notifications.push(Notification {
                    id,
                    level,
                    message,
                    created_at: at,
                });
            }
            UiAction::Dismiss(id) => self.notifications.retain(|n| n.id != id),
            UiAction::Prune { ttl, now } => {
                let Ok(ttl) = chrono::Duration::from_std(ttl) else {
                    return;
                };
                self.notifications.retain(|n| now - n.created_at < ttl);
            }
            UiAction::ClearNotifications => self.notifications.clear(),
        }
    }
}
