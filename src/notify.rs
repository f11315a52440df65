//! Toast notifications.
//!
//! Producers never touch the list directly: they hold a [`Notifier`], which posts
//! [`NotificationMsg`]s on the application's event channel. The event loop hands every message
//! to the single [`NotificationStore`], the only place the list is mutated.

use std::fmt::Display;
use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::tui::Event;

/// How long a toast stays on screen unless closed earlier
pub const AUTO_DISMISS: Duration = Duration::from_secs(3);

/// Kind of notification, drives the toast colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Green toast
    Success,
    /// Red toast
    Error,
    /// Blue toast
    Info,
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

/// A notification currently on screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Store-assigned id
    pub id: u64,
    /// Text of the toast
    pub message: String,
    /// Kind of the toast
    pub kind: NotificationKind,
}

/// Messages understood by the [`NotificationStore`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationMsg {
    /// Show a new toast
    Add {
        /// Text of the toast
        message: String,
        /// Kind of the toast
        kind: NotificationKind,
    },
    /// Remove the toast with this id (no-op if it is already gone)
    Remove(u64),
}

/// Cheap, cloneable handle used to post notification messages
#[derive(Clone, Debug)]
pub struct Notifier {
    event_tx: UnboundedSender<Event>,
}

impl Notifier {
    /// Creates a handle posting on `event_tx`
    pub fn new(event_tx: UnboundedSender<Event>) -> Self {
        Self { event_tx }
    }

    /// Ask for a new toast
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) {
        self.send(NotificationMsg::Add {
            message: message.into(),
            kind,
        });
    }

    /// Ask for a toast to be removed
    pub fn dismiss(&self, id: u64) {
        self.send(NotificationMsg::Remove(id));
    }

    fn send(&self, msg: NotificationMsg) {
        if self.event_tx.send(Event::Notify(msg)).is_err() {
            debug!("notification dropped: event loop is gone");
        }
    }
}

struct Entry {
    notification: Notification,
    dismiss_timer: JoinHandle<()>,
}

/// Owner of the visible notifications
pub struct NotificationStore {
    entries: IndexMap<u64, Entry>,
    next_id: u64,
    dismiss_after: Duration,
    notifier: Notifier,
}

impl NotificationStore {
    /// Creates an empty store; auto-dismiss messages are posted on `event_tx`
    pub fn new(event_tx: UnboundedSender<Event>) -> Self {
        Self {
            entries: IndexMap::new(),
            next_id: 1,
            dismiss_after: AUTO_DISMISS,
            notifier: Notifier::new(event_tx),
        }
    }

    /// Override the auto-dismiss delay
    pub fn dismiss_after(mut self, delay: Duration) -> Self {
        self.dismiss_after = delay;
        self
    }

    /// A handle producers can use to post messages to this store
    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    /// Apply one message. Returns the id of the toast created by an `Add`.
    ///
    /// Must be called from within a tokio runtime, as `Add` arms a dismiss timer.
    pub fn apply(&mut self, msg: &NotificationMsg) -> Option<u64> {
        match msg {
            NotificationMsg::Add { message, kind } => {
                let id = self.next_id;
                self.next_id += 1;
                let notifier = self.notifier.clone();
                let delay = self.dismiss_after;
                let dismiss_timer = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    notifier.dismiss(id);
                });
                debug!("notification {id} ({kind}): {message}");
                self.entries.insert(
                    id,
                    Entry {
                        notification: Notification {
                            id,
                            message: message.clone(),
                            kind: *kind,
                        },
                        dismiss_timer,
                    },
                );
                Some(id)
            }
            NotificationMsg::Remove(id) => {
                if let Some(entry) = self.entries.shift_remove(id) {
                    entry.dismiss_timer.abort();
                    debug!("notification {id} removed");
                }
                None
            }
        }
    }

    /// Visible notifications, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.values().map(|e| &e.notification)
    }

    /// Number of visible notifications
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is visible
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for NotificationStore {
    fn drop(&mut self) {
        for entry in self.entries.values() {
            entry.dismiss_timer.abort();
        }
    }
}
