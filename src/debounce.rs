//! Trailing-edge debounce timer.
//!
//! The timer does not carry the text it was started for. When it fires it sends
//! [`Event::DebounceFired`] with a ticket; the owner then reads its *current* query. Each
//! [`Debouncer::schedule`] call aborts the previous timer and issues a new ticket, so a fire that
//! was already queued before the restart is recognised as outdated by [`Debouncer::fired`].

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::tui::Event;

/// Default quiet period before a query is committed
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(200);

/// A single-slot debounce timer
pub struct Debouncer {
    quiet: Duration,
    ticket: u64,
    pending: Option<JoinHandle<()>>,
    event_tx: UnboundedSender<Event>,
}

impl Debouncer {
    /// Creates an idle debouncer. Fires are delivered on `event_tx`.
    pub fn new(quiet: Duration, event_tx: UnboundedSender<Event>) -> Self {
        Self {
            quiet,
            ticket: 0,
            pending: None,
            event_tx,
        }
    }

    /// The configured quiet period
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// (Re)start the timer. Must be called from within a tokio runtime.
    pub fn schedule(&mut self) {
        self.cancel();
        self.ticket = self.ticket.wrapping_add(1);
        let ticket = self.ticket;
        let quiet = self.quiet;
        let tx = self.event_tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            _ = tx.send(Event::DebounceFired(ticket));
        }));
    }

    /// Drop the pending timer, if any. Already queued fires become outdated.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            self.ticket = self.ticket.wrapping_add(1);
        }
    }

    /// Whether a timer is currently armed
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Acknowledge a fire. Returns `true` only for the ticket of the live timer, which is then
    /// released.
    pub fn fired(&mut self, ticket: u64) -> bool {
        if self.pending.is_some() && ticket == self.ticket {
            self.pending = None;
            true
        } else {
            trace!("ignoring outdated debounce ticket {ticket} (current {})", self.ticket);
            false
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
