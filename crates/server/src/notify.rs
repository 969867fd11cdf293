//! Fan-out of notifications to connected sockets
//!
//! Delivery is at-most-once: nothing is stored, acknowledged, or replayed.
//! A subscriber that falls behind the channel capacity is disconnected.

use bulletin_core::model::{Announcement, Notification};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// Messages buffered per subscriber before it counts as lagging
const CHANNEL_CAPACITY: usize = 64;

/// Broadcast hub shared by the API handlers and socket tasks
#[derive(Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<Arc<str>>,
    closed: watch::Sender<bool>,
    connections: Arc<AtomicUsize>,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (closed, _) = watch::channel(false);
        Self {
            sender,
            closed,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register a subscriber; it sees only messages published from now on
    pub fn subscribe(&self) -> Subscription {
        self.connections.fetch_add(1, Ordering::Relaxed);
        Subscription {
            receiver: self.sender.subscribe(),
            closed: self.closed.subscribe(),
            connections: Arc::clone(&self.connections),
        }
    }

    /// Send a notification to every current subscriber
    ///
    /// Returns how many subscribers it was queued for.
    pub fn publish(&self, notification: &Notification) -> usize {
        let payload = match serde_json::to_string(notification) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode notification");
                return 0;
            }
        };

        let delivered = self.sender.send(Arc::from(payload)).unwrap_or(0);
        tracing::debug!(event = notification.event_name(), delivered, "Notification published");
        delivered
    }

    /// Publish `announcement.created`
    pub fn announcement_created(&self, announcement: &Announcement) -> usize {
        self.publish(&Notification::AnnouncementCreated(announcement.clone()))
    }

    /// Number of open subscriptions
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }

    /// Tell every subscriber to finish; used on shutdown
    pub fn close(&self) {
        self.closed.send_replace(true);
    }
}

/// What a subscriber should do next
#[derive(Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Forward this payload
    Message(Arc<str>),
    /// Stop: the hub closed or this subscriber lagged
    Finished,
}

/// One subscriber's view of the hub
pub struct Subscription {
    receiver: broadcast::Receiver<Arc<str>>,
    closed: watch::Receiver<bool>,
    connections: Arc<AtomicUsize>,
}

impl Subscription {
    /// Wait for the next payload
    pub async fn next(&mut self) -> Delivery {
        if *self.closed.borrow() {
            return Delivery::Finished;
        }

        tokio::select! {
            received = self.receiver.recv() => match received {
                Ok(payload) => Delivery::Message(payload),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dropping lagging notification subscriber");
                    Delivery::Finished
                }
                Err(broadcast::error::RecvError::Closed) => Delivery::Finished,
            },
            _ = self.closed.changed() => Delivery::Finished,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.connections.fetch_sub(1, Ordering::Relaxed);
    }
}
