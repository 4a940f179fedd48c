//! In-process broadcast groups.
//!
//! Each group key maps to one `tokio::sync::broadcast` channel. Groups are
//! created on first subscription and pruned when their last subscription is
//! dropped, so the registry only holds groups with live members.

use std::sync::Arc;

use dashmap::DashMap;
use roomchat_core::GroupKey;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::RecvError;

/// Process-scoped registry of broadcast groups
#[derive(Debug)]
pub struct BroadcastHub {
    groups: DashMap<GroupKey, broadcast::Sender<Arc<str>>>,
    capacity: usize,
}

impl BroadcastHub {
    /// Create a hub whose groups buffer up to `capacity` events per subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            groups: DashMap::new(),
            capacity: capacity.max(1),
        })
    }

    /// Join a group, creating it if needed.
    ///
    /// The subscription only sees events delivered after this call returns.
    #[must_use]
    pub fn subscribe(self: &Arc<Self>, key: &GroupKey) -> GroupSubscription {
        let receiver = self
            .groups
            .entry(key.clone())
            .or_insert_with(|| {
                tracing::debug!(group = %key, "Broadcast group created");
                broadcast::channel(self.capacity).0
            })
            .subscribe();

        GroupSubscription {
            hub: Arc::clone(self),
            key: key.clone(),
            receiver: Some(receiver),
        }
    }

    /// Deliver a serialized event to every current member of a group.
    ///
    /// Returns the number of subscriptions that will observe it.
    pub fn deliver(&self, key: &GroupKey, payload: Arc<str>) -> usize {
        self.groups
            .get(key)
            .map_or(0, |tx| tx.send(payload).unwrap_or(0))
    }

    /// Number of groups with at least one live subscription
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of live subscriptions in a group
    #[must_use]
    pub fn subscriber_count(&self, key: &GroupKey) -> usize {
        self.groups.get(key).map_or(0, |tx| tx.receiver_count())
    }

    fn release(&self, key: &GroupKey) {
        if self
            .groups
            .remove_if(key, |_, tx| tx.receiver_count() == 0)
            .is_some()
        {
            tracing::debug!(group = %key, "Broadcast group pruned");
        }
    }
}

/// Membership of one session in one broadcast group.
///
/// Dropping the subscription leaves the group.
#[derive(Debug)]
pub struct GroupSubscription {
    hub: Arc<BroadcastHub>,
    key: GroupKey,
    receiver: Option<broadcast::Receiver<Arc<str>>>,
}

impl GroupSubscription {
    /// Group this subscription belongs to
    #[must_use]
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Wait for the next event in the group.
    ///
    /// `RecvError::Lagged(n)` reports that `n` events were skipped because the
    /// subscriber fell behind; the next call resumes with the oldest retained event.
    pub async fn recv(&mut self) -> Result<Arc<str>, RecvError> {
        match self.receiver.as_mut() {
            Some(rx) => rx.recv().await,
            None => Err(RecvError::Closed),
        }
    }
}

impl Drop for GroupSubscription {
    fn drop(&mut self) {
        drop(self.receiver.take());
        self.hub.release(&self.key);
    }
}
