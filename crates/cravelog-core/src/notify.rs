//! Interface to the system notification service.
//!
//! Only the queries the digest needs: list what has been delivered for a
//! thread and remove entries by id. Delivery itself belongs to the app.

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// A notification currently shown in the system notification list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredNotification {
    pub id: String,
    pub thread_id: String,
    pub title: String,
}

/// The parts of the system notification service the digest uses.
pub trait NotificationCenter {
    /// Delivered notifications tagged with `thread_id`.
    fn delivered(&self, thread_id: &str) -> Result<Vec<DeliveredNotification>, NotifyError>;

    fn remove_delivered(&mut self, ids: &[String]) -> Result<(), NotifyError>;
}

/// Notification center that has nothing delivered and ignores removals.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationCenter;

impl NotificationCenter for NoopNotificationCenter {
    fn delivered(&self, _thread_id: &str) -> Result<Vec<DeliveredNotification>, NotifyError> {
        Ok(Vec::new())
    }

    fn remove_delivered(&mut self, _ids: &[String]) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// In-memory notification list, used by tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotificationCenter {
    delivered: Vec<DeliveredNotification>,
}

impl MemoryNotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&mut self, id: &str, thread_id: &str, title: &str) {
        self.delivered.push(DeliveredNotification {
            id: id.to_string(),
            thread_id: thread_id.to_string(),
            title: title.to_string(),
        });
    }

    pub fn all(&self) -> &[DeliveredNotification] {
        &self.delivered
    }
}

impl NotificationCenter for MemoryNotificationCenter {
    fn delivered(&self, thread_id: &str) -> Result<Vec<DeliveredNotification>, NotifyError> {
        Ok(self
            .delivered
            .iter()
            .filter(|n| n.thread_id == thread_id)
            .cloned()
            .collect())
    }

    fn remove_delivered(&mut self, ids: &[String]) -> Result<(), NotifyError> {
        self.delivered.retain(|n| !ids.contains(&n.id));
        Ok(())
    }
}

impl<N: NotificationCenter + ?Sized> NotificationCenter for &mut N {
    fn delivered(&self, thread_id: &str) -> Result<Vec<DeliveredNotification>, NotifyError> {
        (**self).delivered(thread_id)
    }

    fn remove_delivered(&mut self, ids: &[String]) -> Result<(), NotifyError> {
        (**self).remove_delivered(ids)
    }
}
