//! Broadcast queue for change notifications.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{FlowError, Result};

/// Broadcast queue for one-to-many message distribution.
///
/// Every subscriber receives every message sent after it subscribed.
/// Backed by tokio's broadcast channel.
#[derive(Clone)]
pub struct BroadcastQueue<T> {
    sender: Arc<broadcast::Sender<T>>,
}

impl<T: Clone> BroadcastQueue<T> {
    /// create a new broadcast queue holding at least one message
    pub fn new(cap: usize) -> Arc<Self> {
        let (tx, _) = broadcast::channel(cap.max(1));

        Arc::new(Self {
            sender: Arc::new(tx),
        })
    }

    /// send a message to the queue, fails when nobody is subscribed
    pub fn send(
        &self,
        msg: T,
    ) -> Result<()> {
        self.sender.send(msg).map_err(|e| FlowError::Queue(e.to_string()))?;
        Ok(())
    }

    /// subscribe to the queue
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
