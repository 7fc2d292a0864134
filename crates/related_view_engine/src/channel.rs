use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use related_view_core::ErrorDetail;
use view_logging::view_trace;

use crate::SubscribeError;

/// Receives raw event payloads for a subscribed channel.
pub type PayloadHandler = Arc<dyn Fn(&serde_json::Value) + Send + Sync>;
/// Receives transport-level failures.
pub type ErrorHandler = Arc<dyn Fn(ErrorDetail) + Send + Sync>;

/// Where a new subscription starts reading the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayFrom {
    /// Only events published after subscribing.
    #[default]
    Tip,
    /// Every event the transport still retains.
    Earliest,
}

impl ReplayFrom {
    /// Replay id in the streaming API's convention.
    pub fn replay_id(self) -> i64 {
        match self {
            ReplayFrom::Tip => -1,
            ReplayFrom::Earliest => -2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    pub channel: String,
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorListenerId(pub u64);

/// Push-notification boundary shared by every view in the process.
#[async_trait::async_trait]
pub trait PushChannel: Send + Sync {
    async fn subscribe(
        &self,
        channel: &str,
        replay: ReplayFrom,
        handler: PayloadHandler,
    ) -> Result<SubscriptionHandle, SubscribeError>;

    async fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), SubscribeError>;

    fn on_error(&self, handler: ErrorHandler) -> ErrorListenerId;

    fn remove_error_listener(&self, id: ErrorListenerId);
}

#[derive(Default)]
struct LocalInner {
    next_id: u64,
    subscriptions: HashMap<u64, (String, PayloadHandler)>,
    error_listeners: HashMap<u64, ErrorHandler>,
}

/// In-process channel: published payloads go straight to current subscribers.
///
/// Nothing is retained, so `ReplayFrom::Earliest` behaves like `Tip`.
#[derive(Default)]
pub struct LocalChannel {
    inner: Mutex<LocalInner>,
}

impl LocalChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `payload` to every subscriber of `channel`; returns how many received it.
    pub fn publish(&self, channel: &str, payload: &serde_json::Value) -> usize {
        let handlers: Vec<PayloadHandler> = self
            .lock()
            .subscriptions
            .values()
            .filter(|(name, _)| name == channel)
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        // Handlers run without the lock so they may call back into the channel.
        for handler in &handlers {
            handler(payload);
        }
        handlers.len()
    }

    pub fn report_error(&self, error: ErrorDetail) {
        let listeners: Vec<ErrorHandler> = self.lock().error_listeners.values().cloned().collect();
        for listener in listeners {
            listener(error.clone());
        }
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.lock()
            .subscriptions
            .values()
            .filter(|(name, _)| name == channel)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, LocalInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl PushChannel for LocalChannel {
    async fn subscribe(
        &self,
        channel: &str,
        replay: ReplayFrom,
        handler: PayloadHandler,
    ) -> Result<SubscriptionHandle, SubscribeError> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner
            .subscriptions
            .insert(id, (channel.to_string(), handler));
        view_trace!(
            "Local subscription {} on {} replay={}",
            id,
            channel,
            replay.replay_id()
        );
        Ok(SubscriptionHandle {
            channel: channel.to_string(),
            id,
        })
    }

    async fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), SubscribeError> {
        match self.lock().subscriptions.remove(&handle.id) {
            Some(_) => Ok(()),
            None => Err(SubscribeError::UnknownHandle(handle.id)),
        }
    }

    fn on_error(&self, handler: ErrorHandler) -> ErrorListenerId {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.error_listeners.insert(id, handler);
        ErrorListenerId(id)
    }

    fn remove_error_listener(&self, id: ErrorListenerId) {
        self.lock().error_listeners.remove(&id.0);
    }
}
