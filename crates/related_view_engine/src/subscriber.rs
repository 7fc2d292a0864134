use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use related_view_core::{ChangeNotification, ErrorDetail, RecordId};
use serde::Deserialize;
use view_logging::{view_info, view_trace, view_warn};

use crate::{ErrorListenerId, PushChannel, ReplayFrom, SubscribeError, SubscriptionHandle};

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePayload {
    ChangeEvent { data: ChangeEventData },
    Flat {
        #[serde(rename = "changedIdentifiers")]
        changed_identifiers: Vec<String>,
    },
}

#[derive(Deserialize)]
struct ChangeEventData {
    payload: ChangeEventPayload,
}

#[derive(Deserialize)]
struct ChangeEventPayload {
    #[serde(rename = "ChangeEventHeader")]
    header: ChangeEventHeader,
}

#[derive(Deserialize)]
struct ChangeEventHeader {
    #[serde(rename = "recordIds")]
    record_ids: Vec<String>,
    #[serde(rename = "changeType", default)]
    change_type: Option<String>,
    #[serde(rename = "entityName", default)]
    entity_name: Option<String>,
}

/// Extracts the changed record ids from a push payload.
///
/// Accepts the change-data-capture envelope
/// (`data.payload.ChangeEventHeader.recordIds`) and the flat
/// `{"changedIdentifiers": [...]}` shape. Anything else yields `None`.
pub fn parse_notification(payload: &serde_json::Value) -> Option<ChangeNotification> {
    match WirePayload::deserialize(payload).ok()? {
        WirePayload::ChangeEvent { data } => {
            let header = data.payload.header;
            Some(ChangeNotification {
                affected: header.record_ids.into_iter().map(RecordId::from).collect(),
                change_type: header.change_type,
                entity_name: header.entity_name,
            })
        }
        WirePayload::Flat {
            changed_identifiers,
        } => Some(ChangeNotification::new(changed_identifiers)),
    }
}

#[derive(Default)]
struct SubscriberState {
    handle: Option<SubscriptionHandle>,
    error_listener: Option<ErrorListenerId>,
    subscribing: bool,
    released: bool,
}

/// One view's subscription to the change-event channel.
///
/// After [`release`](Self::release) no handler registered through this
/// subscriber fires again, even if the transport still delivers.
pub struct ChangeEventSubscriber {
    channel: Arc<dyn PushChannel>,
    topic: String,
    alive: Arc<AtomicBool>,
    state: Mutex<SubscriberState>,
}

impl ChangeEventSubscriber {
    pub fn new(channel: Arc<dyn PushChannel>, topic: impl Into<String>) -> Self {
        Self {
            channel,
            topic: topic.into(),
            alive: Arc::new(AtomicBool::new(true)),
            state: Mutex::new(SubscriberState::default()),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn is_subscribed(&self) -> bool {
        self.lock().handle.is_some()
    }

    /// Subscribes once from the tip of the stream; later calls are no-ops.
    pub async fn subscribe<F>(&self, on_change: F) -> Result<(), SubscribeError>
    where
        F: Fn(ChangeNotification) + Send + Sync + 'static,
    {
        {
            let mut state = self.lock();
            if state.released || state.subscribing || state.handle.is_some() {
                return Ok(());
            }
            state.subscribing = true;
        }

        let alive = Arc::clone(&self.alive);
        let handler = Arc::new(move |payload: &serde_json::Value| {
            if !alive.load(Ordering::Acquire) {
                return;
            }
            match parse_notification(payload) {
                Some(notification) => on_change(notification),
                None => view_trace!("Ignoring change event without record ids"),
            }
        });

        let result = self
            .channel
            .subscribe(&self.topic, ReplayFrom::Tip, handler)
            .await;

        let late_handle = {
            let mut state = self.lock();
            state.subscribing = false;
            match result {
                Ok(handle) if state.released => Some(handle),
                Ok(handle) => {
                    view_info!("Subscribed to {} (subscription {})", self.topic, handle.id);
                    state.handle = Some(handle);
                    None
                }
                Err(err) => return Err(err),
            }
        };

        // Torn down while the transport was still answering.
        if let Some(handle) = late_handle {
            self.unsubscribe_quietly(handle).await;
        }
        Ok(())
    }

    /// Registers a transport error listener that stops firing after release.
    pub fn on_transport_error<F>(&self, handler: F)
    where
        F: Fn(ErrorDetail) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        if state.released || state.error_listener.is_some() {
            return;
        }
        let alive = Arc::clone(&self.alive);
        let id = self.channel.on_error(Arc::new(move |error: ErrorDetail| {
            if alive.load(Ordering::Acquire) {
                handler(error);
            }
        }));
        state.error_listener = Some(id);
    }

    /// Releases the subscription and error listener. Safe to call repeatedly.
    pub async fn release(&self) {
        self.alive.store(false, Ordering::Release);
        let (handle, listener) = {
            let mut state = self.lock();
            state.released = true;
            (state.handle.take(), state.error_listener.take())
        };
        if let Some(listener) = listener {
            self.channel.remove_error_listener(listener);
        }
        if let Some(handle) = handle {
            self.unsubscribe_quietly(handle).await;
        }
    }

    async fn unsubscribe_quietly(&self, handle: SubscriptionHandle) {
        let id = handle.id;
        match self.channel.unsubscribe(handle).await {
            Ok(()) => view_info!("Unsubscribed from {} (subscription {})", self.topic, id),
            Err(err) => view_warn!("Unsubscribe from {} failed: {}", self.topic, err),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SubscriberState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
