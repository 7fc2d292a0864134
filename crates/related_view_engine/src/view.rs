use std::sync::Arc;

use related_view_core::{update, Effect, Msg, ParentKey, RelatedViewModel, ViewState};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use view_logging::{view_debug, view_info};

use crate::{
    ChangeEventSubscriber, ErrorReporter, PushChannel, QueryCache, RelatedFetcher, ToastSink,
};

/// Change-data-capture topic for opportunity records.
pub const CHANGE_EVENT_CHANNEL: &str = "/data/OpportunityChangeEvent";

/// Collaborators injected into a mounted view.
#[derive(Clone)]
pub struct ViewDeps {
    pub fetcher: Arc<dyn RelatedFetcher>,
    pub channel: Arc<dyn PushChannel>,
    pub toasts: Arc<dyn ToastSink>,
    pub topic: String,
}

impl ViewDeps {
    pub fn new(
        fetcher: Arc<dyn RelatedFetcher>,
        channel: Arc<dyn PushChannel>,
        toasts: Arc<dyn ToastSink>,
    ) -> Self {
        Self {
            fetcher,
            channel,
            toasts,
            topic: CHANGE_EVENT_CHANNEL.to_string(),
        }
    }
}

/// A mounted related-records view.
///
/// All state changes happen on one driver task, one message at a time.
/// Fetches and the subscription run as separate tasks and report back
/// through messages. Dropping the view without [`unmount`](Self::unmount)
/// still tears it down, just without waiting.
pub struct RelatedView {
    msg_tx: mpsc::UnboundedSender<Msg>,
    view_rx: watch::Receiver<RelatedViewModel>,
    driver: Option<JoinHandle<()>>,
}

impl RelatedView {
    /// Mounts the view for `parent_key`. Must be called inside a tokio runtime.
    pub fn mount(deps: ViewDeps, parent_key: ParentKey) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let state = ViewState::new();
        let (view_tx, view_rx) = watch::channel(state.view());

        let driver = Driver {
            state,
            cache: Arc::new(QueryCache::new(deps.fetcher)),
            subscriber: Arc::new(ChangeEventSubscriber::new(deps.channel, deps.topic)),
            reporter: ErrorReporter::new(deps.toasts),
            msg_tx: msg_tx.clone(),
            view_tx,
        };
        let driver = tokio::spawn(driver.run(msg_rx));

        view_info!("Mounting related view for parent={}", parent_key);
        let _ = msg_tx.send(Msg::Mounted { parent_key });

        Self {
            msg_tx,
            view_rx,
            driver: Some(driver),
        }
    }

    pub fn set_parent_key(&self, parent_key: ParentKey) {
        let _ = self.msg_tx.send(Msg::ParentKeyChanged(parent_key));
    }

    /// Latest rendered view model.
    pub fn view(&self) -> RelatedViewModel {
        self.view_rx.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<RelatedViewModel> {
        self.view_rx.clone()
    }

    /// Tears the view down and waits until the subscription is released.
    pub async fn unmount(mut self) {
        let _ = self.msg_tx.send(Msg::Unmounted);
        if let Some(driver) = self.driver.take() {
            let _ = driver.await;
        }
    }
}

impl Drop for RelatedView {
    fn drop(&mut self) {
        let _ = self.msg_tx.send(Msg::Unmounted);
    }
}

struct Driver {
    state: ViewState,
    cache: Arc<QueryCache>,
    subscriber: Arc<ChangeEventSubscriber>,
    reporter: ErrorReporter,
    msg_tx: mpsc::UnboundedSender<Msg>,
    view_tx: watch::Sender<RelatedViewModel>,
}

impl Driver {
    async fn run(mut self, mut msg_rx: mpsc::UnboundedReceiver<Msg>) {
        while let Some(msg) = msg_rx.recv().await {
            self.dispatch_msg(msg).await;
            if self.state.is_disposed() {
                break;
            }
        }
        view_debug!("Related view driver stopped");
    }

    async fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.view_tx.send_replace(state.view());
        }
        self.state = state;

        for effect in effects {
            self.run_effect(effect).await;
        }
    }

    async fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Subscribe => self.spawn_subscribe(),
            Effect::Fetch { parent_key } => self.spawn_fetch(parent_key),
            Effect::Refresh { parent_key } => {
                view_debug!("Refreshing related records for parent={}", parent_key);
                self.spawn_fetch(parent_key);
            }
            Effect::ReportUserFacing(error) => self.reporter.report_user_facing(&error),
            Effect::LogTransport(error) => self.reporter.log_transport(&error),
            Effect::Unsubscribe => self.subscriber.release().await,
        }
    }

    /// Registers the request here, on the driver task, so the cache follows the
    /// parent keys in message order; only the wait runs on a separate task.
    fn spawn_fetch(&self, parent_key: ParentKey) {
        let pending = self.cache.begin(parent_key);
        let cache = Arc::clone(&self.cache);
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let settlement = cache.complete(pending).await;
            let _ = msg_tx.send(Msg::FetchSettled {
                parent_key: settlement.parent_key,
                request: settlement.request,
                result: settlement.result.map_err(|err| err.detail()),
            });
        });
    }

    fn spawn_subscribe(&self) {
        let error_tx = self.msg_tx.clone();
        self.subscriber.on_transport_error(move |error| {
            let _ = error_tx.send(Msg::TransportError(error));
        });

        let subscriber = Arc::clone(&self.subscriber);
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let change_tx = msg_tx.clone();
            let result = subscriber
                .subscribe(move |notification| {
                    let _ = change_tx.send(Msg::ChangeReceived(notification));
                })
                .await;
            let msg = match result {
                Ok(()) => Msg::Subscribed,
                Err(err) => Msg::SubscribeFailed(err.detail()),
            };
            let _ = msg_tx.send(msg);
        });
    }
}
