//! Related view engine: fetching, change subscriptions and the view driver.
mod channel;
mod fetch;
mod query_cache;
mod reporter;
mod subscriber;
mod types;
mod view;

pub use channel::{
    ErrorHandler, ErrorListenerId, LocalChannel, PayloadHandler, PushChannel, ReplayFrom,
    SubscriptionHandle,
};
pub use fetch::{FetchSettings, RelatedFetcher, ReqwestFetcher};
pub use query_cache::{PendingFetch, QueryCache, Settlement};
pub use reporter::{ErrorReporter, Toast, ToastMode, ToastSeverity, ToastSink};
pub use subscriber::{parse_notification, ChangeEventSubscriber};
pub use types::{FailureKind, FetchError, SubscribeError};
pub use view::{RelatedView, ViewDeps, CHANGE_EVENT_CHANNEL};
