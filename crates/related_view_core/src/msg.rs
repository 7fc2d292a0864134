#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The view was attached to its host with an initial parent key.
    Mounted { parent_key: crate::ParentKey },
    /// The host supplied a different parent key.
    ParentKeyChanged(crate::ParentKey),
    /// A fetch or refresh for `parent_key` finished. `request` increases per issued fetch.
    FetchSettled {
        parent_key: crate::ParentKey,
        request: u64,
        result: Result<Vec<crate::RawRecord>, crate::ErrorDetail>,
    },
    /// The push channel delivered a change notification.
    ChangeReceived(crate::ChangeNotification),
    /// The subscription was accepted by the transport.
    Subscribed,
    /// The transport refused the subscription.
    SubscribeFailed(crate::ErrorDetail),
    /// The transport reported a delivery or connection problem.
    TransportError(crate::ErrorDetail),
    /// The view is being torn down.
    Unmounted,
    /// Fallback for placeholder wiring.
    NoOp,
}
