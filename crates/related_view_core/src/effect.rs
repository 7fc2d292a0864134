use crate::{ErrorDetail, ParentKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the change-event subscription for this view.
    Subscribe,
    /// Load the related records for a (new) parent key.
    Fetch { parent_key: ParentKey },
    /// Reload the current parent key, sharing any fetch already in flight.
    Refresh { parent_key: ParentKey },
    /// Show a dismissable error toast.
    ReportUserFacing(ErrorDetail),
    /// Diagnostic log only; never shown to the user.
    LogTransport(ErrorDetail),
    /// Release the change-event subscription.
    Unsubscribe,
}
