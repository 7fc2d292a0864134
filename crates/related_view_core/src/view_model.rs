use crate::{ColumnSpec, DisplayRow, LoadState, ParentKey, SubscriptionState};

/// Everything the table widget needs to render the view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelatedViewModel {
    pub parent_key: Option<ParentKey>,
    pub load_state: LoadState,
    pub subscription: SubscriptionState,
    pub columns: &'static [ColumnSpec],
    pub rows: Vec<DisplayRow>,
    pub number_of_rows: usize,
    /// The table is only rendered when this is set.
    pub has_rows: bool,
    /// Number of fetch results applied so far.
    pub revision: u64,
    pub dirty: bool,
}
