//! Related view core: pure state machine for a parent's related-record table.
mod columns;
mod coordinator;
mod effect;
mod msg;
mod projection;
mod record;
mod relevance;
mod state;
mod update;
mod view_model;

pub use columns::{ColumnSpec, ColumnType, LinkTarget, TypeAttributes, COLUMNS};
pub use coordinator::first_relevant;
pub use effect::Effect;
pub use msg::Msg;
pub use projection::{link_url, probability_label, project, ViewProjector, RECORD_ROUTE};
pub use record::{
    ChangeNotification, DisplayRow, ErrorDetail, ParentKey, QueryResult, RawRecord, RecordId,
};
pub use relevance::RelevanceTracker;
pub use state::{LoadState, SubscriptionState, ViewState};
pub use update::update;
pub use view_model::RelatedViewModel;
