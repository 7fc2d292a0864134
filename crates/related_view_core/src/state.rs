use crate::view_model::RelatedViewModel;
use crate::{
    first_relevant, ChangeNotification, DisplayRow, ErrorDetail, ParentKey, RawRecord, RecordId,
    RelevanceTracker, ViewProjector, COLUMNS,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Not mounted yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(ErrorDetail),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionState {
    #[default]
    Pending,
    Active,
    Failed,
    Released,
}

/// Outcome of applying a fetch result to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Settled {
    Applied,
    Failed(ErrorDetail),
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    parent_key: Option<ParentKey>,
    load_state: LoadState,
    subscription: SubscriptionState,
    rows: Vec<DisplayRow>,
    relevance: RelevanceTracker,
    applied_request: u64,
    revision: u64,
    disposed: bool,
    dirty: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> RelatedViewModel {
        RelatedViewModel {
            parent_key: self.parent_key.clone(),
            load_state: self.load_state.clone(),
            subscription: self.subscription,
            columns: COLUMNS,
            rows: self.rows.clone(),
            number_of_rows: self.rows.len(),
            has_rows: !self.rows.is_empty(),
            revision: self.revision,
            dirty: self.dirty,
        }
    }

    pub fn parent_key(&self) -> Option<&ParentKey> {
        self.parent_key.as_ref()
    }

    pub fn relevance(&self) -> &RelevanceTracker {
        &self.relevance
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Switches to a new parent key, dropping rows and relevance of the old one.
    pub(crate) fn begin_parent(&mut self, parent_key: ParentKey) {
        self.parent_key = Some(parent_key);
        self.rows = Vec::new();
        self.relevance.replace_all(std::iter::empty());
        self.load_state = LoadState::Loading;
        self.mark_dirty();
    }

    /// Returns the matched id when the notification should trigger a refresh.
    pub(crate) fn relevant_change(&self, notification: &ChangeNotification) -> Option<RecordId> {
        first_relevant(&self.relevance, notification).cloned()
    }

    pub(crate) fn begin_refresh(&mut self) {
        if self.load_state != LoadState::Loading {
            self.load_state = LoadState::Loading;
            self.mark_dirty();
        }
    }

    pub(crate) fn settle(
        &mut self,
        parent_key: &ParentKey,
        request: u64,
        result: Result<Vec<RawRecord>, ErrorDetail>,
    ) -> Settled {
        if self.parent_key.as_ref() != Some(parent_key) || request <= self.applied_request {
            return Settled::Ignored;
        }
        self.applied_request = request;
        self.revision += 1;
        self.mark_dirty();

        match result {
            Ok(records) => {
                self.rows = ViewProjector.apply(&records, &mut self.relevance);
                self.load_state = LoadState::Loaded;
                Settled::Applied
            }
            Err(err) => {
                // Old rows must not be shown as current; relevance stays so a
                // later change to one of them can retry.
                self.rows = Vec::new();
                self.load_state = LoadState::Failed(err.clone());
                Settled::Failed(err)
            }
        }
    }

    pub(crate) fn set_subscription(&mut self, subscription: SubscriptionState) {
        if self.subscription != subscription {
            self.subscription = subscription;
            self.mark_dirty();
        }
    }

    pub(crate) fn dispose(&mut self) {
        self.disposed = true;
        self.set_subscription(SubscriptionState::Released);
    }
}
