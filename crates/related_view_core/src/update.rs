use crate::state::Settled;
use crate::{Effect, Msg, SubscriptionState, ViewState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ViewState, msg: Msg) -> (ViewState, Vec<Effect>) {
    // Callbacks can still land after teardown; they must not touch the view.
    if state.is_disposed() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Mounted { parent_key } => {
            state.begin_parent(parent_key.clone());
            vec![Effect::Subscribe, Effect::Fetch { parent_key }]
        }
        Msg::ParentKeyChanged(parent_key) => {
            if state.parent_key() == Some(&parent_key) {
                return (state, Vec::new());
            }
            state.begin_parent(parent_key.clone());
            vec![Effect::Fetch { parent_key }]
        }
        Msg::FetchSettled {
            parent_key,
            request,
            result,
        } => match state.settle(&parent_key, request, result) {
            Settled::Applied | Settled::Ignored => Vec::new(),
            Settled::Failed(err) => vec![Effect::ReportUserFacing(err)],
        },
        Msg::ChangeReceived(notification) => {
            let Some(parent_key) = state.parent_key().cloned() else {
                return (state, Vec::new());
            };
            match state.relevant_change(&notification) {
                Some(_) => {
                    state.begin_refresh();
                    vec![Effect::Refresh { parent_key }]
                }
                None => Vec::new(),
            }
        }
        Msg::Subscribed => {
            state.set_subscription(SubscriptionState::Active);
            Vec::new()
        }
        Msg::SubscribeFailed(err) => {
            state.set_subscription(SubscriptionState::Failed);
            vec![Effect::LogTransport(err)]
        }
        Msg::TransportError(err) => vec![Effect::LogTransport(err)],
        Msg::Unmounted => {
            state.dispose();
            vec![Effect::Unsubscribe]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
