use std::sync::Once;

use related_view_core::{
    update, Effect, ErrorDetail, LoadState, Msg, ParentKey, RawRecord, RecordId, ViewState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(view_logging::initialize_for_tests);
}

fn record(id: &str, probability: f64) -> RawRecord {
    RawRecord {
        id: RecordId::from(id),
        name: format!("Deal {id}"),
        amount: Some(100.0),
        stage_name: "Open".to_string(),
        close_date: Some("2026-01-31".to_string()),
        main_competitors: None,
        probability: Some(probability),
    }
}

fn mounted(key: &str) -> ViewState {
    let (state, _) = update(
        ViewState::new(),
        Msg::Mounted {
            parent_key: ParentKey::from(key),
        },
    );
    state
}

fn settle(
    state: ViewState,
    key: &str,
    request: u64,
    result: Result<Vec<RawRecord>, ErrorDetail>,
) -> (ViewState, Vec<Effect>) {
    update(
        state,
        Msg::FetchSettled {
            parent_key: ParentKey::from(key),
            request,
            result,
        },
    )
}

#[test]
fn mount_subscribes_and_fetches() {
    init_logging();
    let (state, effects) = update(
        ViewState::new(),
        Msg::Mounted {
            parent_key: ParentKey::from("P1"),
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::Subscribe,
            Effect::Fetch {
                parent_key: ParentKey::from("P1")
            },
        ]
    );
    assert_eq!(state.view().load_state, LoadState::Loading);
    assert!(!state.view().has_rows);
}

#[test]
fn successful_fetch_projects_rows_and_tracks_ids() {
    init_logging();
    let (mut state, effects) = settle(mounted("P1"), "P1", 1, Ok(vec![record("R1", 0.5)]));

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.load_state, LoadState::Loaded);
    assert_eq!(view.number_of_rows, 1);
    assert!(view.has_rows);
    assert_eq!(view.rows[0].probability_label, "0.5%");
    assert_eq!(view.rows[0].link_url, "/lightning/r/Opportunity/R1/view");
    assert!(state.relevance().contains("R1"));
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn empty_fetch_hides_table() {
    init_logging();
    let (state, _) = settle(mounted("P1"), "P1", 1, Ok(Vec::new()));

    let view = state.view();
    assert!(!view.has_rows);
    assert_eq!(view.number_of_rows, 0);
    assert!(state.relevance().is_empty());
}

#[test]
fn later_fetch_replaces_relevance_set() {
    init_logging();
    let (state, _) = settle(
        mounted("P1"),
        "P1",
        1,
        Ok(vec![record("R1", 0.5), record("R2", 0.2)]),
    );
    let (state, _) = settle(state, "P1", 2, Ok(vec![record("R2", 0.3), record("R3", 0.9)]));

    assert!(!state.relevance().contains("R1"));
    assert!(state.relevance().contains("R2"));
    assert!(state.relevance().contains("R3"));
    let names: Vec<_> = state.view().rows.iter().map(|r| r.name.clone()).collect();
    assert_eq!(names, vec!["Deal R2", "Deal R3"]);
}

#[test]
fn failed_fetch_reports_once_and_keeps_relevance() {
    init_logging();
    let (state, _) = settle(mounted("P1"), "P1", 1, Ok(vec![record("R1", 0.5)]));
    let before = state.relevance().clone();

    let (state, effects) = settle(state, "P1", 2, Err(ErrorDetail::new("timeout")));

    assert_eq!(
        effects,
        vec![Effect::ReportUserFacing(ErrorDetail::new("timeout"))]
    );
    assert_eq!(state.relevance(), &before);
    let view = state.view();
    assert_eq!(view.load_state, LoadState::Failed(ErrorDetail::new("timeout")));
    assert!(!view.has_rows, "stale rows must not be shown after a failure");

    // A second settlement of the same shared request is not reported again.
    let (_, effects) = settle(state, "P1", 2, Err(ErrorDetail::new("timeout")));
    assert!(effects.is_empty());
}

#[test]
fn result_for_previous_parent_is_ignored() {
    init_logging();
    let state = mounted("P1");
    let (state, effects) = update(state, Msg::ParentKeyChanged(ParentKey::from("P2")));
    assert_eq!(
        effects,
        vec![Effect::Fetch {
            parent_key: ParentKey::from("P2")
        }]
    );

    let (state, effects) = settle(state, "P1", 1, Ok(vec![record("R1", 0.5)]));
    assert!(effects.is_empty());
    assert!(!state.relevance().contains("R1"));
    assert_eq!(state.view().revision, 0);
}

#[test]
fn parent_change_clears_rows_and_relevance() {
    init_logging();
    let (state, _) = settle(mounted("P1"), "P1", 1, Ok(vec![record("R1", 0.5)]));
    let (state, _) = update(state, Msg::ParentKeyChanged(ParentKey::from("P2")));

    assert!(state.relevance().is_empty());
    assert!(!state.view().has_rows);
    assert_eq!(state.view().load_state, LoadState::Loading);
}

#[test]
fn same_parent_key_does_not_refetch() {
    init_logging();
    let state = mounted("P1");
    let (next, effects) = update(state.clone(), Msg::ParentKeyChanged(ParentKey::from("P1")));

    assert!(effects.is_empty());
    assert_eq!(state, next);
}

#[test]
fn nothing_happens_after_unmount() {
    init_logging();
    let (state, effects) = update(mounted("P1"), Msg::Unmounted);
    assert_eq!(effects, vec![Effect::Unsubscribe]);

    let (state, effects) = settle(state, "P1", 1, Ok(vec![record("R1", 0.5)]));
    assert!(effects.is_empty());
    assert!(!state.relevance().contains("R1"));

    let (_, effects) = update(state, Msg::Unmounted);
    assert!(effects.is_empty(), "teardown is only performed once");
}
