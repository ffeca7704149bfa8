use super::*;
use crate::kernel::services::ports::{Product, SearchMessage, UNKNOWN_ERROR_MESSAGE};
use crate::kernel::UiState;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const QUIET: Duration = Duration::from_millis(300);

fn new_store() -> Store {
    Store::new(&PipelineConfig::default())
}

fn record(store: &Store) -> (Rc<RefCell<Vec<UiState>>>, crate::kernel::Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let sub = store
        .ui_state()
        .subscribe(move |state| sink.borrow_mut().push(state.clone()));
    (seen, sub)
}

fn type_and_settle(store: &mut Store, query: &str, now: Instant) -> DispatchResult {
    store.dispatch(Action::QueryChanged {
        query: query.to_string(),
        now,
    });
    store.dispatch(Action::Tick { now: now + QUIET })
}

fn completed(generation: u64, outcome: SearchOutcome) -> Action {
    Action::SearchMessage(SearchMessage::Completed {
        generation,
        outcome,
    })
}

fn products() -> Vec<Product> {
    vec![
        Product::new("p1", "Shoe", 50.0),
        Product::new("p2", "Shoe Polish", 5.0),
    ]
}

#[test]
fn store_starts_initial_and_idle() {
    let store = new_store();
    assert_eq!(store.ui_state().get(), UiState::Initial);
    assert_eq!(store.next_deadline(), None);
    assert_eq!(store.active_generation(), None);
}

#[test]
fn query_change_only_arms_the_debouncer() {
    let mut store = new_store();
    let t0 = Instant::now();
    let result = store.dispatch(Action::QueryChanged {
        query: "shoe".to_string(),
        now: t0,
    });
    assert!(result.effects.is_empty());
    assert!(!result.state_changed);
    assert_eq!(store.next_deadline(), Some(t0 + QUIET));

    let early = store.dispatch(Action::Tick {
        now: t0 + Duration::from_millis(100),
    });
    assert!(early.effects.is_empty());
    assert_eq!(store.ui_state().get(), UiState::Initial);
}

#[test]
fn non_blank_query_publishes_loading_then_starts_search() {
    let mut store = new_store();
    let result = type_and_settle(&mut store, "shoe", Instant::now());

    assert!(result.state_changed);
    assert_eq!(
        result.effects,
        vec![Effect::StartSearch {
            generation: 1,
            query: "shoe".to_string(),
        }]
    );
    assert_eq!(store.ui_state().get(), UiState::Loading);
    assert_eq!(store.active_generation(), Some(1));
}

#[test]
fn blank_query_short_circuits_to_empty_success() {
    for blank in ["", " ", "\t  "] {
        let mut store = new_store();
        let (seen, _sub) = record(&store);

        let result = type_and_settle(&mut store, blank, Instant::now());

        assert!(result.effects.is_empty());
        assert_eq!(
            *seen.borrow(),
            vec![UiState::Initial, UiState::Success(Vec::new())]
        );
    }
}

#[test]
fn results_are_published_as_success() {
    let mut store = new_store();
    let (seen, _sub) = record(&store);
    type_and_settle(&mut store, "a", Instant::now());

    let result = store.dispatch(completed(1, SearchOutcome::Results(products())));

    assert!(result.state_changed);
    assert_eq!(
        *seen.borrow(),
        vec![
            UiState::Initial,
            UiState::Loading,
            UiState::Success(products())
        ]
    );
    assert_eq!(store.active_generation(), None);
}

#[test]
fn failures_are_published_as_error() {
    let mut store = new_store();
    type_and_settle(&mut store, "a", Instant::now());
    store.dispatch(completed(1, SearchOutcome::Failure("timeout".to_string())));
    assert_eq!(store.ui_state().get(), UiState::Error("timeout".to_string()));
}

#[test]
fn burst_within_debounce_dispatches_only_last_value() {
    let mut store = new_store();
    let t0 = Instant::now();
    for (i, q) in ["s", "sh", "sho", "shoe"].iter().enumerate() {
        store.dispatch(Action::QueryChanged {
            query: q.to_string(),
            now: t0 + Duration::from_millis(100 * i as u64),
        });
    }

    let result = store.dispatch(Action::Tick {
        now: t0 + Duration::from_millis(300) + QUIET,
    });
    assert_eq!(
        result.effects,
        vec![Effect::StartSearch {
            generation: 1,
            query: "shoe".to_string(),
        }]
    );
}

#[test]
fn repeated_equal_query_is_not_dispatched_again() {
    let mut store = new_store();
    let t0 = Instant::now();
    type_and_settle(&mut store, "shoe", t0);
    store.dispatch(completed(1, SearchOutcome::Results(products())));

    // 用户改动后又改回原值，防抖后与上一次相同
    store.dispatch(Action::QueryChanged {
        query: "shoes".to_string(),
        now: t0 + Duration::from_secs(1),
    });
    let result = type_and_settle(&mut store, "shoe", t0 + Duration::from_millis(1100));

    assert!(result.effects.is_empty());
    assert_eq!(store.ui_state().get(), UiState::Success(products()));
}

#[test]
fn newer_query_cancels_outstanding_search() {
    let mut store = new_store();
    let t0 = Instant::now();
    type_and_settle(&mut store, "a", t0);
    let result = type_and_settle(&mut store, "b", t0 + Duration::from_secs(1));

    assert_eq!(
        result.effects,
        vec![
            Effect::CancelSearch { generation: 1 },
            Effect::StartSearch {
                generation: 2,
                query: "b".to_string(),
            },
        ]
    );
}

#[test]
fn late_result_from_older_query_is_discarded() {
    let mut store = new_store();
    let t0 = Instant::now();
    type_and_settle(&mut store, "a", t0);
    type_and_settle(&mut store, "b", t0 + Duration::from_secs(1));

    let b_products = vec![Product::new("b1", "Bag", 20.0)];
    store.dispatch(completed(2, SearchOutcome::Results(b_products.clone())));
    let late = store.dispatch(completed(1, SearchOutcome::Results(products())));

    assert!(!late.state_changed);
    assert_eq!(store.ui_state().get(), UiState::Success(b_products));
}

#[test]
fn older_result_arriving_while_newer_is_loading_is_discarded() {
    let mut store = new_store();
    let t0 = Instant::now();
    type_and_settle(&mut store, "a", t0);
    type_and_settle(&mut store, "b", t0 + Duration::from_secs(1));

    store.dispatch(completed(1, SearchOutcome::Failure("boom".to_string())));

    assert_eq!(store.ui_state().get(), UiState::Loading);
    assert_eq!(store.active_generation(), Some(2));
}

#[test]
fn blank_query_supersedes_in_flight_search() {
    let mut store = new_store();
    let t0 = Instant::now();
    type_and_settle(&mut store, "a", t0);
    let result = type_and_settle(&mut store, "", t0 + Duration::from_secs(1));

    assert_eq!(result.effects, vec![Effect::CancelSearch { generation: 1 }]);
    store.dispatch(completed(1, SearchOutcome::Results(products())));
    assert_eq!(store.ui_state().get(), UiState::Success(Vec::new()));
}

#[test]
fn typing_then_clearing_within_window_yields_only_empty_success() {
    let mut store = new_store();
    let (seen, _sub) = record(&store);
    let t0 = Instant::now();

    store.dispatch(Action::QueryChanged {
        query: "a".to_string(),
        now: t0,
    });
    let result = type_and_settle(&mut store, "", t0 + Duration::from_millis(150));

    assert!(result.effects.is_empty());
    assert_eq!(
        *seen.borrow(),
        vec![UiState::Initial, UiState::Success(Vec::new())]
    );
}

#[test]
fn pipeline_recovers_after_error() {
    let mut store = new_store();
    let t0 = Instant::now();
    type_and_settle(&mut store, "a", t0);
    store.dispatch(completed(
        1,
        SearchOutcome::Failure(UNKNOWN_ERROR_MESSAGE.to_string()),
    ));
    assert_eq!(
        store.ui_state().get(),
        UiState::Error(UNKNOWN_ERROR_MESSAGE.to_string())
    );

    let result = type_and_settle(&mut store, "b", t0 + Duration::from_secs(1));
    assert_eq!(result.effects.len(), 1);
    assert_eq!(store.ui_state().get(), UiState::Loading);
}

#[test]
fn cancellation_of_superseded_task_is_silent() {
    let mut store = new_store();
    let t0 = Instant::now();
    type_and_settle(&mut store, "a", t0);
    type_and_settle(&mut store, "b", t0 + Duration::from_secs(1));

    let result = store.dispatch(Action::SearchMessage(SearchMessage::Cancelled {
        generation: 1,
    }));
    assert!(!result.state_changed);
    assert_eq!(store.ui_state().get(), UiState::Loading);
}

#[test]
fn unexpected_cancellation_of_active_task_becomes_error() {
    let mut store = new_store();
    type_and_settle(&mut store, "a", Instant::now());

    store.dispatch(Action::SearchMessage(SearchMessage::Cancelled {
        generation: 1,
    }));

    assert!(matches!(store.ui_state().get(), UiState::Error(_)));
    assert_eq!(store.active_generation(), None);
}

#[test]
fn shutdown_cancels_active_search_and_ignores_everything_after() {
    let mut store = new_store();
    let (seen, sub) = record(&store);
    let t0 = Instant::now();
    type_and_settle(&mut store, "a", t0);
    store.dispatch(Action::QueryChanged {
        query: "ab".to_string(),
        now: t0 + Duration::from_secs(1),
    });

    let result = store.dispatch(Action::Shutdown);
    assert_eq!(result.effects, vec![Effect::CancelSearch { generation: 1 }]);
    assert!(store.is_closed());
    assert_eq!(store.next_deadline(), None);
    assert!(!sub.is_active());

    let after = store.dispatch(Action::Tick {
        now: t0 + Duration::from_secs(5),
    });
    assert!(after.effects.is_empty());
    store.dispatch(completed(1, SearchOutcome::Results(products())));
    assert_eq!(*seen.borrow(), vec![UiState::Initial, UiState::Loading]);
}
