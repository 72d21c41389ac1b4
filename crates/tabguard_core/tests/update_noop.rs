use tabguard_core::{update, Msg, WatcherState};

#[test]
fn update_is_noop() {
    let state = WatcherState::default();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
