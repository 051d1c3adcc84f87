use veracity_core::{update, AnalysisKind, JobStatus, Msg, WorkflowState};

#[test]
fn update_is_noop() {
    let state = WorkflowState::new(AnalysisKind::MediaCheck);
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn reset_on_idle_panel_changes_nothing() {
    let state = WorkflowState::new(AnalysisKind::NewsCheck);
    let (mut next, effects) = update(state.clone(), Msg::ResetRequested);

    assert_eq!(state, next);
    assert_eq!(next.status(), JobStatus::Idle);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
