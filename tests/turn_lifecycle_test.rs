//! Turn lifecycle integration tests
//!
//! Drives the conversation controller through submit, thinking, interim and
//! completion with a manual clock, including overlapping turns.

mod common;

use common::{reasoning_log, session};
use sheetwright::domain::models::{AssistMode, PhaseMeta, Role, TurnId, TurnPhase, THINKING_TEXT};
use sheetwright::domain::{ErrorKind, SessionError};
use sheetwright::infrastructure::backend::scripted::{FINAL_TEXT, INTERIM_TEXT};
use sheetwright::services::{SessionEvent, SummaryPlacement};

#[test]
fn test_build_pnl_turn_in_analyst_mode() {
    let mut s = session(AssistMode::Analyst);
    let turn = s.controller.submit("Build P&L").unwrap();

    assert_eq!(s.controller.phase(&turn), Some(TurnPhase::Submitted));
    assert_eq!(s.controller.messages().len(), 1);
    assert_eq!(s.controller.messages()[0].role, Role::User);
    assert_eq!(s.controller.plan_proposal().current().unwrap().len(), 4);
    assert_eq!(s.controller.audit_trail().len(), 4);
    assert_eq!(s.controller.insight_tracker().len(), 3);
    assert!(s.controller.is_processing());

    s.clock.advance(400);
    s.controller.begin_thinking(&turn).unwrap();
    let thinking = &s.controller.messages()[1];
    assert_eq!(thinking.text, THINKING_TEXT);
    assert_eq!(thinking.thinking_turn(), Some(&turn));

    s.clock.advance(1600);
    s.controller.record_interim(&turn, INTERIM_TEXT).unwrap();
    assert_eq!(s.controller.messages()[2].text, INTERIM_TEXT);

    s.clock.advance(2000);
    let outcome = s
        .controller
        .finalize(&turn, FINAL_TEXT, reasoning_log())
        .unwrap();
    assert_eq!(outcome.duration_ms, 3600);
    assert_eq!(outcome.summary, SummaryPlacement::Replaced(1));

    let messages = s.controller.messages();
    assert_eq!(messages.len(), 4);
    match &messages[1].phase {
        Some(PhaseMeta::Summary {
            turn_id,
            duration_ms,
            expanded,
            log_lines,
        }) => {
            assert_eq!(turn_id, &turn);
            assert_eq!(*duration_ms, 3600);
            assert!(!expanded);
            assert_eq!(log_lines.len(), 3);
        }
        other => panic!("expected summary, got {other:?}"),
    }
    assert_eq!(messages[3].text, FINAL_TEXT);
    assert_eq!(s.controller.phase(&turn), Some(TurnPhase::Complete));
    assert!(!s.controller.is_processing());

    let turn_record = s.controller.turn(&turn).unwrap();
    assert_eq!(
        turn_record.phase_history,
        vec![
            TurnPhase::Submitted,
            TurnPhase::Thinking,
            TurnPhase::Summarizing,
            TurnPhase::Complete
        ]
    );
}

#[test]
fn test_ask_mode_produces_no_review_material() {
    let mut s = session(AssistMode::Ask);
    s.run_turn("What is in column C?");

    assert!(s.controller.plan_proposal().current().is_none());
    assert!(s.controller.audit_trail().is_empty());
    assert!(s.controller.insight_tracker().is_empty());
    assert_eq!(s.controller.messages().len(), 4);
}

#[test]
fn test_overlapping_turns_correlate_by_id() {
    let mut s = session(AssistMode::Ask);
    let a = s.controller.submit("first").unwrap();
    let b = s.controller.submit("second").unwrap();

    s.controller.begin_thinking(&a).unwrap();
    s.clock.advance(100);
    s.controller.begin_thinking(&b).unwrap();
    s.controller.record_interim(&b, "b interim").unwrap();
    s.controller.record_interim(&a, "a interim").unwrap();

    // [user a, user b, thinking a, thinking b, interim b, interim a]
    s.clock.advance(500);
    let outcome = s
        .controller
        .finalize(&b, "b done", reasoning_log())
        .unwrap();
    assert_eq!(outcome.summary, SummaryPlacement::Replaced(3));
    assert_eq!(outcome.duration_ms, 500);

    let messages = s.controller.messages();
    assert_eq!(messages[2].thinking_turn(), Some(&a));
    assert_eq!(messages[3].summary_turn(), Some(&b));
    assert_eq!(s.controller.phase(&a), Some(TurnPhase::Summarizing));
    assert_eq!(s.controller.phase(&b), Some(TurnPhase::Complete));
    assert!(s.controller.is_processing());

    s.clock.advance(300);
    let outcome = s
        .controller
        .finalize(&a, "a done", reasoning_log())
        .unwrap();
    assert_eq!(outcome.summary, SummaryPlacement::Replaced(2));
    assert_eq!(outcome.duration_ms, 900);

    let messages = s.controller.messages();
    assert_eq!(messages[2].summary_turn(), Some(&a));
    assert_eq!(messages[3].summary_turn(), Some(&b));
    assert_eq!(messages.last().unwrap().text, "a done");
    assert!(!s.controller.is_processing());
}

#[test]
fn test_out_of_order_transition_is_rejected_without_mutation() {
    let mut s = session(AssistMode::Ask);
    let turn = s.controller.submit("hello").unwrap();
    let before = s.controller.messages().to_vec();
    s.controller.drain_events();

    let err = s
        .controller
        .finalize(&turn, "done", reasoning_log())
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidTransition {
            from: TurnPhase::Submitted,
            to: TurnPhase::Complete,
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::PolicyViolation);
    assert_eq!(s.controller.messages(), before.as_slice());
    assert_eq!(s.controller.phase(&turn), Some(TurnPhase::Submitted));
    assert!(s.controller.pending_events().is_empty());

    assert!(s.controller.record_interim(&turn, "early").is_err());
    s.controller.begin_thinking(&turn).unwrap();
    assert!(s.controller.begin_thinking(&turn).is_err());
}

#[test]
fn test_completed_turn_accepts_no_more_transitions() {
    let mut s = session(AssistMode::Ask);
    let turn = s.run_turn("hello");
    let before = s.controller.messages().len();

    assert!(s.controller.begin_thinking(&turn).is_err());
    assert!(s.controller.finalize(&turn, "again", vec![]).is_err());
    assert_eq!(s.controller.messages().len(), before);
}

#[test]
fn test_unknown_turn() {
    let mut s = session(AssistMode::Ask);
    let err = s
        .controller
        .begin_thinking(&TurnId::from("t_404"))
        .unwrap_err();
    assert!(matches!(err, SessionError::NotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_blank_utterance_is_rejected() {
    let mut s = session(AssistMode::Analyst);
    for utterance in ["", "   ", "\n\t"] {
        let err = s.controller.submit(utterance).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
    assert!(s.controller.messages().is_empty());
    assert!(s.controller.turns().is_empty());
    assert!(s.controller.audit_trail().is_empty());
    assert!(s.controller.pending_events().is_empty());
}

#[test]
fn test_toggle_summary_expansion() {
    let mut s = session(AssistMode::Ask);
    s.run_turn("hello");
    let summary_id = s.controller.messages()[1].id.clone();
    let user_id = s.controller.messages()[0].id.clone();

    assert!(s.controller.toggle_summary(&summary_id).unwrap());
    assert!(!s.controller.toggle_summary(&summary_id).unwrap());
    assert_eq!(
        s.controller.toggle_summary(&user_id).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn test_mode_change_applies_to_next_turn() {
    let mut s = session(AssistMode::Ask);
    let first = s.controller.submit("first").unwrap();
    s.controller.set_mode(AssistMode::Analyst);
    let second = s.controller.submit("second").unwrap();

    assert!(!s.controller.turn(&first).unwrap().elevated);
    assert!(s.controller.turn(&second).unwrap().elevated);
    assert_eq!(s.controller.audit_trail().len(), 4);
}

#[test]
fn test_phase_events_follow_transitions() {
    let mut s = session(AssistMode::Ask);
    let turn = s.run_turn("hello");

    let events: Vec<SessionEvent> = s
        .controller
        .drain_events()
        .into_iter()
        .map(|e| e.payload)
        .collect();
    assert_eq!(
        events,
        vec![
            SessionEvent::TurnOpened {
                turn_id: turn.clone(),
                elevated: false
            },
            SessionEvent::PhaseChanged {
                turn_id: turn.clone(),
                from: TurnPhase::Submitted,
                to: TurnPhase::Thinking
            },
            SessionEvent::PhaseChanged {
                turn_id: turn.clone(),
                from: TurnPhase::Thinking,
                to: TurnPhase::Summarizing
            },
            SessionEvent::PhaseChanged {
                turn_id: turn,
                from: TurnPhase::Summarizing,
                to: TurnPhase::Complete
            },
        ]
    );
}
