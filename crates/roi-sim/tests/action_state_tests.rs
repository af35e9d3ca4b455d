use proptest::prelude::*;
use roi_sim::state_machine::{allowed_events, transition};
use roi_sim::{ActionEvent, ActionKind, ActionState, ActionStatuses};

fn any_kind() -> impl Strategy<Value = ActionKind> {
    prop_oneof![
        Just(ActionKind::Simulate),
        Just(ActionKind::Save),
        Just(ActionKind::Load),
        Just(ActionKind::Delete),
        Just(ActionKind::Report),
    ]
}

fn any_event() -> impl Strategy<Value = ActionEvent> {
    prop_oneof![
        Just(ActionEvent::Start),
        Just(ActionEvent::Supersede),
        Just(ActionEvent::Succeed),
        Just(ActionEvent::Fail),
        Just(ActionEvent::Cancel),
    ]
}

#[test]
fn test_pending_settles_to_idle() {
    for kind in ActionKind::ALL {
        assert_eq!(
            transition(kind, ActionState::Pending, ActionEvent::Succeed),
            Ok(ActionState::Idle)
        );
        assert_eq!(
            transition(kind, ActionState::Pending, ActionEvent::Fail),
            Ok(ActionState::Idle)
        );
    }
}

#[test]
fn test_settled_action_can_start_again() {
    let mut statuses = ActionStatuses::new();
    statuses.apply(ActionKind::Save, ActionEvent::Start).unwrap();
    assert!(statuses.apply(ActionKind::Save, ActionEvent::Start).is_err());

    statuses.fail(ActionKind::Save, "Failed to save scenario").unwrap();
    statuses.apply(ActionKind::Save, ActionEvent::Start).unwrap();
    assert!(statuses.is_pending(ActionKind::Save));
}

proptest! {
    #[test]
    fn prop_transitions_match_allowed_events(
        kind in any_kind(),
        from in prop_oneof![Just(ActionState::Idle), Just(ActionState::Pending)],
        event in any_event(),
    ) {
        let res = transition(kind, from, event);
        let allowed = allowed_events(kind, from);

        prop_assert_eq!(res.is_ok(), allowed.contains(&event));
    }

    #[test]
    fn prop_rejected_events_leave_status_untouched(
        steps in prop::collection::vec((any_kind(), any_event()), 0..40)
    ) {
        let mut statuses = ActionStatuses::new();
        for (kind, event) in steps {
            let before = statuses.clone();
            if statuses.apply(kind, event).is_err() {
                prop_assert_eq!(&statuses, &before);
            }
            // only the targeted kind ever changes
            for other in ActionKind::ALL.into_iter().filter(|k| *k != kind) {
                prop_assert_eq!(statuses.get(other), before.get(other));
            }
        }
    }
}
