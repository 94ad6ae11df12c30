use battleship_sync::{Coord, Phase, Side, TurnCoordinator, TurnError};

fn in_combat(first: Side) -> TurnCoordinator {
    let mut tc = TurnCoordinator::new(first);
    tc.confirm_local().unwrap();
    tc.confirm_remote();
    assert_eq!(tc.phase(), Phase::Combat);
    tc
}

#[test]
fn test_local_confirm_waits_for_remote() {
    let mut tc = TurnCoordinator::new(Side::Local);
    assert_eq!(tc.phase(), Phase::Placement);
    assert!(!tc.confirm_local().unwrap());
    assert_eq!(tc.phase(), Phase::WaitingForConfirmation);
    assert!(tc.local_confirmed());
    assert!(tc.take_outgoing_confirm());
    assert!(!tc.take_outgoing_confirm());

    assert!(tc.confirm_remote());
    assert_eq!(tc.phase(), Phase::Combat);
    assert!(!tc.local_confirmed());
    assert!(!tc.remote_confirmed());
    assert_eq!(tc.active_turn(), Side::Local);
}

#[test]
fn test_remote_first_keeps_placement() {
    let mut tc = TurnCoordinator::new(Side::Remote);
    assert!(!tc.confirm_remote());
    assert_eq!(tc.phase(), Phase::Placement);
    assert!(tc.remote_confirmed());
    assert!(!tc.take_outgoing_confirm());

    assert!(tc.confirm_local().unwrap());
    assert_eq!(tc.phase(), Phase::Combat);
    assert_eq!(tc.active_turn(), Side::Remote);
    // our confirmation still has to reach the peer
    assert!(tc.take_outgoing_confirm());
}

#[test]
fn test_simultaneous_confirm_transitions_once() {
    let mut tc = TurnCoordinator::new(Side::Local);
    tc.confirm_local().unwrap();
    // remote confirmation lands before ours went out
    assert!(tc.confirm_remote());
    assert_eq!(tc.phase(), Phase::Combat);
    assert!(tc.take_outgoing_confirm());

    // a duplicate or late confirmation changes nothing
    assert!(!tc.confirm_remote());
    assert!(!tc.take_outgoing_confirm());
    assert_eq!(tc.confirm_local().unwrap_err(), TurnError::WrongPhase(Phase::Combat));
    assert_eq!(tc.phase(), Phase::Combat);
    assert!(!tc.local_confirmed());
    assert!(!tc.remote_confirmed());
}

#[test]
fn test_double_local_confirm_is_idempotent() {
    let mut tc = TurnCoordinator::new(Side::Local);
    assert!(!tc.confirm_local().unwrap());
    assert!(!tc.confirm_local().unwrap());
    assert!(tc.take_outgoing_confirm());
    assert!(!tc.take_outgoing_confirm());
}

#[test]
fn test_turn_alternates() {
    let mut tc = in_combat(Side::Local);
    let mut expected = Side::Local;
    for i in 0..10 {
        assert_eq!(tc.active_turn(), expected);
        match expected {
            Side::Local => {
                let c = Coord::new(1 + i % 10, 1);
                tc.begin_local_shot(c).unwrap();
                // still ours until the answer is processed
                assert_eq!(tc.active_turn(), Side::Local);
                assert_eq!(tc.complete_local_shot().unwrap(), c);
            }
            Side::Remote => {
                tc.accept_remote_shot().unwrap();
                tc.complete_remote_shot().unwrap();
            }
        }
        expected = expected.other();
    }
}

#[test]
fn test_rejected_shot_keeps_turn() {
    let mut tc = in_combat(Side::Local);
    tc.begin_local_shot(Coord::new(2, 2)).unwrap();
    assert_eq!(tc.reject_local_shot(), Some(Coord::new(2, 2)));
    assert_eq!(tc.active_turn(), Side::Local);
    assert_eq!(tc.pending_shot(), None);
}

#[test]
fn test_refusals() {
    let mut tc = TurnCoordinator::new(Side::Local);
    assert_eq!(
        tc.begin_local_shot(Coord::new(1, 1)).unwrap_err(),
        TurnError::WrongPhase(Phase::Placement)
    );

    let mut tc = in_combat(Side::Remote);
    assert_eq!(tc.begin_local_shot(Coord::new(1, 1)).unwrap_err(), TurnError::NotYourTurn);
    assert_eq!(tc.complete_local_shot().unwrap_err(), TurnError::NoShotOutstanding);

    let mut tc = in_combat(Side::Local);
    assert_eq!(tc.accept_remote_shot().unwrap_err(), TurnError::NotYourTurn);
    tc.begin_local_shot(Coord::new(1, 1)).unwrap();
    assert_eq!(
        tc.begin_local_shot(Coord::new(2, 1)).unwrap_err(),
        TurnError::ShotOutstanding(Coord::new(1, 1))
    );
}

#[test]
fn test_finish_is_terminal() {
    let mut tc = in_combat(Side::Local);
    tc.begin_local_shot(Coord::new(1, 1)).unwrap();
    tc.finish();
    assert!(tc.is_finished());
    assert_eq!(tc.pending_shot(), None);
    assert!(!tc.confirm_remote());
    assert_eq!(tc.phase(), Phase::Finished);
    assert!(tc.begin_local_shot(Coord::new(2, 2)).is_err());
}
