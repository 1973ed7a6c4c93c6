/*
 * Unit tests for the elevator module
 *
 * The unit tests follow the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_fsm_init
 * - test_fsm_admit_enqueues
 * - test_fsm_admit_capacity_rejected
 * - test_fsm_admit_counts_queued_passengers
 * - test_fsm_admit_invalid_floor
 * - test_fsm_drain_empty_queue_is_noop
 * - test_fsm_drain_in_submission_order
 * - test_fsm_direction_follows_travel
 * - test_fsm_travel_updates_state
 * - test_fsm_idle_without_requests
 *
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod fsm_tests {
    use crate::config::ElevatorConfig;
    use crate::elevator::ElevatorFSM;
    use crate::shared::Direction::{Down, None, Up};
    use crate::shared::Status::{Moving, Stationary};
    use crate::shared::{AdmissionError, AdmitRequest, ElevatorSnapshot, Request};
    use crossbeam_channel::{bounded, unbounded, RecvTimeoutError};
    use std::thread::spawn;
    use std::time::Duration;

    fn setup_fsm() -> (
        ElevatorFSM,
        crossbeam_channel::Sender<AdmitRequest>,
        crossbeam_channel::Receiver<ElevatorSnapshot>,
        crossbeam_channel::Sender<()>,
    ) {
        // Arrange mock channels
        let (admit_tx, admit_rx) = unbounded::<AdmitRequest>();
        let (state_tx, state_rx) = unbounded::<ElevatorSnapshot>();
        let (terminate_tx, terminate_rx) = unbounded::<()>();

        // Default configuration with instant travel
        let config = ElevatorConfig {
            max_passengers: 10,
            travel_time_per_floor: 0,
            tick_interval: 5,
        };

        // Create the FSM for a 10 floor building and return it with the channels
        (
            ElevatorFSM::new(1, &config, 10, admit_rx, state_tx, terminate_rx),
            admit_tx,
            state_rx,
            terminate_tx,
        )
    }

    fn admit(
        admit_tx: &crossbeam_channel::Sender<AdmitRequest>,
        request: Request,
    ) -> Result<(), AdmissionError> {
        let (reply_tx, reply_rx) = bounded::<Result<(), AdmissionError>>(1);
        admit_tx.send(AdmitRequest { request, reply_tx }).unwrap();
        match reply_rx.recv_timeout(Duration::from_secs(3)) {
            Ok(outcome) => outcome,
            Err(e) => panic!("Timed out waiting for admission reply: {:?}", e),
        }
    }

    fn next_snapshot(
        state_rx: &crossbeam_channel::Receiver<ElevatorSnapshot>,
    ) -> ElevatorSnapshot {
        match state_rx.recv_timeout(Duration::from_secs(3)) {
            Ok(snapshot) => snapshot,
            Err(e) => panic!("Timed out waiting for state_rx: {:?}", e),
        }
    }

    #[test]
    fn test_fsm_init() {
        // Purpose: Verify that the FSM is in the expected initial state after creation

        // Arrange
        let (fsm, _admit_tx, _state_rx, _terminate_tx) = setup_fsm();

        // Act
        let snapshot = fsm.test_snapshot();

        // Assert
        assert_eq!(snapshot.floor, 1);
        assert_eq!(snapshot.direction, None);
        assert_eq!(snapshot.status, Stationary);
        assert_eq!(snapshot.occupancy, 0);
        assert_eq!(fsm.test_queue_len(), 0);
    }

    #[test]
    fn test_fsm_admit_enqueues() {
        // Purpose: Verify that an admitted request lands at the queue tail
        // without touching the elevator state

        // Arrange
        let (mut fsm, _admit_tx, _state_rx, _terminate_tx) = setup_fsm();
        let before = fsm.test_snapshot();

        // Act
        let outcome = fsm.test_admit(Request::new(5, 2));

        // Assert
        assert_eq!(outcome, Ok(()));
        assert_eq!(fsm.test_queue_len(), 1);
        assert_eq!(fsm.test_snapshot(), before);
    }

    #[test]
    fn test_fsm_admit_capacity_rejected() {
        // Purpose: Verify that a request pushing occupancy past the cap is
        // rejected and the elevator is left untouched

        // Arrange
        let (mut fsm, _admit_tx, _state_rx, _terminate_tx) = setup_fsm();
        fsm.test_set_occupancy(8);

        // Act
        let outcome = fsm.test_admit(Request::new(3, 3));

        // Assert
        assert_eq!(
            outcome,
            Err(AdmissionError::CapacityExceeded {
                requested: 3,
                capacity: 10,
            })
        );
        assert_eq!(fsm.test_queue_len(), 0);
        assert_eq!(fsm.test_snapshot().occupancy, 8);
    }

    #[test]
    fn test_fsm_admit_counts_queued_passengers() {
        // Purpose: Verify that admission accounts for passengers already
        // queued, so the occupancy cap holds once the queue drains

        // Arrange
        let (mut fsm, _admit_tx, _state_rx, _terminate_tx) = setup_fsm();

        // Act
        let first = fsm.test_admit(Request::new(5, 6));
        let second = fsm.test_admit(Request::new(7, 6));

        // Assert
        assert_eq!(first, Ok(()));
        assert_eq!(
            second,
            Err(AdmissionError::CapacityExceeded {
                requested: 6,
                capacity: 10,
            })
        );
        assert_eq!(fsm.test_queue_len(), 1);
    }

    #[test]
    fn test_fsm_admit_invalid_floor() {
        // Purpose: Verify that an out of range floor is rejected without
        // mutating the elevator

        // Arrange
        let (mut fsm, _admit_tx, _state_rx, _terminate_tx) = setup_fsm();
        let before = fsm.test_snapshot();

        // Act
        let too_high = fsm.test_admit(Request::new(11, 2));
        let too_low = fsm.test_admit(Request::new(0, 2));

        // Assert
        assert_eq!(too_high, Err(AdmissionError::InvalidFloor { floor: 11 }));
        assert_eq!(too_low, Err(AdmissionError::InvalidFloor { floor: 0 }));
        assert_eq!(fsm.test_queue_len(), 0);
        assert_eq!(fsm.test_snapshot(), before);
    }

    #[test]
    fn test_fsm_drain_empty_queue_is_noop() {
        // Purpose: Verify that draining an empty queue changes nothing

        // Arrange
        let (mut fsm, _admit_tx, _state_rx, _terminate_tx) = setup_fsm();
        let before = fsm.test_snapshot();

        // Act
        fsm.test_drain();

        // Assert
        assert_eq!(fsm.test_snapshot(), before);
        assert_eq!(fsm.test_queue_len(), 0);
    }

    #[test]
    fn test_fsm_drain_in_submission_order() {
        // Purpose: Verify that queued requests are served in submission order
        // and passengers accumulate across them

        // Arrange
        let (mut fsm, _admit_tx, _state_rx, _terminate_tx) = setup_fsm();
        fsm.test_admit(Request::new(3, 2)).unwrap();
        fsm.test_admit(Request::new(5, 1)).unwrap();

        // Act
        fsm.test_start_next_travel();
        fsm.test_complete_travel();
        let after_first = fsm.test_snapshot();
        fsm.test_drain();
        let after_second = fsm.test_snapshot();

        // Assert
        assert_eq!(after_first.floor, 3);
        assert_eq!(after_first.occupancy, 2);
        assert_eq!(after_second.floor, 5);
        assert_eq!(after_second.occupancy, 3);
        assert_eq!(after_second.status, Stationary);
        assert_eq!(fsm.test_queue_len(), 0);
    }

    #[test]
    fn test_fsm_direction_follows_travel() {
        // Purpose: Verify that direction is derived from the sign of the
        // travel and cleared on arrival

        // Arrange
        let (mut fsm, _admit_tx, _state_rx, _terminate_tx) = setup_fsm();
        fsm.test_admit(Request::new(3, 1)).unwrap();

        // Act & Assert
        fsm.test_start_next_travel();
        assert_eq!(fsm.test_snapshot().direction, Up);
        assert_eq!(fsm.test_snapshot().status, Moving);

        fsm.test_complete_travel();
        assert_eq!(fsm.test_snapshot().direction, None);
        assert_eq!(fsm.test_snapshot().status, Stationary);

        fsm.test_admit(Request::new(1, 1)).unwrap();
        fsm.test_start_next_travel();
        assert_eq!(fsm.test_snapshot().direction, Down);
    }

    #[test]
    fn test_fsm_travel_updates_state() {
        // Purpose: Verify that the running FSM serves an admitted request,
        // publishing a moving snapshot and then the arrival

        // Arrange
        let (fsm, admit_tx, state_rx, terminate_tx) = setup_fsm();
        let fsm_thread = spawn(move || fsm.run());

        // Act
        let outcome = admit(&admit_tx, Request::new(5, 2));

        // Assert
        assert_eq!(outcome, Ok(()));

        let departing = next_snapshot(&state_rx);
        assert_eq!(departing.status, Moving);
        assert_eq!(departing.direction, Up);
        assert_eq!(departing.floor, 1);
        assert_eq!(departing.occupancy, 0);

        let arrived = next_snapshot(&state_rx);
        assert_eq!(arrived.status, Stationary);
        assert_eq!(arrived.direction, None);
        assert_eq!(arrived.floor, 5);
        assert_eq!(arrived.occupancy, 2);

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();
    }

    #[test]
    fn test_fsm_idle_without_requests() {
        // Purpose: Verify that an idle FSM publishes no state changes

        // Arrange
        let (fsm, _admit_tx, state_rx, terminate_tx) = setup_fsm();
        let fsm_thread = spawn(move || fsm.run());

        // Act & Assert
        match state_rx.recv_timeout(Duration::from_millis(200)) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(snapshot) => panic!("Unexpected state change while idle: {:?}", snapshot),
            Err(e) => panic!("Error receiving from state_rx: {:?}", e),
        }

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();
    }
}
