/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{error, info};
use std::error::Error;
use std::fmt;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::building::Building;
use crate::shared::{AdmissionError, AdmitRequest, ElevatorSnapshot, Request};

const ADMIT_REPLY_TIMEOUT: Duration = Duration::from_secs(1);

/***************************************/
/*               Errors                */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchError {
    InvalidFloor { floor: u8, n_floors: u8 },
    InvalidPassengerCount,
    NoElevatorAvailable,
    CapacityExceeded { requested: u8, capacity: u8 },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DispatchError::InvalidFloor { floor, n_floors } => {
                write!(
                    f,
                    "Invalid floor selection: {}. This building has floors 1 to {}.",
                    floor, n_floors
                )
            }
            DispatchError::InvalidPassengerCount => {
                write!(f, "A request needs at least one passenger.")
            }
            DispatchError::NoElevatorAvailable => {
                write!(f, "No available elevators to handle the request.")
            }
            DispatchError::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "You requested {} passengers. The elevator can hold a maximum of {} passengers. Please select again.",
                    requested, capacity
                )
            }
        }
    }
}

impl Error for DispatchError {}

/***************************************/
/*             Public API              */
/***************************************/
pub struct Dispatcher {
    // Private fields
    building: Building,
    states: Vec<ElevatorSnapshot>,
}

impl Dispatcher {
    pub fn new(building: Building) -> Dispatcher {
        let states = building
            .handles()
            .iter()
            .map(|handle| ElevatorSnapshot::new(handle.id))
            .collect();

        Dispatcher { building, states }
    }

    pub fn n_floors(&self) -> u8 {
        self.building.n_floors
    }

    /// Routes a request to the nearest elevator. Validation happens before
    /// any elevator is touched; a capacity rejection is surfaced to the
    /// caller and the request is dropped, not retried elsewhere.
    pub fn submit(&mut self, floor: u8, passenger_count: u8) -> Result<u8, DispatchError> {
        if floor < 1 || floor > self.building.n_floors {
            return Err(DispatchError::InvalidFloor {
                floor,
                n_floors: self.building.n_floors,
            });
        }
        if passenger_count < 1 {
            return Err(DispatchError::InvalidPassengerCount);
        }

        self.refresh_states();
        let id = match self.select_nearest(floor) {
            Some(id) => id,
            None => return Err(DispatchError::NoElevatorAvailable),
        };

        let handle = match self.building.handles().iter().find(|h| h.id == id) {
            Some(handle) => handle,
            None => return Err(DispatchError::NoElevatorAvailable),
        };

        let (reply_tx, reply_rx) = cbc::bounded::<Result<(), AdmissionError>>(1);
        let admit = AdmitRequest {
            request: Request::new(floor, passenger_count),
            reply_tx,
        };
        if handle.admit_tx.send(admit).is_err() {
            error!("Elevator {} is no longer accepting requests", id);
            return Err(DispatchError::NoElevatorAvailable);
        }

        match reply_rx.recv_timeout(ADMIT_REPLY_TIMEOUT) {
            Ok(Ok(())) => {
                info!(
                    "Request for floor {} ({} passengers) dispatched to elevator {}",
                    floor, passenger_count, id
                );
                Ok(id)
            }
            Ok(Err(AdmissionError::CapacityExceeded {
                requested,
                capacity,
            })) => Err(DispatchError::CapacityExceeded {
                requested,
                capacity,
            }),
            Ok(Err(AdmissionError::InvalidFloor { floor })) => Err(DispatchError::InvalidFloor {
                floor,
                n_floors: self.building.n_floors,
            }),
            Err(e) => {
                error!("No admission reply from elevator {}: {}", id, e);
                Err(DispatchError::NoElevatorAvailable)
            }
        }
    }

    /// Ordered list of every elevator's latest snapshot, for display only.
    pub fn status_report(&mut self) -> Vec<ElevatorSnapshot> {
        self.refresh_states();
        self.states.clone()
    }

    pub fn shutdown(self) {
        self.building.shutdown();
    }

    // Minimum |floor distance| over the id-ordered registry; a tie keeps the
    // first elevator encountered.
    fn select_nearest(&self, floor: u8) -> Option<u8> {
        let mut nearest: Option<(u8, u8)> = None;
        for state in &self.states {
            let distance = state.floor.abs_diff(floor);
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((state.id, distance)),
            }
        }
        nearest.map(|(id, _)| id)
    }

    fn refresh_states(&mut self) {
        while let Some(snapshot) = self.building.poll_state() {
            if let Some(state) = self.states.iter_mut().find(|s| s.id == snapshot.id) {
                *state = snapshot;
            }
        }
    }
}

/***************************************/
/*            Test helpers             */
/***************************************/
#[cfg(test)]
impl Dispatcher {
    pub fn test_select_nearest(&self, floor: u8) -> Option<u8> {
        self.select_nearest(floor)
    }

    pub fn test_set_state(&mut self, snapshot: ElevatorSnapshot) {
        if let Some(state) = self.states.iter_mut().find(|s| s.id == snapshot.id) {
            *state = snapshot;
        }
    }
}
