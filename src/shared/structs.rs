/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use std::error::Error;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    Up,
    Down,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    Moving,
    Stationary,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::None => "None",
        };
        f.pad(name)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Status::Moving => "Moving",
            Status::Stationary => "Stationary",
        };
        f.pad(name)
    }
}

/// A passenger call: where to and how many are waiting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Request {
    pub destination_floor: u8,
    pub passenger_count: u8,
}

impl Request {
    pub fn new(destination_floor: u8, passenger_count: u8) -> Request {
        Request {
            destination_floor,
            passenger_count,
        }
    }
}

/// Read-only view of one elevator, published by its worker thread.
/// Floor and status always change together within one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevatorSnapshot {
    pub id: u8,
    pub floor: u8,
    pub direction: Direction,
    pub status: Status,
    pub occupancy: u8,
}

impl ElevatorSnapshot {
    pub fn new(id: u8) -> ElevatorSnapshot {
        ElevatorSnapshot {
            id,
            floor: 1,
            direction: Direction::None,
            status: Status::Stationary,
            occupancy: 0,
        }
    }
}

/// Admission message sent to an elevator worker. The worker answers on
/// `reply_tx` before it does anything else, travel in progress or not.
pub struct AdmitRequest {
    pub request: Request,
    pub reply_tx: cbc::Sender<Result<(), AdmissionError>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdmissionError {
    InvalidFloor { floor: u8 },
    CapacityExceeded { requested: u8, capacity: u8 },
}

impl fmt::Display for AdmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AdmissionError::InvalidFloor { floor } => {
                write!(f, "Invalid floor selection: {}.", floor)
            }
            AdmissionError::CapacityExceeded {
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

impl Error for AdmissionError {}
