use crate::config::ElevatorConfig;
use crate::shared::{AdmissionError, AdmitRequest, Direction, ElevatorSnapshot, Request, Status};
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/**
 * Serves one elevator's request queue.
 *
 * The `ElevatorFSM` owns the elevator's live state (floor, direction, status,
 * occupancy) and its pending queue of requests. It is the only writer of that
 * state: admissions arrive over a channel and are answered immediately, and
 * travel is simulated as a deadline checked from the main loop, so the worker
 * stays responsive while the car is "moving". It communicates with the
 * dispatcher thread.
 *
 * # Fields
 * - `admit_rx`:        Receives admission requests, each carrying its reply channel.
 * - `state_tx`:        Broadcasts a snapshot whenever floor, status or occupancy change.
 * - `terminate_rx`:    Receives the shutdown signal.
 * - `queue`:           Pending requests in submission order.
 * - `travel`:          The request currently being served, with its arrival deadline.
 * - `n_floors`:        The total number of floors serviced by the elevator.
 * - `max_passengers`:  Occupancy cap enforced at admission time.
 *
 */

enum Event {
    RequestReceived(AdmitRequest),
    Tick,
}

struct ActiveTravel {
    request: Request,
    arrival: Instant,
}

pub struct ElevatorFSM {
    // Dispatcher channels
    admit_rx: cbc::Receiver<AdmitRequest>,
    state_tx: cbc::Sender<ElevatorSnapshot>,
    terminate_rx: cbc::Receiver<()>,

    // Private fields
    id: u8,
    floor: u8,
    direction: Direction,
    status: Status,
    occupancy: u8,
    queue: VecDeque<Request>,
    travel: Option<ActiveTravel>,
    n_floors: u8,
    max_passengers: u8,
    travel_time_per_floor: u64,
    tick_interval: u64,
}

impl ElevatorFSM {
    pub fn new(
        id: u8,
        config: &ElevatorConfig,
        n_floors: u8,
        admit_rx: cbc::Receiver<AdmitRequest>,
        state_tx: cbc::Sender<ElevatorSnapshot>,
        terminate_rx: cbc::Receiver<()>,
    ) -> ElevatorFSM {
        ElevatorFSM {
            admit_rx,
            state_tx,
            terminate_rx,
            id,
            floor: 1,
            direction: Direction::None,
            status: Status::Stationary,
            occupancy: 0,
            queue: VecDeque::new(),
            travel: None,
            n_floors,
            max_passengers: config.max_passengers,
            travel_time_per_floor: config.travel_time_per_floor,
            tick_interval: config.tick_interval,
        }
    }

    pub fn run(mut self) {
        // Main loop
        loop {
            cbc::select! {
                recv(self.admit_rx) -> msg => {
                    match msg {
                        Ok(admit) => self.handle_event(Event::RequestReceived(admit)),
                        Err(_) => {
                            debug!("Elevator {}: admit channel closed, stopping", self.id);
                            return;
                        }
                    }
                }
                recv(self.terminate_rx) -> _ => {
                    debug!("Elevator {} terminated", self.id);
                    return;
                }
                default(Duration::from_millis(self.tick_interval)) => {
                    self.handle_event(Event::Tick);
                }
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::RequestReceived(admit) => {
                let outcome = self.admit(admit.request);
                let admitted = outcome.is_ok();
                if admit.reply_tx.send(outcome).is_err() {
                    warn!("Elevator {}: admission reply dropped by caller", self.id);
                }
                if admitted && self.travel.is_none() {
                    self.start_next_travel();
                }
            }
            Event::Tick => {
                let arrived = self
                    .travel
                    .as_ref()
                    .map_or(false, |travel| Instant::now() >= travel.arrival);
                if arrived {
                    self.complete_travel();
                    self.start_next_travel();
                }
            }
        }
    }

    // Appends to the queue tail on success; on rejection the elevator is untouched.
    fn admit(&mut self, request: Request) -> Result<(), AdmissionError> {
        if request.destination_floor < 1 || request.destination_floor > self.n_floors {
            return Err(AdmissionError::InvalidFloor {
                floor: request.destination_floor,
            });
        }

        // The committed load covers passengers already aboard, the request in
        // flight and every queued request, so the occupancy cap holds after
        // each future arrival.
        if self.committed_load() + request.passenger_count as u16 > self.max_passengers as u16 {
            warn!(
                "Elevator {}: rejecting {} passengers, {} of {} committed",
                self.id,
                request.passenger_count,
                self.committed_load(),
                self.max_passengers
            );
            return Err(AdmissionError::CapacityExceeded {
                requested: request.passenger_count,
                capacity: self.max_passengers,
            });
        }

        self.queue.push_back(request);
        Ok(())
    }

    fn committed_load(&self) -> u16 {
        let queued: u16 = self
            .queue
            .iter()
            .map(|request| request.passenger_count as u16)
            .sum();
        let in_flight = self
            .travel
            .as_ref()
            .map_or(0, |travel| travel.request.passenger_count as u16);
        self.occupancy as u16 + in_flight + queued
    }

    fn start_next_travel(&mut self) {
        let request = match self.queue.pop_front() {
            Some(request) => request,
            None => return,
        };

        let distance = self.floor.abs_diff(request.destination_floor);
        self.direction = if request.destination_floor > self.floor {
            Direction::Up
        } else if request.destination_floor < self.floor {
            Direction::Down
        } else {
            Direction::None
        };
        self.status = Status::Moving;
        self.travel = Some(ActiveTravel {
            request,
            arrival: Instant::now()
                + Duration::from_millis(self.travel_time_per_floor * distance as u64),
        });

        info!(
            "Elevator {} departing floor {} for floor {}",
            self.id, self.floor, request.destination_floor
        );
        self.send_snapshot();
    }

    fn complete_travel(&mut self) {
        let travel = match self.travel.take() {
            Some(travel) => travel,
            None => return,
        };

        self.floor = travel.request.destination_floor;
        self.occupancy += travel.request.passenger_count;
        self.status = Status::Stationary;
        self.direction = Direction::None;

        info!(
            "Elevator {} arrived at floor {}, {} passengers aboard",
            self.id, self.floor, self.occupancy
        );
        self.send_snapshot();
    }

    fn snapshot(&self) -> ElevatorSnapshot {
        ElevatorSnapshot {
            id: self.id,
            floor: self.floor,
            direction: self.direction,
            status: self.status,
            occupancy: self.occupancy,
        }
    }

    fn send_snapshot(&self) {
        if self.state_tx.send(self.snapshot()).is_err() {
            debug!("Elevator {}: state channel closed", self.id);
        }
    }
}

/***************************************/
/*            Test helpers             */
/***************************************/
#[cfg(test)]
impl ElevatorFSM {
    pub fn test_snapshot(&self) -> ElevatorSnapshot {
        self.snapshot()
    }

    pub fn test_admit(&mut self, request: Request) -> Result<(), AdmissionError> {
        self.admit(request)
    }

    pub fn test_queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn test_set_occupancy(&mut self, occupancy: u8) {
        self.occupancy = occupancy;
    }

    pub fn test_start_next_travel(&mut self) {
        self.start_next_travel();
    }

    pub fn test_complete_travel(&mut self) {
        self.complete_travel();
    }

    // Serves the whole queue without waiting for travel deadlines.
    pub fn test_drain(&mut self) {
        loop {
            if self.travel.is_none() {
                if self.queue.is_empty() {
                    return;
                }
                self.start_next_travel();
            }
            self.complete_travel();
        }
    }
}
