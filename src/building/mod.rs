use crate::config::Config;
use crate::elevator::ElevatorFSM;
use crate::shared::{AdmitRequest, ElevatorSnapshot};
use crossbeam_channel as cbc;
use log::info;
use std::error::Error;
use std::fmt;
use std::thread::{Builder, JoinHandle};

/**
 * Owns the fixed collection of elevators.
 *
 * `Building::new` spawns one worker thread per elevator and keeps the sending
 * half of each worker's channels. The building itself never mutates elevator
 * state; it hands out admission handles and collects the snapshots the
 * workers publish.
 */

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildingError {
    NoFloors,
    NoElevators,
}

impl fmt::Display for BuildingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BuildingError::NoFloors => write!(f, "A building needs at least one floor."),
            BuildingError::NoElevators => write!(f, "A building needs at least one elevator."),
        }
    }
}

impl Error for BuildingError {}

pub struct ElevatorHandle {
    pub id: u8,
    pub admit_tx: cbc::Sender<AdmitRequest>,
    terminate_tx: cbc::Sender<()>,
}

pub struct Building {
    pub n_floors: u8,
    handles: Vec<ElevatorHandle>,
    state_rx: cbc::Receiver<ElevatorSnapshot>,
    threads: Vec<JoinHandle<()>>,
}

impl Building {
    pub fn new(config: &Config) -> Result<Building, BuildingError> {
        if config.building.n_floors < 1 {
            return Err(BuildingError::NoFloors);
        }
        if config.building.n_elevators < 1 {
            return Err(BuildingError::NoElevators);
        }

        let (state_tx, state_rx) = cbc::unbounded::<ElevatorSnapshot>();
        let mut handles = Vec::new();
        let mut threads = Vec::new();

        for id in 1..=config.building.n_elevators {
            let (admit_tx, admit_rx) = cbc::unbounded::<AdmitRequest>();
            let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();

            let fsm = ElevatorFSM::new(
                id,
                &config.elevator,
                config.building.n_floors,
                admit_rx,
                state_tx.clone(),
                terminate_rx,
            );

            let elevator_thread = Builder::new().name(format!("elevator_{}", id));
            threads.push(elevator_thread.spawn(move || fsm.run()).unwrap());
            handles.push(ElevatorHandle {
                id,
                admit_tx,
                terminate_tx,
            });
        }

        info!(
            "Building ready: {} floors, {} elevators",
            config.building.n_floors, config.building.n_elevators
        );

        Ok(Building {
            n_floors: config.building.n_floors,
            handles,
            state_rx,
            threads,
        })
    }

    pub fn handles(&self) -> &[ElevatorHandle] {
        &self.handles
    }

    /// Next pending snapshot from any worker, if one is queued.
    pub fn poll_state(&self) -> Option<ElevatorSnapshot> {
        self.state_rx.try_recv().ok()
    }

    pub fn shutdown(self) {
        for handle in &self.handles {
            let _ = handle.terminate_tx.send(());
        }
        for thread in self.threads {
            let _ = thread.join();
        }
        info!("All elevators stopped");
    }
}
