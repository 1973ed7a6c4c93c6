/* 3rd party libraries */
use clap::{Arg, Command};
use log::info;

/* Custom libraries */
use crate::building::Building;
use crate::dispatcher::Dispatcher;

/* Modules */
mod building;
mod config;
mod dispatcher;
mod elevator;
mod shared;
mod ui;

/* Main */
fn main() {
    env_logger::init();

    let matches = Command::new("elevator-dispatch")
        .about("Multi-elevator dispatch simulator")
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("floors")
                .long("floors")
                .takes_value(true)
                .help("Number of floors, overrides the configuration file"),
        )
        .arg(
            Arg::new("elevators")
                .long("elevators")
                .takes_value(true)
                .help("Number of elevators, overrides the configuration file"),
        )
        .get_matches();

    // Load the configuration
    let mut config = unwrap_or_exit!(config::load_config(matches.value_of("config").unwrap()));
    if let Some(floors) = matches.value_of("floors") {
        config.building.n_floors = unwrap_or_exit!(floors.parse());
    }
    if let Some(elevators) = matches.value_of("elevators") {
        config.building.n_elevators = unwrap_or_exit!(elevators.parse());
    }

    // Start the elevator workers
    let building = unwrap_or_exit!(Building::new(&config));
    let mut dispatcher = Dispatcher::new(building);

    // Run the menu until the user exits
    ui::run(&mut dispatcher);

    info!("Shutting down");
    dispatcher.shutdown();
}
