/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::warn;
use serde::Deserialize;
use std::fs;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub building: BuildingConfig,
    pub elevator: ElevatorConfig,
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct BuildingConfig {
    pub n_floors: u8,
    pub n_elevators: u8,
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct ElevatorConfig {
    pub max_passengers: u8,
    pub travel_time_per_floor: u64,
    pub tick_interval: u64,
}

impl Default for BuildingConfig {
    fn default() -> BuildingConfig {
        BuildingConfig {
            n_floors: 10,
            n_elevators: 4,
        }
    }
}

impl Default for ElevatorConfig {
    fn default() -> ElevatorConfig {
        ElevatorConfig {
            max_passengers: 10,
            travel_time_per_floor: 1000,
            tick_interval: 50,
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &str) -> Result<Config, toml::de::Error> {
    match fs::read_to_string(path) {
        Ok(config_str) => toml::from_str(&config_str),
        Err(_) => {
            warn!("No configuration file at {}, using default settings", path);
            Ok(Config::default())
        }
    }
}
