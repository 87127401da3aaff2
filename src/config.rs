/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::ConfigError;
use crate::shared::Floor;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub building: BuildingConfig,
    #[serde(default)]
    pub elevator: TimingConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BuildingConfig {
    pub elevators: usize,
    pub floors: Vec<Floor>,
}

/// Hold durations of the elevator run loop, in milliseconds.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub travel_time: u64,
    pub loading_time: u64,
    pub unloading_time: u64,
    pub idle_time: u64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DispatcherConfig {
    pub assign_interval: u64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub random_requests: bool,
    pub request_interval: u64,
    pub status_interval: u64,
}

impl TimingConfig {
    /// Same value for every hold, mostly useful in tests.
    pub fn uniform(millis: u64) -> TimingConfig {
        TimingConfig {
            travel_time: millis,
            loading_time: millis,
            unloading_time: millis,
            idle_time: millis,
        }
    }

    pub fn travel(&self) -> Duration {
        Duration::from_millis(self.travel_time)
    }

    pub fn loading(&self) -> Duration {
        Duration::from_millis(self.loading_time)
    }

    pub fn unloading(&self) -> Duration {
        Duration::from_millis(self.unloading_time)
    }

    pub fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_time)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            travel_time: 2000,
            loading_time: 1000,
            unloading_time: 5000,
            idle_time: 500,
        }
    }
}

impl DispatcherConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.assign_interval)
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            assign_interval: 2000,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            random_requests: true,
            request_interval: 10000,
            status_interval: 1000,
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&config_str).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_config(config_str: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(config_str)
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [building]
            elevators = 2
            floors = [
                { number = -1, name = "Basement" },
                { number = 0 },
                { number = 1 },
            ]

            [elevator]
            travel_time = 10
            loading_time = 20
            unloading_time = 30
            idle_time = 5

            [dispatcher]
            assign_interval = 15

            [simulation]
            random_requests = false
            request_interval = 100
            status_interval = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.building.elevators, 2);
        assert_eq!(config.building.floors[0], Floor::named(-1, "Basement"));
        assert_eq!(config.building.floors[1], Floor::new(0));
        assert_eq!(config.elevator.loading(), Duration::from_millis(20));
        assert_eq!(config.dispatcher.interval(), Duration::from_millis(15));
        assert!(!config.simulation.random_requests);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config(
            r#"
            [building]
            elevators = 1
            floors = [{ number = 0 }, { number = 1 }, { number = 2 }]

            [elevator]
            travel_time = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.elevator.travel_time, 1);
        assert_eq!(config.elevator.unloading_time, 5000);
        assert_eq!(config.dispatcher, DispatcherConfig::default());
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = load_config(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
