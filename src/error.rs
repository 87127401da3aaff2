/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::path::PathBuf;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::PickupRequest;

/***************************************/
/*            Error types              */
/***************************************/

/// Errors that make a building unusable. Raised once, at construction.
#[derive(Debug, Error, PartialEq)]
pub enum BuildingError {
    #[error("building must have at least 3 floors, got {count}")]
    TooFewFloors { count: usize },

    #[error("floor {number} is defined more than once")]
    DuplicateFloor { number: i32 },

    #[error("building must have at least one elevator")]
    NoElevators,
}

/// Rejections of malformed pickup requests at the boundary.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("party size must be at least 1")]
    EmptyParty,

    #[error("origin and destination are both floor {floor}")]
    SameFloor { floor: i32 },

    #[error("floor {floor} does not exist in this building")]
    UnknownFloor { floor: i32 },
}

/// Failure to hand a request over to an elevator. The request is returned to the caller.
#[derive(Debug, Error)]
pub enum AssignError {
    #[error("party of {} would exceed capacity ({occupancy}/{capacity} on board)", .request.party_size())]
    CapacityExceeded {
        request: PickupRequest,
        occupancy: u32,
        capacity: u32,
    },
}

impl AssignError {
    pub fn into_request(self) -> PickupRequest {
        match self {
            AssignError::CapacityExceeded { request, .. } => request,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse configuration file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Returned from a suspension point once shutdown has been requested.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("terminated")]
pub struct Terminated;

/// Problems with a manually typed request line.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("expected '<origin> <destination> <people>' or 'q', got {count} fields")]
    WrongArity { count: usize },

    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    Request(#[from] RequestError),
}
