/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::RequestError;

/***************************************/
/*             Constants               */
/***************************************/
/// Maximum number of people a passenger elevator carries at once.
pub const CAPACITY: u32 = 10;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Floor {
    pub number: i32,
    #[serde(default)]
    pub name: Option<String>,
}

impl Floor {
    pub fn new(number: i32) -> Floor {
        Floor { number, name: None }
    }

    pub fn named(number: i32, name: &str) -> Floor {
        Floor {
            number,
            name: Some(name.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Idle,
    Up,
    Down,
}

impl Direction {
    /// Direction of travel from `from` to `to`. Equal floors count as `Down`.
    pub fn between(from: i32, to: i32) -> Direction {
        if to > from {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Floor delta for one step of travel.
    pub fn step(&self) -> i32 {
        match *self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Idle => 0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match *self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Idle => " ",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "moving")]
    Moving,
    #[serde(rename = "loading")]
    LoadingPassengers,
    #[serde(rename = "unloading")]
    UnloadingPassengers,
}

/**
 * A party waiting on `origin` that wants to go to `destination`.
 *
 * Requests are immutable once built. `PickupRequest::new` rejects empty parties and
 * requests whose origin equals the destination, since the desired direction would be
 * undefined. The `highlight` flag is display metadata and is only carried along.
 */
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PickupRequest {
    id: u64,
    origin: i32,
    destination: i32,
    party_size: u32,
    highlight: bool,
}

impl PickupRequest {
    pub fn new(
        origin: i32,
        destination: i32,
        party_size: u32,
        highlight: bool,
    ) -> Result<PickupRequest, RequestError> {
        if party_size == 0 {
            return Err(RequestError::EmptyParty);
        }
        if origin == destination {
            return Err(RequestError::SameFloor { floor: origin });
        }

        Ok(PickupRequest {
            id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            origin,
            destination,
            party_size,
            highlight,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn origin(&self) -> i32 {
        self.origin
    }

    pub fn destination(&self) -> i32 {
        self.destination
    }

    pub fn party_size(&self) -> u32 {
        self.party_size
    }

    pub fn highlight(&self) -> bool {
        self.highlight
    }

    pub fn desired_direction(&self) -> Direction {
        Direction::between(self.origin, self.destination)
    }
}

/// Obligation to stop at `destination` and let a boarded party off.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DropOffRequest {
    pub request_id: u64,
    pub destination: i32,
    pub party_size: u32,
    pub highlight: bool,
}

impl From<&PickupRequest> for DropOffRequest {
    fn from(pickup: &PickupRequest) -> Self {
        DropOffRequest {
            request_id: pickup.id,
            destination: pickup.destination,
            party_size: pickup.party_size,
            highlight: pickup.highlight,
        }
    }
}

/// Read-only view of one elevator, polled by display collaborators.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ElevatorSnapshot {
    pub id: usize,
    pub floor: i32,
    pub direction: Direction,
    pub status: Status,
    pub occupancy: u32,
    pub highlight: bool,
    #[serde(rename = "pendingPickups")]
    pub pending_pickups: usize,
    #[serde(rename = "activeDropOffs")]
    pub active_drop_offs: usize,
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_empty_party() {
        assert_eq!(PickupRequest::new(0, 3, 0, false), Err(RequestError::EmptyParty));
    }

    #[test]
    fn test_request_rejects_same_floor() {
        assert_eq!(
            PickupRequest::new(2, 2, 1, false),
            Err(RequestError::SameFloor { floor: 2 })
        );
    }

    #[test]
    fn test_request_desired_direction() {
        let up = PickupRequest::new(-1, 4, 1, false).unwrap();
        let down = PickupRequest::new(4, -2, 1, false).unwrap();

        assert_eq!(up.desired_direction(), Direction::Up);
        assert_eq!(down.desired_direction(), Direction::Down);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let first = PickupRequest::new(0, 1, 1, false).unwrap();
        let second = PickupRequest::new(0, 1, 1, false).unwrap();

        assert_ne!(first.id(), second.id());
        assert_ne!(first, second);
    }

    #[test]
    fn test_drop_off_inherits_pickup() {
        let pickup = PickupRequest::new(1, 4, 3, true).unwrap();
        let drop_off = DropOffRequest::from(&pickup);

        assert_eq!(drop_off.request_id, pickup.id());
        assert_eq!(drop_off.destination, 4);
        assert_eq!(drop_off.party_size, 3);
        assert!(drop_off.highlight);
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&Status::LoadingPassengers).unwrap(), "\"loading\"");
    }
}
