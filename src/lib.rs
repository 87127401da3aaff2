//! Dispatch and movement simulation for a fleet of passenger elevators.
//!
//! A [`Building`] queues pickup requests and periodically matches them to the most
//! suitable [`PassengerElevator`]. Every elevator runs its own loop on its own thread,
//! moving floor by floor, boarding and dropping off parties until its work is drained.

pub mod config;
pub mod coordinator;
pub mod elevator;
pub mod error;
pub mod shared;
pub mod simulation;

pub use coordinator::Building;
pub use elevator::{Clock, ElevatorFSM, InstantClock, PassengerElevator, SystemClock};
pub use shared::{Direction, DropOffRequest, ElevatorSnapshot, Floor, PickupRequest, Status, CAPACITY};
