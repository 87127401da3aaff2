/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{info, warn};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::AssignError;
use crate::shared::{Direction, DropOffRequest, ElevatorSnapshot, PickupRequest, Status, CAPACITY};

/**
 * Shared handle to one passenger elevator.
 *
 * The handle is cheap to clone. The dispatcher keeps one to evaluate and assign pickups,
 * and the elevator's run loop (`ElevatorFSM`) keeps another to drive the state forward.
 * All state sits behind a single mutex which is never held across a hold.
 *
 * # Fields
 * - `id`:      Position of the elevator in its building's fleet.
 * - `state`:   Floor, direction, status, occupancy and the two work queues.
 */
#[derive(Debug, Clone)]
pub struct PassengerElevator {
    id: usize,
    state: Arc<Mutex<ElevatorState>>,
}

#[derive(Debug)]
pub(super) struct ElevatorState {
    pub floor: i32,
    pub direction: Direction,
    pub status: Status,
    pub occupancy: u32,
    pub highlight: bool,
    // FIFO in arrival order
    pub pending_pickups: VecDeque<PickupRequest>,
    // Unordered, the nearest one is picked every cycle
    pub active_drop_offs: Vec<DropOffRequest>,
}

impl PassengerElevator {
    pub fn new(floor: i32) -> PassengerElevator {
        PassengerElevator {
            id: 0,
            state: Arc::new(Mutex::new(ElevatorState {
                floor,
                direction: Direction::Idle,
                status: Status::Idle,
                occupancy: 0,
                highlight: false,
                pending_pickups: VecDeque::new(),
                active_drop_offs: Vec::new(),
            })),
        }
    }

    /// Starts the elevator already travelling in `direction`.
    pub fn with_direction(self, direction: Direction) -> PassengerElevator {
        {
            let mut state = self.lock();
            state.direction = direction;
            if direction != Direction::Idle {
                state.status = Status::Moving;
            }
        }
        self
    }

    /// Starts the elevator with people already on board, capped at `CAPACITY`.
    pub fn with_occupancy(self, occupancy: u32) -> PassengerElevator {
        self.lock().occupancy = occupancy.min(CAPACITY);
        self
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Whether this elevator would take `request` right now. Has no side effects.
    pub fn can_pickup(&self, request: &PickupRequest) -> bool {
        self.lock().can_pickup(request)
    }

    /**
     * Queues `request` behind the pickups already pending.
     *
     * Direction and status are left alone, the run loop picks them up on its next cycle.
     * A request that would overflow the elevator is handed back inside the error.
     */
    pub fn assign_pickup(&self, request: PickupRequest) -> Result<(), AssignError> {
        let mut state = self.lock();

        if !state.has_room_for(&request) {
            warn!(
                "Elevator {} rejected request {}: {} + {} exceeds capacity",
                self.id,
                request.id(),
                state.occupancy,
                request.party_size()
            );
            return Err(AssignError::CapacityExceeded {
                request,
                occupancy: state.occupancy,
                capacity: CAPACITY,
            });
        }

        info!(
            "Elevator {} assigned request {} ({} people, {} -> {})",
            self.id,
            request.id(),
            request.party_size(),
            request.origin(),
            request.destination()
        );
        state.pending_pickups.push_back(request);
        Ok(())
    }

    /// Distance in floors to the request's origin, or `None` if the request can't be taken.
    /// Lower is better.
    pub fn suitability_score(&self, request: &PickupRequest) -> Option<u32> {
        let state = self.lock();
        if !state.can_pickup(request) {
            return None;
        }
        Some(state.floor.abs_diff(request.origin()))
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        let state = self.lock();
        ElevatorSnapshot {
            id: self.id,
            floor: state.floor,
            direction: state.direction,
            status: state.status,
            occupancy: state.occupancy,
            highlight: state.highlight,
            pending_pickups: state.pending_pickups.len(),
            active_drop_offs: state.active_drop_offs.len(),
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, ElevatorState> {
        // Every critical section leaves the state consistent, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ElevatorState {
    /// Only the people on board count. Queued parties board one at a time, each after
    /// the previous one has been dropped off.
    pub fn has_room_for(&self, request: &PickupRequest) -> bool {
        self.occupancy + request.party_size() <= CAPACITY
    }

    pub fn can_pickup(&self, request: &PickupRequest) -> bool {
        if !self.has_room_for(request) {
            return false;
        }

        match self.direction {
            Direction::Idle => true,
            Direction::Up => request.origin() > self.floor,
            Direction::Down => request.origin() < self.floor,
        }
    }

    /// Flips to idle when there is no work left. Returns whether it did.
    pub fn go_idle_if_drained(&mut self) -> bool {
        if !self.pending_pickups.is_empty() || !self.active_drop_offs.is_empty() {
            return false;
        }
        self.status = Status::Idle;
        self.direction = Direction::Idle;
        self.highlight = false;
        true
    }

    /// Greedy choice: the drop-off closest to the current floor, earliest on ties.
    pub fn nearest_drop_off(&self) -> Option<DropOffRequest> {
        self.active_drop_offs
            .iter()
            .min_by_key(|drop_off| self.floor.abs_diff(drop_off.destination))
            .cloned()
    }
}
