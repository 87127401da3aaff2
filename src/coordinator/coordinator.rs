/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, info, warn};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{Builder, JoinHandle};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{DispatcherConfig, TimingConfig};
use crate::elevator::{Clock, ElevatorFSM, PassengerElevator, SystemClock};
use crate::error::{BuildingError, RequestError};
use crate::shared::{Direction, ElevatorSnapshot, Floor, PickupRequest};

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Owns the floor plan, the fleet and the dispatcher's backlog.
 *
 * Requests are only queued by `request_elevator`. They are handed to elevators by
 * `assign_pending_pickups`, which is meant to be called repeatedly (see
 * `start_dispatcher`) so requests nobody can take yet are retried later.
 *
 * Locks are always taken backlog first, then elevator. The elevator loops never touch
 * the backlog.
 *
 * # Fields
 * - `floors`:              Validated floor set, fixed for the building's lifetime.
 * - `elevators`:           The fleet, in enumeration order (used to break ties).
 * - `backlog`:             Requests not yet assigned to any elevator.
 * - `timing`:              Hold durations handed to every elevator loop.
 * - `dispatcher`:          Cadence of the matching pass.
 * - `clock`:               Source of holds for every loop started by the building.
 * - `pickup_complete_tx`:  Optional sink for boarding notifications.
 * - `terminate_tx`:        Dropped on shutdown, which disconnects `terminate_rx`.
 * - `terminate_rx`:        Cloned into every loop started by the building.
 * - `workers`:             Join handles of the started loops.
 * - `elevators_started`:   Set by the first `start_elevators`, so each elevator has one loop.
 * - `dispatcher_started`:  Set by the first `start_dispatcher`.
 */
pub struct Building {
    floors: Vec<Floor>,
    elevators: Vec<PassengerElevator>,
    backlog: Mutex<VecDeque<PickupRequest>>,
    timing: TimingConfig,
    dispatcher: DispatcherConfig,
    clock: Arc<dyn Clock>,
    pickup_complete_tx: Option<cbc::Sender<PickupRequest>>,
    terminate_tx: Mutex<Option<cbc::Sender<()>>>,
    terminate_rx: cbc::Receiver<()>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    elevators_started: AtomicBool,
    dispatcher_started: AtomicBool,
}

impl Building {
    pub fn new(
        elevators: Vec<PassengerElevator>,
        floors: Vec<Floor>,
    ) -> Result<Building, BuildingError> {
        if floors.len() < 3 {
            return Err(BuildingError::TooFewFloors { count: floors.len() });
        }

        let mut seen = HashSet::new();
        for floor in floors.iter() {
            if !seen.insert(floor.number) {
                return Err(BuildingError::DuplicateFloor {
                    number: floor.number,
                });
            }
        }

        if elevators.is_empty() {
            return Err(BuildingError::NoElevators);
        }

        let elevators = elevators
            .into_iter()
            .enumerate()
            .map(|(id, mut elevator)| {
                elevator.set_id(id);
                elevator
            })
            .collect();

        let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();

        Ok(Building {
            floors,
            elevators,
            backlog: Mutex::new(VecDeque::new()),
            timing: TimingConfig::default(),
            dispatcher: DispatcherConfig::default(),
            clock: Arc::new(SystemClock),
            pickup_complete_tx: None,
            terminate_tx: Mutex::new(Some(terminate_tx)),
            terminate_rx,
            workers: Mutex::new(Vec::new()),
            elevators_started: AtomicBool::new(false),
            dispatcher_started: AtomicBool::new(false),
        })
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Building {
        self.timing = timing;
        self
    }

    pub fn with_dispatcher_config(mut self, dispatcher: DispatcherConfig) -> Building {
        self.dispatcher = dispatcher;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Building {
        self.clock = clock;
        self
    }

    /// Every pickup is sent to `pickup_complete_tx` once, when its party boards.
    pub fn with_pickup_notifier(mut self, pickup_complete_tx: cbc::Sender<PickupRequest>) -> Building {
        self.pickup_complete_tx = Some(pickup_complete_tx);
        self
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn snapshots(&self) -> Vec<ElevatorSnapshot> {
        self.elevators.iter().map(|elevator| elevator.snapshot()).collect()
    }

    /// Number of requests still waiting for an elevator.
    pub fn pending_requests(&self) -> usize {
        self.lock_backlog().len()
    }

    /// Queues `request` for the next matching pass. Nothing is assigned here.
    pub fn request_elevator(&self, request: PickupRequest) -> Result<(), RequestError> {
        for floor in [request.origin(), request.destination()] {
            if !self.has_floor(floor) {
                return Err(RequestError::UnknownFloor { floor });
            }
        }

        info!(
            "Request {} queued: {} people from {} to {}",
            request.id(),
            request.party_size(),
            request.origin(),
            request.destination()
        );
        self.lock_backlog().push_back(request);
        Ok(())
    }

    /**
     * One matching pass over the backlog.
     *
     * Requests are visited in queue order. Matched requests are handed to their elevator
     * and leave the backlog. Unmatched ones, and ones the elevator turned down for capacity,
     * stay queued in their original order. Returns how many were assigned.
     */
    pub fn assign_pending_pickups(&self) -> usize {
        let mut backlog = self.lock_backlog();
        let pending: Vec<PickupRequest> = backlog.drain(..).collect();
        let mut assigned = 0;

        for request in pending {
            let Some(elevator) = self.find_best_elevator(&request) else {
                debug!("No elevator available for request {}", request.id());
                backlog.push_back(request);
                continue;
            };

            match elevator.assign_pickup(request) {
                Ok(()) => assigned += 1,
                // The elevator's loop can board a party between matching and assigning
                Err(e) => {
                    debug!("Elevator {} turned request down: {}", elevator.id(), e);
                    backlog.push_back(e.into_request());
                }
            }
        }

        assigned
    }

    /**
     * Picks the elevator best suited for `request`, or `None` if nobody qualifies.
     *
     * An elevator qualifies if it can take the request and is either idle or already
     * travelling the request's way without having passed its origin. The closest
     * qualifying elevator wins; ties go to the one listed first.
     */
    pub fn find_best_elevator(&self, request: &PickupRequest) -> Option<&PassengerElevator> {
        let desired = request.desired_direction();
        let origin = request.origin();

        self.elevators
            .iter()
            .filter(|elevator| {
                let snapshot = elevator.snapshot();
                let on_the_way = snapshot.direction == desired
                    && match desired {
                        Direction::Up => snapshot.floor <= origin,
                        Direction::Down => snapshot.floor >= origin,
                        Direction::Idle => false,
                    };
                snapshot.direction == Direction::Idle || on_the_way
            })
            .filter_map(|elevator| {
                elevator
                    .suitability_score(request)
                    .map(|score| (score, elevator))
            })
            .min_by_key(|(score, _)| *score)
            .map(|(_, elevator)| elevator)
    }

    /// Spawns one thread per elevator running its loop. Does not block.
    /// Calling it again once the loops are running does nothing.
    pub fn start_elevators(&self) -> std::io::Result<()> {
        if self.elevators_started.swap(true, Ordering::SeqCst) {
            warn!("Elevators already started");
            return Ok(());
        }
        let mut workers = self.lock_workers();

        for elevator in self.elevators.iter() {
            let fsm = ElevatorFSM::new(
                elevator.clone(),
                self.timing.clone(),
                Arc::clone(&self.clock),
                self.pickup_complete_tx.clone(),
                self.terminate_rx.clone(),
            );

            let handle = Builder::new()
                .name(format!("elevator_{}", elevator.id()))
                .spawn(move || fsm.run())?;
            workers.push(handle);
        }

        info!("Started {} elevators", self.elevators.len());
        Ok(())
    }

    /// Spawns the thread that runs a matching pass every `assign_interval`.
    pub fn start_dispatcher(self: &Arc<Self>) -> std::io::Result<()> {
        if self.dispatcher_started.swap(true, Ordering::SeqCst) {
            warn!("Dispatcher already started");
            return Ok(());
        }
        let building = Arc::clone(self);
        let handle = Builder::new()
            .name("dispatcher".into())
            .spawn(move || building.run_dispatcher())?;

        self.lock_workers().push(handle);
        Ok(())
    }

    /// Receiver that disconnects once `shutdown` is called. For collaborator loops.
    pub fn terminate_signal(&self) -> cbc::Receiver<()> {
        self.terminate_rx.clone()
    }

    /// Stops every loop started by the building and waits for them to finish.
    pub fn shutdown(&self) {
        let terminate_tx = self
            .terminate_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(terminate_tx);

        let workers: Vec<JoinHandle<()>> = self.lock_workers().drain(..).collect();
        for worker in workers {
            let name = worker.thread().name().unwrap_or("worker").to_string();
            if worker.join().is_err() {
                error!("Thread {} panicked", name);
            }
        }
        info!("Building shut down");
    }

    fn run_dispatcher(&self) {
        info!("Dispatcher started");
        loop {
            let assigned = self.assign_pending_pickups();
            if assigned > 0 {
                debug!("Matching pass assigned {} requests", assigned);
            }

            if self
                .clock
                .hold(self.dispatcher.interval(), &self.terminate_rx)
                .is_err()
            {
                break;
            }
        }
        info!("Dispatcher terminated");
    }

    fn has_floor(&self, number: i32) -> bool {
        self.floors.iter().any(|floor| floor.number == number)
    }

    fn lock_backlog(&self) -> MutexGuard<'_, VecDeque<PickupRequest>> {
        self.backlog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_workers(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
