/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::TimingConfig;
use crate::elevator::clock::Clock;
use crate::elevator::passenger::PassengerElevator;
use crate::error::Terminated;
use crate::shared::{Direction, DropOffRequest, PickupRequest, Status};

/**
 * Drives one passenger elevator through its pickups and drop-offs.
 *
 * Each cycle serves the oldest pending pickup, then the nearest active drop-off. With no
 * work at all the elevator goes idle and waits `idle_time` before looking again.
 * Every hold is a suspension point where shutdown is observed, and no state is
 * mutated after a hold that was cut short.
 *
 * # Fields
 * - `elevator`:            Handle to the shared elevator state.
 * - `timing`:              Hold durations for travel, loading, unloading and idling.
 * - `clock`:               Source of holds, swapped out in tests.
 * - `pickup_complete_tx`:  Receives every pickup request at the moment its party boards.
 * - `terminate_rx`:        Disconnects (or yields a message) when the loop should stop.
 */
pub struct ElevatorFSM {
    elevator: PassengerElevator,
    timing: TimingConfig,
    clock: Arc<dyn Clock>,
    pickup_complete_tx: Option<cbc::Sender<PickupRequest>>,
    terminate_rx: cbc::Receiver<()>,
}

impl ElevatorFSM {
    pub fn new(
        elevator: PassengerElevator,
        timing: TimingConfig,
        clock: Arc<dyn Clock>,
        pickup_complete_tx: Option<cbc::Sender<PickupRequest>>,
        terminate_rx: cbc::Receiver<()>,
    ) -> ElevatorFSM {
        ElevatorFSM {
            elevator,
            timing,
            clock,
            pickup_complete_tx,
            terminate_rx,
        }
    }

    pub fn run(self) {
        info!("Elevator {} started at floor {}", self.elevator.id(), self.elevator.snapshot().floor);

        if let Err(Terminated) = self.run_loop() {
            info!("Elevator {} terminated", self.elevator.id());
        }
    }

    // Only returns once terminated
    fn run_loop(&self) -> Result<(), Terminated> {
        loop {
            self.cycle()?;
        }
    }

    fn cycle(&self) -> Result<(), Terminated> {
        if self.elevator.lock().go_idle_if_drained() {
            return self.hold(self.timing.idle());
        }

        let next_pickup = self.elevator.lock().pending_pickups.front().cloned();
        if let Some(pickup) = next_pickup {
            self.serve_pickup(pickup)?;
        }

        let next_drop_off = self.elevator.lock().nearest_drop_off();
        if let Some(drop_off) = next_drop_off {
            self.serve_drop_off(drop_off)?;
        }

        Ok(())
    }

    fn serve_pickup(&self, pickup: PickupRequest) -> Result<(), Terminated> {
        self.travel_to(pickup.origin(), pickup.highlight())?;

        self.elevator.lock().status = Status::LoadingPassengers;
        self.hold(self.timing.loading())?;

        // The pickup stays queued until this point so an interrupted trip loses nothing
        {
            let mut state = self.elevator.lock();
            let Some(index) = state
                .pending_pickups
                .iter()
                .position(|pending| pending.id() == pickup.id())
            else {
                debug!(
                    "Elevator {} found request {} already boarded",
                    self.elevator.id(),
                    pickup.id()
                );
                return Ok(());
            };
            state.pending_pickups.remove(index);
            state.occupancy += pickup.party_size();
            state.active_drop_offs.push(DropOffRequest::from(&pickup));
        }
        info!(
            "Elevator {} boarded {} people at floor {}",
            self.elevator.id(),
            pickup.party_size(),
            pickup.origin()
        );

        if let Some(tx) = &self.pickup_complete_tx {
            let id = pickup.id();
            if let Err(e) = tx.send(pickup) {
                debug!("Pickup notification for request {} dropped: {}", id, e);
            }
        }
        Ok(())
    }

    fn serve_drop_off(&self, drop_off: DropOffRequest) -> Result<(), Terminated> {
        self.travel_to(drop_off.destination, drop_off.highlight)?;

        self.elevator.lock().status = Status::UnloadingPassengers;
        self.hold(self.timing.unloading())?;

        {
            let mut state = self.elevator.lock();
            let before = state.active_drop_offs.len();
            state
                .active_drop_offs
                .retain(|active| active.request_id != drop_off.request_id);
            if state.active_drop_offs.len() == before {
                return Ok(());
            }
            state.occupancy = state.occupancy.saturating_sub(drop_off.party_size);
        }
        info!(
            "Elevator {} dropped off {} people at floor {}",
            self.elevator.id(),
            drop_off.party_size,
            drop_off.destination
        );
        Ok(())
    }

    /// Moves one floor per `travel_time` until `target` is reached.
    fn travel_to(&self, target: i32, highlight: bool) -> Result<(), Terminated> {
        let direction = {
            let mut state = self.elevator.lock();
            state.direction = Direction::between(state.floor, target);
            state.status = Status::Moving;
            state.highlight = highlight;
            state.direction
        };

        while self.elevator.lock().floor != target {
            self.hold(self.timing.travel())?;

            let mut state = self.elevator.lock();
            state.floor += direction.step();
            debug!("Elevator {} passing floor {}", self.elevator.id(), state.floor);
        }
        Ok(())
    }

    fn hold(&self, duration: Duration) -> Result<(), Terminated> {
        self.clock.hold(duration, &self.terminate_rx)
    }
}
