/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::coordinator::Building;
use crate::elevator::{Clock, SystemClock};
use crate::shared::{Floor, PickupRequest, CAPACITY};

/***************************************/
/*             Public API              */
/***************************************/

/// Builds a random request between two floors of `floors`.
///
/// The direction is a coin flip, flipped again when no floor lies that way.
pub fn random_request<R: Rng>(rng: &mut R, floors: &[Floor]) -> Option<PickupRequest> {
    let origin = floors.choose(rng)?.number;

    let above: Vec<i32> = floors.iter().map(|f| f.number).filter(|n| *n > origin).collect();
    let below: Vec<i32> = floors.iter().map(|f| f.number).filter(|n| *n < origin).collect();

    let candidates = match (rng.gen_bool(0.5), above.is_empty(), below.is_empty()) {
        (true, false, _) | (false, _, true) => above,
        _ => below,
    };
    let destination = *candidates.choose(rng)?;
    let party_size = rng.gen_range(1..CAPACITY);

    PickupRequest::new(origin, destination, party_size, false).ok()
}

/// Queues a random request every `interval` until the building shuts down.
pub fn run(building: Arc<Building>, interval: Duration) {
    let terminate_rx = building.terminate_signal();
    let mut rng = rand::thread_rng();

    loop {
        match random_request(&mut rng, building.floors()) {
            Some(request) => {
                if let Err(e) = building.request_elevator(request) {
                    warn!("Generated request rejected: {}", e);
                }
            }
            None => warn!("Could not generate a request"),
        }

        if SystemClock.hold(interval, &terminate_rx).is_err() {
            break;
        }
    }
    info!("Request generator terminated");
}
