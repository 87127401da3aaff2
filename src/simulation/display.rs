/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::coordinator::Building;
use crate::elevator::{Clock, SystemClock};
use crate::shared::ElevatorSnapshot;

/***************************************/
/*             Public API              */
/***************************************/

/// One human readable line per elevator. Highlighted elevators are marked with `*`.
pub fn format_snapshot(snapshot: &ElevatorSnapshot) -> String {
    format!(
        "{}Elevator {:>2}:  Floor {:<2} | People {:<2} | {} | {:?}",
        if snapshot.highlight { "*" } else { " " },
        snapshot.id + 1,
        snapshot.floor,
        snapshot.occupancy,
        snapshot.direction.symbol(),
        snapshot.status
    )
}

/// Prints every elevator's snapshot each `interval` until the building shuts down.
pub fn run(building: Arc<Building>, interval: Duration, json: bool) {
    let terminate_rx = building.terminate_signal();

    loop {
        for snapshot in building.snapshots() {
            if json {
                match serde_json::to_string(&snapshot) {
                    Ok(line) => println!("{}", line),
                    Err(e) => error!("Failed to serialize snapshot: {}", e),
                }
            } else {
                println!("{}", format_snapshot(&snapshot));
            }
        }
        if !json {
            println!("Waiting requests: {}", building.pending_requests());
        }

        if SystemClock.hold(interval, &terminate_rx).is_err() {
            break;
        }
    }
    info!("Status display terminated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{Direction, Status};

    fn snapshot() -> ElevatorSnapshot {
        ElevatorSnapshot {
            id: 0,
            floor: -1,
            direction: Direction::Up,
            status: Status::Moving,
            occupancy: 4,
            highlight: true,
            pending_pickups: 1,
            active_drop_offs: 2,
        }
    }

    #[test]
    fn test_format_snapshot() {
        assert_eq!(
            format_snapshot(&snapshot()),
            "*Elevator  1:  Floor -1 | People 4  | ↑ | Moving"
        );
    }

    #[test]
    fn test_snapshot_json() {
        let json: serde_json::Value = serde_json::to_value(snapshot()).unwrap();

        assert_eq!(json["floor"], -1);
        assert_eq!(json["direction"], "up");
        assert_eq!(json["status"], "moving");
        assert_eq!(json["pendingPickups"], 1);
        assert_eq!(json["activeDropOffs"], 2);
    }
}
