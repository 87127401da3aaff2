/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::Terminated;

/**
 * Source of simulated time for the run loops.
 *
 * Every hold is a suspension point: it must return `Err(Terminated)` as soon as the
 * termination channel yields a message or disconnects, and must never be called
 * while holding an elevator lock.
 */
pub trait Clock: Send + Sync {
    fn hold(&self, duration: Duration, terminate_rx: &cbc::Receiver<()>) -> Result<(), Terminated>;
}

/// Wall-clock holds. Waits on the termination channel so shutdown interrupts the hold.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hold(&self, duration: Duration, terminate_rx: &cbc::Receiver<()>) -> Result<(), Terminated> {
        match terminate_rx.recv_timeout(duration) {
            Err(cbc::RecvTimeoutError::Timeout) => Ok(()),
            Ok(()) | Err(cbc::RecvTimeoutError::Disconnected) => Err(Terminated),
        }
    }
}

/// Ignores the requested duration and only yields. Meant for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantClock;

impl Clock for InstantClock {
    fn hold(&self, _duration: Duration, terminate_rx: &cbc::Receiver<()>) -> Result<(), Terminated> {
        match terminate_rx.try_recv() {
            Err(cbc::TryRecvError::Empty) => {
                std::thread::yield_now();
                Ok(())
            }
            Ok(()) | Err(cbc::TryRecvError::Disconnected) => Err(Terminated),
        }
    }
}
