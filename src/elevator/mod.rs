pub mod clock;
pub mod fsm;
pub mod passenger;

pub use clock::{Clock, InstantClock, SystemClock};
pub use fsm::ElevatorFSM;
pub use passenger::PassengerElevator;
