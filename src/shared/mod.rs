pub mod macros;
pub mod structs;

pub use structs::Direction;
pub use structs::DropOffRequest;
pub use structs::ElevatorSnapshot;
pub use structs::Floor;
pub use structs::PickupRequest;
pub use structs::Status;
pub use structs::CAPACITY;
