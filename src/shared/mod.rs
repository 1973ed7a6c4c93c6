pub mod macros;
pub mod structs;

pub use structs::AdmissionError;
pub use structs::AdmitRequest;
pub use structs::Direction;
pub use structs::ElevatorSnapshot;
pub use structs::Request;
pub use structs::Status;
