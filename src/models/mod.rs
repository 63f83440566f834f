pub mod device;
pub mod port;
pub mod probe;

pub use device::{Device, NewDevice, System};
pub use port::{MacEntry, MacObservation, MacSearchHit, PortRecord};
pub use probe::ProbeRequest;
