pub mod client;
pub mod simulated;
pub mod transport;

pub use transport::{FormTransport, JsonTransport, SimulatedBackend, SimulatedTransport, Transport};
