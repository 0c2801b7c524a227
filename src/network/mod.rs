pub mod probe;

pub use probe::{CheckOutcome, HealthProbe, NetworkProbe, SystemProbe};
