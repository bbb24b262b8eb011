// Outbound HTTP clients.

pub mod probe;

pub use probe::HttpProbeClient;
