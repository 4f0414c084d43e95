pub mod curve;
pub mod defaults;
pub mod grid;
pub mod math;
pub mod sync;
pub mod telemetry;
pub mod transport_events;
pub mod waveform;
