pub mod lfo;
pub mod parameters;
pub mod period;
pub mod pipeline;
pub mod telemetry;
pub mod transport;
pub mod trigger;
pub mod waveform;
