pub mod modules;

pub use modules::lfo::{BlockInputs, BlockOutputs, Lfo, LfoError, validate_curve_nodes};
pub use modules::parameters::{LfoParameters, ParameterSnapshot};
pub use modules::telemetry::TelemetryReader;
