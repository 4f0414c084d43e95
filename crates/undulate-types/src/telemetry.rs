use serde::Serialize;

/// Engine state published after each block for an observer such as an editor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub phase_sample: i64,
    pub period_samples: i64,
    pub sample_rate: f64,
    pub sine_coeff: f64,
    pub saw_coeff: f64,
}

impl TelemetrySnapshot {
    /// Position inside the period in [0, 1).
    pub fn normalized_phase(&self) -> f64 {
        if self.period_samples <= 0 {
            return 0.0;
        }
        self.phase_sample as f64 / self.period_samples as f64
    }
}
