use crate::modules::period::OscillatorState;
use undulate_types::math::contains_nonzero;

/// Restarts the period on a trigger. Triggers only take effect at block
/// boundaries; a trigger arriving mid-block restarts the next block.
#[derive(Debug, Default)]
pub struct TriggerController {
    triggers_applied: u64,
}

impl TriggerController {
    pub fn new() -> Self {
        log::debug!("Constructing Trigger Controller Module");
        Self::default()
    }

    /// Resets the phase when the trigger level is set or the control-voltage
    /// buffer holds any nonzero sample. The gate input is reserved and ignored.
    pub fn apply(
        &mut self,
        oscillator: &mut OscillatorState,
        trigger: bool,
        trigger_cv: Option<&[f32]>,
    ) -> bool {
        if !is_triggered(trigger, trigger_cv) {
            return false;
        }

        oscillator.phase_sample = 0;
        self.triggers_applied = self.triggers_applied.wrapping_add(1);
        true
    }

    pub fn triggers_applied(&self) -> u64 {
        self.triggers_applied
    }
}

#[inline]
pub fn is_triggered(trigger: bool, trigger_cv: Option<&[f32]>) -> bool {
    trigger || trigger_cv.is_some_and(contains_nonzero)
}
