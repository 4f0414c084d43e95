use crate::modules::period::RecalculationInputs;
use crate::modules::pipeline::{Range, SamplePipeline};
use std::sync::atomic::Ordering::Relaxed;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32};
use undulate_types::curve::{Curve, CurveNode, CurveShape, MAX_CURVE_NODES};
use undulate_types::defaults::Defaults;
use undulate_types::grid::GridStep;
use undulate_types::math::{load_f32_from_atomic_u32, store_f32_as_atomic_u32};
use undulate_types::sync::{SyncRate, SyncRateType};

#[derive(Debug)]
pub struct CurveNodeParameters {
    pub position: AtomicU32,
    pub value: AtomicU32,
    pub curvature: AtomicU32,
}

impl CurveNodeParameters {
    fn from_node(node: &CurveNode) -> Self {
        Self {
            position: AtomicU32::new(node.position.to_bits()),
            value: AtomicU32::new(node.value.to_bits()),
            curvature: AtomicU32::new(node.curvature.to_bits()),
        }
    }

    fn load(&self) -> CurveNode {
        CurveNode::new(
            load_f32_from_atomic_u32(&self.position),
            load_f32_from_atomic_u32(&self.value),
            load_f32_from_atomic_u32(&self.curvature),
        )
    }

    fn store(&self, node: &CurveNode) {
        store_f32_as_atomic_u32(&self.position, node.position);
        store_f32_as_atomic_u32(&self.value, node.value);
        store_f32_as_atomic_u32(&self.curvature, node.curvature);
    }
}

/// Shared between the control side, which writes, and the engine, which
/// reads a snapshot once per block. Fields are independent; a block may see
/// some fields of an update but not others.
#[derive(Debug)]
pub struct LfoParameters {
    pub frequency: AtomicU32,
    pub is_freerunning: AtomicBool,
    pub sync_rate: AtomicU8,
    pub sync_rate_type: AtomicU8,
    pub shift: AtomicU32,
    pub horizontal_invert: AtomicBool,
    pub vertical_invert: AtomicBool,
    pub step_mode: AtomicBool,
    pub grid_step: AtomicU8,
    pub range_low: AtomicU32,
    pub range_high: AtomicU32,
    pub trigger: AtomicBool,
    pub gate: AtomicBool,
    pub curve_shape: AtomicU8,
    pub node_count: AtomicU8,
    pub nodes: [CurveNodeParameters; MAX_CURVE_NODES],
}

impl Default for LfoParameters {
    fn default() -> Self {
        let curve = Curve::default();
        let nodes = std::array::from_fn(|index| {
            CurveNodeParameters::from_node(curve.nodes().get(index).unwrap_or(&CurveNode::default()))
        });

        Self {
            frequency: AtomicU32::new(Defaults::FREQUENCY.to_bits()),
            is_freerunning: AtomicBool::new(Defaults::IS_FREERUNNING),
            sync_rate: AtomicU8::new(Defaults::SYNC_RATE as u8),
            sync_rate_type: AtomicU8::new(Defaults::SYNC_RATE_TYPE as u8),
            shift: AtomicU32::new(Defaults::SHIFT.to_bits()),
            horizontal_invert: AtomicBool::new(Defaults::HORIZONTAL_INVERT),
            vertical_invert: AtomicBool::new(Defaults::VERTICAL_INVERT),
            step_mode: AtomicBool::new(Defaults::STEP_MODE),
            grid_step: AtomicU8::new(Defaults::GRID_STEP as u8),
            range_low: AtomicU32::new(Defaults::RANGE_MINIMUM.to_bits()),
            range_high: AtomicU32::new(Defaults::RANGE_MAXIMUM.to_bits()),
            trigger: AtomicBool::new(false),
            gate: AtomicBool::new(false),
            curve_shape: AtomicU8::new(curve.shape as u8),
            node_count: AtomicU8::new(curve.len() as u8),
            nodes,
        }
    }
}

impl LfoParameters {
    /// Reads every parameter once. A pending trigger is consumed.
    pub fn snapshot(&self) -> ParameterSnapshot {
        let node_count = usize::from(self.node_count.load(Relaxed)).min(MAX_CURVE_NODES);
        let mut nodes = [CurveNode::default(); MAX_CURVE_NODES];
        for (node, parameters) in nodes.iter_mut().zip(&self.nodes).take(node_count) {
            *node = parameters.load();
        }
        let curve_shape =
            CurveShape::from_index(self.curve_shape.load(Relaxed)).unwrap_or(Defaults::CURVE_SHAPE);

        ParameterSnapshot {
            frequency_hz: load_f32_from_atomic_u32(&self.frequency),
            is_freerunning: self.is_freerunning.load(Relaxed),
            sync_rate: SyncRate::from_index(self.sync_rate.load(Relaxed))
                .unwrap_or(Defaults::SYNC_RATE),
            sync_rate_type: SyncRateType::from_index(self.sync_rate_type.load(Relaxed))
                .unwrap_or(Defaults::SYNC_RATE_TYPE),
            shift: load_f32_from_atomic_u32(&self.shift),
            horizontal_invert: self.horizontal_invert.load(Relaxed),
            vertical_invert: self.vertical_invert.load(Relaxed),
            step_mode: self.step_mode.load(Relaxed),
            grid_step: GridStep::from_index(self.grid_step.load(Relaxed))
                .unwrap_or(Defaults::GRID_STEP),
            range_low: load_f32_from_atomic_u32(&self.range_low),
            range_high: load_f32_from_atomic_u32(&self.range_high),
            trigger: self.trigger.swap(false, Relaxed),
            gate: self.gate.load(Relaxed),
            curve: Curve::from_nodes(&nodes[..node_count], curve_shape),
        }
    }

    /// Writes every field of `snapshot`. The trigger is only ever set, never cleared.
    pub fn store(&self, snapshot: &ParameterSnapshot) {
        store_f32_as_atomic_u32(&self.frequency, snapshot.frequency_hz);
        self.is_freerunning.store(snapshot.is_freerunning, Relaxed);
        self.sync_rate.store(snapshot.sync_rate as u8, Relaxed);
        self.sync_rate_type.store(snapshot.sync_rate_type as u8, Relaxed);
        store_f32_as_atomic_u32(&self.shift, snapshot.shift);
        self.horizontal_invert.store(snapshot.horizontal_invert, Relaxed);
        self.vertical_invert.store(snapshot.vertical_invert, Relaxed);
        self.step_mode.store(snapshot.step_mode, Relaxed);
        self.grid_step.store(snapshot.grid_step as u8, Relaxed);
        store_f32_as_atomic_u32(&self.range_low, snapshot.range_low);
        store_f32_as_atomic_u32(&self.range_high, snapshot.range_high);
        self.gate.store(snapshot.gate, Relaxed);
        self.set_curve(&snapshot.curve);
        if snapshot.trigger {
            self.trigger();
        }
    }

    pub fn set_curve(&self, curve: &Curve) {
        for (parameters, node) in self.nodes.iter().zip(curve.nodes()) {
            parameters.store(node);
        }
        self.curve_shape.store(curve.shape as u8, Relaxed);
        self.node_count.store(curve.len() as u8, Relaxed);
    }

    pub fn trigger(&self) {
        self.trigger.store(true, Relaxed);
    }
}

/// Plain copy of the parameters used for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSnapshot {
    pub frequency_hz: f32,
    pub is_freerunning: bool,
    pub sync_rate: SyncRate,
    pub sync_rate_type: SyncRateType,
    pub shift: f32,
    pub horizontal_invert: bool,
    pub vertical_invert: bool,
    pub step_mode: bool,
    pub grid_step: GridStep,
    pub range_low: f32,
    pub range_high: f32,
    /// Level: the phase is reset at the start of every block this is set.
    pub trigger: bool,
    /// Reserved.
    pub gate: bool,
    pub curve: Curve,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            frequency_hz: Defaults::FREQUENCY,
            is_freerunning: Defaults::IS_FREERUNNING,
            sync_rate: Defaults::SYNC_RATE,
            sync_rate_type: Defaults::SYNC_RATE_TYPE,
            shift: Defaults::SHIFT,
            horizontal_invert: Defaults::HORIZONTAL_INVERT,
            vertical_invert: Defaults::VERTICAL_INVERT,
            step_mode: Defaults::STEP_MODE,
            grid_step: Defaults::GRID_STEP,
            range_low: Defaults::RANGE_MINIMUM,
            range_high: Defaults::RANGE_MAXIMUM,
            trigger: false,
            gate: false,
            curve: Curve::default(),
        }
    }
}

impl ParameterSnapshot {
    pub fn recalculation_inputs(&self) -> RecalculationInputs {
        RecalculationInputs {
            is_freerunning: self.is_freerunning,
            frequency_hz: self.frequency_hz,
            sync_rate: self.sync_rate,
            sync_rate_type: self.sync_rate_type,
        }
    }

    pub fn sample_pipeline(&self) -> SamplePipeline {
        SamplePipeline {
            horizontal_invert: self.horizontal_invert,
            shift: self.shift,
            step_mode: self.step_mode,
            grid_step: self.grid_step,
            vertical_invert: self.vertical_invert,
            range: Range::new(self.range_low, self.range_high),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use undulate_types::math::f32s_are_equal;

    #[test]
    fn default_parameters_snapshot_to_the_default_snapshot() {
        let parameters = LfoParameters::default();

        assert_eq!(parameters.snapshot(), ParameterSnapshot::default());
    }

    #[test]
    fn snapshot_reflects_stored_values() {
        let parameters = LfoParameters::default();
        store_f32_as_atomic_u32(&parameters.frequency, 3.5);
        store_f32_as_atomic_u32(&parameters.shift, 0.8);
        parameters.is_freerunning.store(false, Relaxed);
        parameters.sync_rate.store(SyncRate::Sixteenth as u8, Relaxed);
        parameters.sync_rate_type.store(SyncRateType::Triplet as u8, Relaxed);
        parameters.grid_step.store(GridStep::ThirtySecond as u8, Relaxed);

        let snapshot = parameters.snapshot();

        assert!(f32s_are_equal(snapshot.frequency_hz, 3.5));
        assert!(f32s_are_equal(snapshot.shift, 0.8));
        assert!(!snapshot.is_freerunning);
        assert_eq!(snapshot.sync_rate, SyncRate::Sixteenth);
        assert_eq!(snapshot.sync_rate_type, SyncRateType::Triplet);
        assert_eq!(snapshot.grid_step, GridStep::ThirtySecond);
    }

    #[test]
    fn unknown_enum_indexes_fall_back_to_the_defaults() {
        let parameters = LfoParameters::default();
        parameters.sync_rate.store(200, Relaxed);
        parameters.sync_rate_type.store(7, Relaxed);
        parameters.grid_step.store(99, Relaxed);
        parameters.curve_shape.store(42, Relaxed);

        let snapshot = parameters.snapshot();

        assert_eq!(snapshot.sync_rate, Defaults::SYNC_RATE);
        assert_eq!(snapshot.sync_rate_type, Defaults::SYNC_RATE_TYPE);
        assert_eq!(snapshot.grid_step, Defaults::GRID_STEP);
        assert_eq!(snapshot.curve.shape, Defaults::CURVE_SHAPE);
    }

    #[test]
    fn trigger_is_consumed_by_the_snapshot() {
        let parameters = LfoParameters::default();
        parameters.trigger();

        assert!(parameters.snapshot().trigger);
        assert!(!parameters.snapshot().trigger);
    }

    #[test]
    fn set_curve_round_trips_through_the_atomics() {
        let parameters = LfoParameters::default();
        let curve = Curve::from_nodes(
            &[
                CurveNode::straight(0.0, -1.0),
                CurveNode::new(0.3, 0.7, 0.4),
                CurveNode::straight(1.0, 0.2),
            ],
            CurveShape::Superellipse,
        );

        parameters.set_curve(&curve);

        assert_eq!(parameters.snapshot().curve, curve);
    }

    #[test]
    fn store_then_snapshot_returns_the_stored_parameters() {
        let parameters = LfoParameters::default();
        let expected = ParameterSnapshot {
            frequency_hz: 0.25,
            is_freerunning: false,
            sync_rate: SyncRate::TwoBars,
            sync_rate_type: SyncRateType::Dotted,
            shift: 0.1,
            horizontal_invert: true,
            vertical_invert: true,
            step_mode: true,
            grid_step: GridStep::Half,
            range_low: 0.0,
            range_high: 5.0,
            trigger: true,
            gate: true,
            curve: Curve::from_nodes(
                &[CurveNode::straight(0.0, 0.0), CurveNode::straight(1.0, 1.0)],
                CurveShape::Exponent,
            ),
        };

        parameters.store(&expected);

        assert_eq!(parameters.snapshot(), expected);
    }

    #[test]
    fn node_count_above_the_maximum_is_capped() {
        let parameters = LfoParameters::default();
        parameters.node_count.store(200, Relaxed);

        let snapshot = parameters.snapshot();

        assert_eq!(snapshot.curve.len(), MAX_CURVE_NODES);
    }

    #[test]
    fn sample_pipeline_normalizes_an_inverted_range() {
        let snapshot = ParameterSnapshot {
            range_low: 5.0,
            range_high: -5.0,
            ..Default::default()
        };

        let range = snapshot.sample_pipeline().range;

        assert!(f32s_are_equal(range.minimum(), -5.0));
        assert!(f32s_are_equal(range.maximum(), 5.0));
    }
}
