use crate::curve::CurveShape;
use crate::grid::GridStep;
use crate::sync::{SyncRate, SyncRateType};

pub struct Defaults {}

impl Defaults {
    // Oscillator Defaults
    pub const FREQUENCY: f32 = 1.0;
    pub const MINIMUM_FREQUENCY: f32 = 0.01;
    pub const IS_FREERUNNING: bool = true;
    pub const SYNC_RATE: SyncRate = SyncRate::Quarter;
    pub const SYNC_RATE_TYPE: SyncRateType = SyncRateType::Normal;

    // Sample Pipeline Defaults
    pub const SHIFT: f32 = 0.5;
    pub const HORIZONTAL_INVERT: bool = false;
    pub const VERTICAL_INVERT: bool = false;
    pub const STEP_MODE: bool = false;
    pub const GRID_STEP: GridStep = GridStep::Eighth;
    pub const RANGE_MINIMUM: f32 = -1.0;
    pub const RANGE_MAXIMUM: f32 = 1.0;
    pub const CURVE_SHAPE: CurveShape = CurveShape::Linear;

    // Transport Defaults
    pub const TEMPO_BPM: f32 = 120.0;
    pub const PLAY_SPEED: f32 = 0.0;
    pub const UNKNOWN_BEAT_UNIT: u32 = 0;

    // Engine Defaults
    pub const SAMPLE_RATE: f64 = 48_000.0;
    pub const BLOCK_SIZE: usize = 256;
    pub const RANDOM_SEGMENTS_PER_BLOCK: usize = 16;
}
