use crate::host::TransportSettings;
use crate::output::OutputFormat;
use crate::render::RenderSettings;
use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use undulate_engine::{ParameterSnapshot, validate_curve_nodes};
use undulate_types::curve::{Curve, CurveNode, CurveShape, STRAIGHT_CURVATURE};
use undulate_types::defaults::Defaults;
use undulate_types::grid::GridStep;
use undulate_types::sync::{SyncRate, SyncRateType};
use undulate_types::waveform::Waveform;

/// Render LFO waveforms offline, driving the engine the way a plugin host would.
#[derive(Parser, Debug)]
#[command(name = "undulate")]
#[command(version)]
pub struct Args {
    /// Sample rate in Hz
    #[arg(short, long, default_value_t = Defaults::SAMPLE_RATE)]
    pub sample_rate: f64,

    /// Frames per block
    #[arg(short, long, default_value_t = Defaults::BLOCK_SIZE)]
    pub block_size: usize,

    /// Number of blocks to render
    #[arg(short = 'n', long, default_value_t = 16)]
    pub blocks: usize,

    /// Free running frequency in Hz
    #[arg(short, long, default_value_t = Defaults::FREQUENCY)]
    pub frequency: f32,

    /// Lock the period to the simulated transport instead of running free
    #[arg(long)]
    pub synced: bool,

    /// Transport tempo in beats per minute
    #[arg(long, default_value_t = Defaults::TEMPO_BPM)]
    pub tempo: f32,

    /// Transport beat unit (time signature denominator). 0 withholds timing info
    #[arg(long, default_value_t = 4)]
    pub beat_unit: u32,

    /// Transport play speed, 0 is stopped
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub play_speed: f32,

    /// Song position of the first rendered frame
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub start_sample: i64,

    /// Resend transport info every N blocks. Sent once when omitted
    #[arg(long)]
    pub transport_every: Option<usize>,

    /// Synced note division: 1/128, 1/64, 1/32, 1/16, 1/8, 1/4, 1/2, 1/1, 2/1, 4/1
    #[arg(long, default_value_t = Defaults::SYNC_RATE)]
    pub sync_rate: SyncRate,

    /// Synced note modifier: normal, dotted, triplet
    #[arg(long, default_value_t = Defaults::SYNC_RATE_TYPE)]
    pub sync_type: SyncRateType,

    /// Phase shift from 0 to 1, 0.5 is no shift
    #[arg(long, default_value_t = Defaults::SHIFT)]
    pub shift: f32,

    /// Mirror the waveforms horizontally
    #[arg(long)]
    pub horizontal_invert: bool,

    /// Mirror the waveforms vertically
    #[arg(long)]
    pub vertical_invert: bool,

    /// Quantize the phase to the grid
    #[arg(long)]
    pub step_mode: bool,

    /// Grid step used in step mode: 1/1, 1/2, 1/4, 1/8, 1/16, 1/32
    #[arg(long, default_value_t = Defaults::GRID_STEP)]
    pub grid_step: GridStep,

    #[arg(long, default_value_t = Defaults::RANGE_MINIMUM, allow_negative_numbers = true)]
    pub range_min: f32,

    #[arg(long, default_value_t = Defaults::RANGE_MAXIMUM, allow_negative_numbers = true)]
    pub range_max: f32,

    /// Comma separated waveforms to write: sine, saw, triangle, square, random, custom
    #[arg(
        short,
        long = "waveform",
        value_delimiter = ',',
        default_value = "sine,saw,triangle,square,random,custom"
    )]
    pub waveforms: Vec<Waveform>,

    /// Custom curve node as position:value[:curvature]. Repeat for every node
    #[arg(long = "node", value_parser = parse_curve_node, allow_hyphen_values = true)]
    pub nodes: Vec<CurveNode>,

    /// Custom curve shape: linear, exponent, superellipse
    #[arg(long, default_value_t = Defaults::CURVE_SHAPE)]
    pub curve_shape: CurveShape,

    /// Trigger a phase reset every N blocks
    #[arg(long)]
    pub trigger_every: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Output file, standard output when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Poll telemetry every N milliseconds while rendering
    #[arg(long)]
    pub telemetry_ms: Option<u64>,
}

impl Args {
    pub fn into_settings(self) -> Result<RenderSettings> {
        if self.block_size == 0 {
            bail!("Block size must be at least one frame");
        }
        if self.blocks == 0 {
            bail!("At least one block must be rendered");
        }
        if self.trigger_every == Some(0) || self.transport_every == Some(0) {
            bail!("Trigger and transport intervals must be at least one block");
        }
        if self.telemetry_ms == Some(0) {
            bail!("The telemetry interval must be at least one millisecond");
        }

        let curve = if self.nodes.is_empty() {
            let mut curve = Curve::default();
            curve.shape = self.curve_shape;
            curve
        } else {
            validate_curve_nodes(&self.nodes)?;
            Curve::from_nodes(&self.nodes, self.curve_shape)
        };

        let mut waveforms = Vec::with_capacity(self.waveforms.len());
        for waveform in self.waveforms {
            if !waveforms.contains(&waveform) {
                waveforms.push(waveform);
            }
        }
        if waveforms.is_empty() {
            bail!("At least one waveform must be selected");
        }

        let parameters = ParameterSnapshot {
            frequency_hz: self.frequency,
            is_freerunning: !self.synced,
            sync_rate: self.sync_rate,
            sync_rate_type: self.sync_type,
            shift: self.shift,
            horizontal_invert: self.horizontal_invert,
            vertical_invert: self.vertical_invert,
            step_mode: self.step_mode,
            grid_step: self.grid_step,
            range_low: self.range_min,
            range_high: self.range_max,
            curve,
            ..Default::default()
        };

        Ok(RenderSettings {
            sample_rate: self.sample_rate,
            block_size: self.block_size,
            blocks: self.blocks,
            waveforms,
            parameters,
            transport: TransportSettings {
                tempo_bpm: self.tempo,
                beat_unit: self.beat_unit,
                play_speed: self.play_speed,
                start_sample: self.start_sample,
                resend_interval: self.transport_every,
            },
            trigger_interval: self.trigger_every,
            format: self.format,
            output: self.output,
            telemetry_interval: self.telemetry_ms.map(Duration::from_millis),
        })
    }
}

pub fn parse_curve_node(text: &str) -> Result<CurveNode, String> {
    let fields: Vec<&str> = text.split(':').collect();
    if !(2..=3).contains(&fields.len()) {
        return Err(format!("Expected position:value[:curvature], got \"{text}\""));
    }

    let parse = |field: &str| {
        field
            .trim()
            .parse::<f32>()
            .map_err(|err| format!("Invalid number \"{field}\" in \"{text}\": {err}"))
    };

    let position = parse(fields[0])?;
    let value = parse(fields[1])?;
    let curvature = match fields.get(2) {
        Some(field) => parse(*field)?,
        None => STRAIGHT_CURVATURE,
    };

    Ok(CurveNode::new(position, value, curvature))
}
