use crate::host::{SimulatedTransport, TransportSettings};
use crate::observer::{ObserverSummary, start_telemetry_observer};
use crate::output::{FrameWriter, OutputFormat};
use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use rtrb::{Consumer, Producer, RingBuffer};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use undulate_engine::{BlockInputs, BlockOutputs, Lfo, LfoParameters, ParameterSnapshot};
use undulate_types::telemetry::TelemetrySnapshot;
use undulate_types::waveform::Waveform;

const SAMPLE_BUFFER_CAPACITY_FRAMES: usize = 8192;
const SAMPLE_BUFFER_MIN_BLOCKS: usize = 4;
const PRODUCER_LOOP_SLEEP_DURATION_MICROSECONDS: u64 = 50;
const CONSUMER_LOOP_SLEEP_DURATION_MICROSECONDS: u64 = 200;

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub sample_rate: f64,
    pub block_size: usize,
    pub blocks: usize,
    pub waveforms: Vec<Waveform>,
    pub parameters: ParameterSnapshot,
    pub transport: TransportSettings,
    pub trigger_interval: Option<usize>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub telemetry_interval: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderSummary {
    pub blocks: usize,
    pub frames: u64,
    pub triggers: u64,
    /// Position inside the current beat when the render ended.
    pub beat_offset: f32,
    pub final_state: TelemetrySnapshot,
}

#[derive(Debug)]
pub enum RenderEvent {
    Finished(RenderSummary),
    Stopped(String),
}

/// Renders every block and writes the frames to `writer`. The engine runs on
/// its own thread and hands frames over through a lock-free ring buffer.
pub fn render<W: Write>(
    settings: &RenderSettings,
    writer: W,
) -> Result<(RenderSummary, Option<ObserverSummary>)> {
    let lfo = Lfo::new(settings.sample_rate)?;
    let parameters = Arc::new(LfoParameters::default());
    parameters.store(&settings.parameters);

    let channels = settings.waveforms.len();
    let capacity_frames =
        SAMPLE_BUFFER_CAPACITY_FRAMES.max(settings.block_size * SAMPLE_BUFFER_MIN_BLOCKS);
    let (sample_producer, sample_consumer) = RingBuffer::<f32>::new(capacity_frames * channels);
    let (event_sender, event_receiver) = bounded(1);

    let (stop_sender, stop_receiver) = bounded::<()>(1);
    let observer = settings
        .telemetry_interval
        .map(|interval| start_telemetry_observer(lfo.telemetry_reader(), interval, stop_receiver));

    log::info!(
        "Rendering {} blocks of {} frames at {} Hz",
        settings.blocks,
        settings.block_size,
        settings.sample_rate
    );
    let render_thread =
        start_render_thread(lfo, settings.clone(), parameters, sample_producer, event_sender);

    let mut frame_writer = FrameWriter::new(writer, settings.format, &settings.waveforms);
    let written = write_frames(sample_consumer, &event_receiver, &mut frame_writer);
    frame_writer.finish()?;

    drop(stop_sender);
    let observer_summary = match observer {
        Some(handle) => Some(
            handle
                .join()
                .map_err(|_| anyhow!("Telemetry observer thread panicked"))?,
        ),
        None => None,
    };
    render_thread
        .join()
        .map_err(|_| anyhow!("Render thread panicked"))?;

    Ok((written?, observer_summary))
}

fn start_render_thread(
    mut lfo: Lfo,
    settings: RenderSettings,
    parameters: Arc<LfoParameters>,
    mut sample_buffer: Producer<f32>,
    event_sender: Sender<RenderEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        log::debug!("start_render_thread(): spawned thread to render LFO blocks");
        let block_size = settings.block_size;
        let mut transport = SimulatedTransport::new(settings.transport, settings.sample_rate);
        let mut block_buffers = vec![vec![0.0_f32; block_size]; settings.waveforms.len()];
        let mut local_buffer = Vec::<f32>::with_capacity(block_size * settings.waveforms.len());

        for block_index in 0..settings.blocks {
            if let Some(interval) = settings.trigger_interval
                && block_index > 0
                && block_index % interval == 0
            {
                parameters.trigger();
            }

            let snapshot = parameters.snapshot();
            let transport_event = transport.next_block(block_index, block_size);
            let inputs =
                BlockInputs::new(&snapshot).with_transport_events(transport_event.as_slice());

            let mut outputs = BlockOutputs::new();
            for (waveform, buffer) in settings.waveforms.iter().zip(block_buffers.iter_mut()) {
                outputs.set_output(*waveform, buffer.as_mut_slice());
            }
            lfo.process_block(block_size, &inputs, &mut outputs);

            interleave(&block_buffers, &mut local_buffer);

            // Wait for the sample buffer to have room for the whole block
            loop {
                if let Ok(chunk) = sample_buffer.write_chunk_uninit(local_buffer.len()) {
                    _ = chunk.fill_from_iter(local_buffer.iter().copied());
                    break;
                }

                if sample_buffer.is_abandoned() {
                    log::warn!("start_render_thread(): Sample buffer consumer is gone. Stopping");
                    _ = event_sender.send(RenderEvent::Stopped(format!(
                        "Output stopped after {block_index} blocks"
                    )));
                    return;
                }

                thread::sleep(Duration::from_micros(
                    PRODUCER_LOOP_SLEEP_DURATION_MICROSECONDS,
                ));
            }
        }

        let summary = RenderSummary {
            blocks: settings.blocks,
            frames: (settings.blocks * block_size) as u64,
            triggers: lfo.triggers_applied(),
            beat_offset: lfo.transport_state().beat_offset,
            final_state: lfo.last_telemetry(),
        };
        log::debug!(
            "start_render_thread(): All blocks rendered, transport at sample {}",
            transport.position()
        );
        _ = event_sender.send(RenderEvent::Finished(summary));
    })
}

/// Frame-major copy of per-waveform buffers: s0w0, s0w1, ..., s1w0, ...
pub fn interleave(buffers: &[Vec<f32>], interleaved: &mut Vec<f32>) {
    interleaved.clear();
    let frames = buffers.iter().map(Vec::len).min().unwrap_or(0);
    for index in 0..frames {
        interleaved.extend(buffers.iter().map(|buffer| buffer[index]));
    }
}

fn write_frames<W: Write>(
    mut sample_buffer: Consumer<f32>,
    event_receiver: &Receiver<RenderEvent>,
    frame_writer: &mut FrameWriter<W>,
) -> Result<RenderSummary> {
    let channels = frame_writer.channels();
    let mut local_buffer = Vec::<f32>::new();
    let mut finished = None;
    frame_writer.write_header()?;

    loop {
        let available_frames = sample_buffer.slots() / channels;
        if available_frames > 0 {
            let chunk = sample_buffer.read_chunk(available_frames * channels)?;
            local_buffer.clear();
            local_buffer.extend(chunk);
            frame_writer.write_interleaved(&local_buffer)?;
            continue;
        }

        if let Some(summary) = finished {
            log::debug!("write_frames(): {} frames written", frame_writer.frames_written());
            return Ok(summary);
        }

        match event_receiver.try_recv() {
            Ok(RenderEvent::Finished(summary)) => finished = Some(summary),
            Ok(RenderEvent::Stopped(reason)) => return Err(anyhow!(reason)),
            Err(TryRecvError::Disconnected) => {
                return Err(anyhow!("Render thread stopped without finishing"));
            }
            Err(TryRecvError::Empty) => thread::sleep(Duration::from_micros(
                CONSUMER_LOOP_SLEEP_DURATION_MICROSECONDS,
            )),
        }
    }
}
