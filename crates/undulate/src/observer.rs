use crossbeam_channel::{Receiver, RecvTimeoutError};
use serde::Serialize;
use std::thread;
use std::time::Duration;
use undulate_engine::TelemetryReader;
use undulate_types::telemetry::TelemetrySnapshot;

/// What a host editor would draw: the raw snapshot plus the playhead position.
#[derive(Debug, Clone, Copy, Serialize)]
struct TelemetryRecord {
    #[serde(flatten)]
    snapshot: TelemetrySnapshot,
    normalized_phase: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct ObserverSummary {
    pub reads: u64,
    pub missed: u64,
    pub last: Option<TelemetrySnapshot>,
}

/// Polls the engine's telemetry every `interval` until `stop` is dropped or
/// signalled, logging each snapshot it manages to read.
pub fn start_telemetry_observer(
    reader: TelemetryReader,
    interval: Duration,
    stop: Receiver<()>,
) -> thread::JoinHandle<ObserverSummary> {
    thread::spawn(move || {
        log::debug!("start_telemetry_observer(): spawned thread to poll LFO telemetry");
        reader.attach();
        let mut summary = ObserverSummary::default();

        loop {
            poll(&reader, &mut summary);
            match stop.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        poll(&reader, &mut summary);
        reader.detach();
        log::debug!(
            "start_telemetry_observer(): {} reads, {} missed",
            summary.reads,
            summary.missed
        );
        summary
    })
}

fn poll(reader: &TelemetryReader, summary: &mut ObserverSummary) {
    let Some(snapshot) = reader.read() else {
        summary.missed += 1;
        return;
    };

    summary.reads += 1;
    summary.last = Some(snapshot);
    match serde_json::to_string(&TelemetryRecord {
        snapshot,
        normalized_phase: snapshot.normalized_phase(),
    }) {
        Ok(record) => log::info!(target: "undulate::telemetry", "{record}"),
        Err(err) => log::warn!(target: "undulate::telemetry", "Failed to encode telemetry: {err}"),
    }
}
