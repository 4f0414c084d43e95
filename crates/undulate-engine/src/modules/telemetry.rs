use std::sync::Arc;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, AtomicU64, fence};
use undulate_types::math::{load_f64_from_atomic_u64, store_f64_as_atomic_u64};
use undulate_types::telemetry::TelemetrySnapshot;

const MAX_READ_ATTEMPTS: usize = 64;

/// Latest published snapshot guarded by a sequence counter. The writer never
/// waits; a reader retries while the counter is odd or changed under it.
#[derive(Debug, Default)]
struct TelemetryCell {
    sequence: AtomicU32,
    phase_sample: AtomicI64,
    period_samples: AtomicI64,
    sample_rate: AtomicU64,
    sine_coeff: AtomicU64,
    saw_coeff: AtomicU64,
    is_observed: AtomicBool,
}

impl TelemetryCell {
    fn write(&self, snapshot: &TelemetrySnapshot) {
        let sequence = self.sequence.load(Relaxed);
        self.sequence.store(sequence.wrapping_add(1), Relaxed);
        fence(Release);

        self.phase_sample.store(snapshot.phase_sample, Relaxed);
        self.period_samples.store(snapshot.period_samples, Relaxed);
        store_f64_as_atomic_u64(&self.sample_rate, snapshot.sample_rate);
        store_f64_as_atomic_u64(&self.sine_coeff, snapshot.sine_coeff);
        store_f64_as_atomic_u64(&self.saw_coeff, snapshot.saw_coeff);

        self.sequence.store(sequence.wrapping_add(2), Release);
    }

    fn read(&self) -> Option<TelemetrySnapshot> {
        for _ in 0..MAX_READ_ATTEMPTS {
            let before = self.sequence.load(Acquire);
            if before % 2 == 1 {
                std::hint::spin_loop();
                continue;
            }

            let snapshot = TelemetrySnapshot {
                phase_sample: self.phase_sample.load(Relaxed),
                period_samples: self.period_samples.load(Relaxed),
                sample_rate: load_f64_from_atomic_u64(&self.sample_rate),
                sine_coeff: load_f64_from_atomic_u64(&self.sine_coeff),
                saw_coeff: load_f64_from_atomic_u64(&self.saw_coeff),
            };

            fence(Acquire);
            if self.sequence.load(Relaxed) == before {
                return Some(snapshot);
            }
        }
        None
    }
}

/// Creates the engine-side publisher and an observer-side reader for one LFO.
pub fn telemetry_channel() -> (TelemetryPublisher, TelemetryReader) {
    let cell = Arc::new(TelemetryCell::default());
    (
        TelemetryPublisher {
            cell: cell.clone(),
            last_snapshot: TelemetrySnapshot::default(),
        },
        TelemetryReader { cell },
    )
}

/// Single writer, owned by the engine.
#[derive(Debug)]
pub struct TelemetryPublisher {
    cell: Arc<TelemetryCell>,
    last_snapshot: TelemetrySnapshot,
}

impl TelemetryPublisher {
    /// Keeps the snapshot for the owner and shares it only while observed.
    pub fn publish(&mut self, snapshot: TelemetrySnapshot) -> bool {
        self.last_snapshot = snapshot;
        if !self.cell.is_observed.load(Relaxed) {
            return false;
        }

        self.cell.write(&snapshot);
        true
    }

    pub fn is_observed(&self) -> bool {
        self.cell.is_observed.load(Relaxed)
    }

    pub fn last_snapshot(&self) -> TelemetrySnapshot {
        self.last_snapshot
    }

    pub fn reader(&self) -> TelemetryReader {
        TelemetryReader {
            cell: self.cell.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryReader {
    cell: Arc<TelemetryCell>,
}

impl TelemetryReader {
    /// Starts publishing, e.g. when an editor window opens.
    pub fn attach(&self) {
        log::debug!(target: "lfo::telemetry", "Telemetry observer attached");
        self.cell.is_observed.store(true, Relaxed);
    }

    pub fn detach(&self) {
        log::debug!(target: "lfo::telemetry", "Telemetry observer detached");
        self.cell.is_observed.store(false, Relaxed);
    }

    /// Latest consistent snapshot, or None if the writer kept it busy.
    pub fn read(&self) -> Option<TelemetrySnapshot> {
        self.cell.read()
    }
}
