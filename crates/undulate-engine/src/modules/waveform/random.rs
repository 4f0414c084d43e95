use undulate_types::defaults::Defaults;

pub trait RandomSource {
    /// Uniformly distributed value in [-1, 1].
    fn next_bipolar(&mut self) -> f32;
}

#[derive(Debug, Default)]
pub struct ThreadRandom {}

impl ThreadRandom {
    pub fn new() -> Self {
        log::debug!(target: "lfo::waveform", shape = "Random"; "Constructing random source");
        Self {}
    }
}

impl RandomSource for ThreadRandom {
    fn next_bipolar(&mut self) -> f32 {
        rand::random_range(-1.0..=1.0)
    }
}

/// Stepped noise: a fixed number of random targets per block joined by
/// straight lines. Segment lengths differ by at most one sample when the
/// block does not divide evenly. Each segment starts where the previous one
/// ended, so the line stays continuous across block boundaries.
#[derive(Debug, Default)]
pub struct RandomWalk {
    segments: usize,
    block_length: usize,
    segment_start: usize,
    segment_end: usize,
    segment_start_value: f32,
    segment_target: f32,
    slope: f32,
}

impl RandomWalk {
    pub fn new() -> Self {
        Self {
            segments: 1,
            block_length: 1,
            ..Default::default()
        }
    }

    pub fn begin_block(&mut self, block_length: usize) {
        self.block_length = block_length.max(1);
        self.segments = block_length.clamp(1, Defaults::RANDOM_SEGMENTS_PER_BLOCK);
        self.segment_end = 0;
    }

    /// Must be called for every index of the block in order, starting at 0.
    pub fn sample<R: RandomSource + ?Sized>(&mut self, index: usize, source: &mut R) -> f32 {
        if index >= self.segment_end {
            let segment = index * self.segments / self.block_length;
            self.segment_start = index;
            self.segment_end = ((segment + 1) * self.block_length).div_ceil(self.segments);
            self.segment_start_value = self.segment_target;
            self.segment_target = source.next_bipolar().clamp(-1.0, 1.0);

            let segment_length = self.segment_end.saturating_sub(index).max(1);
            self.slope = (self.segment_target - self.segment_start_value) / segment_length as f32;
        }

        let offset = (index - self.segment_start) as f32;
        (self.segment_start_value + self.slope * offset).clamp(-1.0, 1.0)
    }

    /// The value the next block will start from.
    pub fn carried_value(&self) -> f32 {
        self.segment_target
    }
}
