use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::io::Write;
use undulate_types::waveform::Waveform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header row followed by one row per frame
    Csv,
    /// One JSON object per frame
    Jsonl,
}

/// One rendered frame, keyed by waveform name in the order they were requested.
struct FrameRecord<'a> {
    frame: u64,
    waveforms: &'a [Waveform],
    values: &'a [f32],
}

impl Serialize for FrameRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("frame", &self.frame)?;
        for (waveform, value) in self.waveforms.iter().zip(self.values) {
            map.serialize_entry(waveform, value)?;
        }
        map.end()
    }
}

pub struct FrameWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    waveforms: Vec<Waveform>,
    frames_written: u64,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(writer: W, format: OutputFormat, waveforms: &[Waveform]) -> Self {
        Self {
            writer,
            format,
            waveforms: waveforms.to_vec(),
            frames_written: 0,
        }
    }

    pub fn channels(&self) -> usize {
        self.waveforms.len()
    }

    pub fn write_header(&mut self) -> Result<()> {
        if self.format == OutputFormat::Csv {
            write!(self.writer, "frame")?;
            for waveform in &self.waveforms {
                write!(self.writer, ",{waveform}")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    /// `values` holds one sample per requested waveform.
    pub fn write_frame(&mut self, values: &[f32]) -> Result<()> {
        match self.format {
            OutputFormat::Csv => {
                write!(self.writer, "{}", self.frames_written)?;
                for value in values {
                    write!(self.writer, ",{value:.6}")?;
                }
                writeln!(self.writer)?;
            }
            OutputFormat::Jsonl => {
                let record = FrameRecord {
                    frame: self.frames_written,
                    waveforms: &self.waveforms,
                    values,
                };
                serde_json::to_writer(&mut self.writer, &record)?;
                writeln!(self.writer)?;
            }
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Writes every whole frame in an interleaved sample slice.
    pub fn write_interleaved(&mut self, samples: &[f32]) -> Result<()> {
        for frame in samples.chunks_exact(self.channels()) {
            self.write_frame(frame)?;
        }
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
