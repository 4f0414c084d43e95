mod args;
mod host;
mod observer;
mod output;
mod render;

use crate::args::Args;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Starting Undulate");

    let settings = Args::parse().into_settings()?;

    let writer: Box<dyn Write> = match &settings.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Could not create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let (summary, observer) = render::render(&settings, writer)?;

    log::info!("Render summary: {}", serde_json::to_string(&summary)?);
    if let Some(observer) = observer {
        log::info!("Telemetry observer: {}", serde_json::to_string(&observer)?);
    }

    Ok(())
}
