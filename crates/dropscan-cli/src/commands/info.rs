use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dropscan_core::io::open_source;

#[derive(Args)]
pub struct InfoArgs {
    /// Input video file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let source = open_source(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let info = source.info();

    println!("File:        {}", info.filename.display());
    println!("Decoder:     {}", info.decoder);
    println!("Dimensions:  {}x{}", info.width, info.height);
    match info.frame_rate {
        Some(rate) => println!("Frame rate:  {:.3} fps", rate),
        None => println!("Frame rate:  unknown"),
    }
    match info.total_frames {
        Some(total) => println!("Frames:      {}", total),
        None => println!("Frames:      unknown"),
    }
    if let (Some(rate), Some(total)) = (info.frame_rate, info.total_frames) {
        println!("Duration:    {:.2} s", total as f64 / rate);
    }

    Ok(())
}
