//! Write a picstruct v1 index for a clip.

use anyhow::Context;
use clap::Args;
use console::style;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use transcode_core::Rational;
use transcode_picstruct::{
    read_timings, write_index, FieldMode, PicStructIndexer, RateConverter, TimingConfig,
    VideoCodingFormat,
};

/// Index summary for display.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    /// Timing listing read.
    pub timings: String,
    /// Index file written.
    pub output: String,
    /// Frames indexed.
    pub frames: u64,
    /// Pattern regimes entered.
    pub regimes: u64,
    /// Elapsed time in seconds.
    pub elapsed_seconds: f64,
}

/// Assign picture structures to every frame of a timing listing.
#[derive(Args, Debug)]
pub struct CmdIndex {
    /// Container frame rate (e.g. 30000/1001 or 25).
    #[arg(long)]
    pub fps: Rational,

    /// Per-frame timing listing: `dur_num dur_den field_mode [prefer_progressive]`.
    #[arg(long)]
    pub timings: PathBuf,

    /// Output picstruct file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Container field mode (p, bff, tff or 0/1/2).
    #[arg(long, default_value = "tff")]
    pub field_mode: FieldMode,

    /// Pair off 3-field structures ahead of progressive frames.
    #[arg(long)]
    pub ensure_even_field_count: bool,

    /// Reject patterns the bitstream format cannot signal (h264, h265).
    #[arg(long)]
    pub codec: Option<VideoCodingFormat>,

    /// Overwrite the output file if it exists.
    #[arg(short = 'y', long)]
    pub overwrite: bool,

    /// Output the summary in JSON format.
    #[arg(long)]
    pub json: bool,
}

impl CmdIndex {
    /// Execute the index command.
    pub fn run(&self) -> anyhow::Result<()> {
        let summary = self.execute()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "{} {} frames, {} regime(s) in {:.2}s",
                style("Indexed").green().bold(),
                summary.frames,
                summary.regimes,
                summary.elapsed_seconds
            );
            println!(
                "{} {}",
                style("Output saved to:").white(),
                style(&summary.output).green().bold()
            );
        }
        Ok(())
    }

    fn execute(&self) -> anyhow::Result<IndexSummary> {
        if !self.timings.exists() {
            anyhow::bail!("File not found: {}", self.timings.display());
        }
        if self.output.exists() && !self.overwrite {
            anyhow::bail!(
                "Output file exists: {} (use -y to overwrite)",
                self.output.display()
            );
        }

        let start = Instant::now();
        let config = TimingConfig::new(self.fps, self.field_mode)
            .with_even_field_count(self.ensure_even_field_count);
        let mut indexer = PicStructIndexer::new(RateConverter::new(config)?);
        if let Some(codec) = self.codec {
            indexer = indexer.with_format(codec);
        }

        let input = File::open(&self.timings)
            .with_context(|| format!("Failed to open {}", self.timings.display()))?;
        let timings = read_timings(BufReader::new(input))
            .with_context(|| format!("Failed to read timings from {}", self.timings.display()))?;
        info!(frames = timings.len(), "read frame timings");

        let output = File::create(&self.output)
            .with_context(|| format!("Failed to create {}", self.output.display()))?;
        write_index(&mut indexer, timings, BufWriter::new(output)).with_context(|| {
            format!(
                "Indexing stopped at frame {}",
                indexer.frames_indexed()
            )
        })?;

        Ok(IndexSummary {
            timings: self.timings.display().to_string(),
            output: self.output.display().to_string(),
            frames: indexer.frames_indexed(),
            regimes: indexer.regime_count(),
            elapsed_seconds: start.elapsed().as_secs_f64(),
        })
    }
}
