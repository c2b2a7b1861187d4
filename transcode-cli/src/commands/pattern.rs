//! Compute a picture structure cycle.

use clap::Args;
use console::style;
use serde::Serialize;
use transcode_core::Rational;
use transcode_picstruct::{
    CyclicPattern, FieldMode, PicStruct, RateConverter, TimingConfig, VideoCodingFormat,
};

/// Pattern report for display.
#[derive(Debug, Clone, Serialize)]
pub struct PatternReport {
    /// Container frame rate.
    pub container_rate: String,
    /// Clip frame rate.
    pub clip_rate: String,
    /// Container / clip ratio.
    pub ratio: String,
    /// Field mode used for the clip.
    pub field_mode: FieldMode,
    /// Cycle length in output frames.
    pub cycle_length: usize,
    /// Field periods per cycle.
    pub fields_per_cycle: u32,
    /// One cycle of codes.
    pub codes: Vec<PicStruct>,
    /// Abbreviated cycle.
    pub abbreviated: String,
    /// Codes returned by successive advances, if requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<PicStruct>,
}

/// Compute the picture structure cycle for a clip in a container.
#[derive(Args, Debug)]
pub struct CmdPattern {
    /// Container frame rate (e.g. 30000/1001 or 25).
    #[arg(long)]
    pub fps: Rational,

    /// Clip frame rate.
    #[arg(long)]
    pub clip_fps: Rational,

    /// Container field mode (p, bff, tff or 0/1/2).
    #[arg(long, default_value = "tff")]
    pub field_mode: FieldMode,

    /// Clip field mode, if it differs from the container's.
    #[arg(long = "override")]
    pub override_mode: Option<FieldMode>,

    /// Prefer whole-frame repeats for progressive clips.
    #[arg(long)]
    pub prefer_progressive: bool,

    /// Pair off 3-field structures ahead of progressive frames.
    #[arg(long)]
    pub ensure_even_field_count: bool,

    /// Also print the first N codes returned while stepping the cycle.
    #[arg(long, default_value = "0")]
    pub steps: usize,

    /// Check the cycle against a bitstream format (h264, h265).
    #[arg(long)]
    pub codec: Option<VideoCodingFormat>,

    /// Output in JSON format.
    #[arg(long)]
    pub json: bool,
}

impl CmdPattern {
    /// Execute the pattern command.
    pub fn run(&self) -> anyhow::Result<()> {
        let report = self.compute()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }

    fn config(&self) -> TimingConfig {
        TimingConfig::new(self.fps, self.field_mode)
            .with_even_field_count(self.ensure_even_field_count)
    }

    /// Clip field mode: the override, or the container's own.
    fn clip_mode(&self) -> FieldMode {
        self.override_mode.unwrap_or(self.field_mode)
    }

    fn compute(&self) -> anyhow::Result<PatternReport> {
        let converter = RateConverter::new(self.config())?;
        let ratio = converter.ratio(self.clip_fps)?;
        let mut pattern =
            converter.determine_pattern(self.clip_fps, self.clip_mode(), self.prefer_progressive)?;
        if let Some(codec) = self.codec {
            pattern.check_format(codec)?;
        }

        Ok(build_report(
            &mut pattern,
            converter.container_rate(),
            self.clip_fps.reduce(),
            ratio,
            self.clip_mode(),
            self.steps,
        ))
    }
}

fn build_report(
    pattern: &mut CyclicPattern,
    container: Rational,
    clip: Rational,
    ratio: Rational,
    field_mode: FieldMode,
    steps: usize,
) -> PatternReport {
    PatternReport {
        container_rate: container.to_string(),
        clip_rate: clip.to_string(),
        ratio: ratio.to_string(),
        field_mode,
        cycle_length: pattern.len(),
        fields_per_cycle: pattern.fields_per_cycle(),
        codes: pattern.codes().to_vec(),
        abbreviated: pattern.abbreviated(),
        steps: pattern.by_ref().take(steps).collect(),
    }
}

fn print_report(report: &PatternReport) {
    println!();
    println!(
        "{} {} {} {}",
        style("Pattern").cyan().bold(),
        style(&report.clip_rate).yellow(),
        style("in").dim(),
        style(&report.container_rate).yellow()
    );
    println!();
    println!("  {:<18} {}", style("Ratio:").white(), report.ratio);
    println!("  {:<18} {}", style("Field mode:").white(), report.field_mode);
    println!("  {:<18} {} frames", style("Cycle length:").white(), report.cycle_length);
    println!("  {:<18} {}", style("Fields per cycle:").white(), report.fields_per_cycle);
    println!("  {:<18} {}", style("Cycle:").white(), style(&report.abbreviated).green());

    if !report.steps.is_empty() {
        println!();
        println!("{}", style("Steps").cyan().bold());
        for (i, code) in report.steps.iter().enumerate() {
            println!(
                "  {:>5}  {:<4} {}",
                i,
                style(code.abbreviation()).yellow(),
                code
            );
        }
    }
    println!();
}
