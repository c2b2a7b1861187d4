//! Show telecine pattern presets command.

use clap::Args;
use console::style;
use serde::Serialize;
use transcode_picstruct::{PicStruct, TelecinePattern};

/// Preset information for display.
#[derive(Debug, Clone, Serialize)]
pub struct PresetInfo {
    /// Preset name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Nominal source frame rate.
    pub source_fps: String,
    /// Nominal container frame rate.
    pub target_fps: String,
    /// Whether the cycle repeats whole frames.
    pub progressive: bool,
    /// One cycle of codes.
    pub codes: Vec<PicStruct>,
    /// Abbreviated cycle.
    pub abbreviated: String,
}

impl From<TelecinePattern> for PresetInfo {
    fn from(preset: TelecinePattern) -> Self {
        let pattern = preset.pattern();
        Self {
            name: preset.name().to_string(),
            description: describe(preset).to_string(),
            source_fps: preset.source_fps().to_string(),
            target_fps: preset.target_fps().to_string(),
            progressive: preset.is_progressive(),
            codes: pattern.codes().to_vec(),
            abbreviated: pattern.abbreviated(),
        }
    }
}

/// Show telecine pattern presets.
#[derive(Args, Debug)]
pub struct CmdPresets {
    /// Show detailed info for a specific preset.
    #[arg(long)]
    pub show: Option<String>,

    /// Output in JSON format.
    #[arg(long)]
    pub json: bool,
}

impl CmdPresets {
    /// Execute the presets command.
    pub fn run(&self) -> anyhow::Result<()> {
        let presets = get_available_presets();

        if let Some(ref name) = self.show {
            let preset: TelecinePattern = match name.parse() {
                Ok(preset) => preset,
                Err(_) => anyhow::bail!(
                    "Unknown preset: {}. Run 'transcode-picstruct presets' to see available presets.",
                    name
                ),
            };
            let info = PresetInfo::from(preset);
            if self.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_preset_details(&info);
            }
        } else if self.json {
            let output = serde_json::json!({
                "presets": presets
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!();
            println!("{}", style("Telecine Presets").cyan().bold());
            println!();
            println!(
                "{:<16} {:<12} {:<12} {}",
                style("NAME").white().bold(),
                style("SOURCE").white().bold(),
                style("TARGET").white().bold(),
                style("DESCRIPTION").white().bold()
            );
            println!("{}", style("-".repeat(70)).dim());

            for preset in &presets {
                println!(
                    "{:<16} {:<12} {:<12} {}",
                    style(&preset.name).yellow(),
                    preset.source_fps,
                    preset.target_fps,
                    preset.description
                );
            }

            println!();
            println!(
                "Use {} to see details for a specific preset.",
                style("--show <preset>").cyan()
            );
        }

        Ok(())
    }
}

fn print_preset_details(preset: &PresetInfo) {
    println!();
    println!(
        "{}: {}",
        style("Preset").cyan().bold(),
        style(&preset.name).yellow()
    );
    println!();
    println!("  {:<16} {}", style("Description:").white(), preset.description);
    println!("  {:<16} {}", style("Source fps:").white(), preset.source_fps);
    println!("  {:<16} {}", style("Target fps:").white(), preset.target_fps);
    println!(
        "  {:<16} {}",
        style("Repeats:").white(),
        if preset.progressive { "frames" } else { "fields" }
    );
    println!("  {:<16} {}", style("Cycle:").white(), style(&preset.abbreviated).green());
    println!();
}

fn describe(preset: TelecinePattern) -> &'static str {
    match preset {
        TelecinePattern::Pulldown32 => "NTSC film telecine",
        TelecinePattern::Pulldown64 => "Film in a 59.94p stream",
        TelecinePattern::SoftDoubling => "Every frame shown twice",
        TelecinePattern::SoftTripling => "Every frame shown three times",
        TelecinePattern::EuroPulldown => "24p film in a 25i stream",
        TelecinePattern::Pulldown22 => "Progressive segmented frame",
    }
}

/// Get available telecine presets.
fn get_available_presets() -> Vec<PresetInfo> {
    TelecinePattern::ALL.into_iter().map(PresetInfo::from).collect()
}
