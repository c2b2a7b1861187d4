//! Transcode picture structure CLI - pulldown patterns and picstruct indexes.

mod commands;

use clap::{Parser, Subcommand};
use commands::{CmdCompletions, CmdIndex, CmdPattern, CmdPresets};

/// Output mode for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    /// Normal output with info logging.
    Normal,
    /// JSON output for programmatic parsing.
    Json,
    /// Quiet mode with minimal output.
    Quiet,
    /// Verbose mode with debug logging.
    Verbose,
}

/// Command-line arguments for the transcode-picstruct tool.
#[derive(Parser, Debug)]
#[command(name = "transcode-picstruct")]
#[command(version)]
#[command(about = "Pulldown picture structure patterns for fixed-rate containers")]
#[command(long_about = "Computes the picture structure (pic_struct) codes that let a clip \n\
    play at its own rate inside a fixed-rate container, and writes per-frame \n\
    picstruct index files.\n\n\
    EXAMPLES:\n    \
    transcode-picstruct pattern --fps 30000/1001 --clip-fps 24000/1001\n    \
    transcode-picstruct pattern --fps 25 --clip-fps 24 --steps 24 --json\n    \
    transcode-picstruct index --fps 30000/1001 --timings clip.txt -o clip.picstruct\n    \
    transcode-picstruct presets --show pulldown-32")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet mode (no logging)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the picture structure cycle for a clip
    Pattern(CmdPattern),
    /// Write a picstruct v1 index from per-frame timings
    Index(CmdIndex),
    /// List canned telecine patterns
    Presets(CmdPresets),
    /// Generate shell completions
    Completions(CmdCompletions),
}

impl Commands {
    /// Whether stdout carries machine-readable output only.
    fn machine_output(&self) -> bool {
        match self {
            Commands::Pattern(cmd) => cmd.json,
            Commands::Index(cmd) => cmd.json,
            Commands::Presets(cmd) => cmd.json,
            Commands::Completions(_) => true,
        }
    }
}

impl Cli {
    /// Determine the output mode based on flags.
    fn output_mode(&self) -> OutputMode {
        if self.command.machine_output() {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let output_mode = cli.output_mode();

    // Initialize logging (not in JSON or quiet mode)
    if output_mode != OutputMode::Json && output_mode != OutputMode::Quiet {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(if output_mode == OutputMode::Verbose {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            })
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    match &cli.command {
        Commands::Pattern(cmd) => cmd.run(),
        Commands::Index(cmd) => cmd.run(),
        Commands::Presets(cmd) => cmd.run(),
        Commands::Completions(cmd) => cmd.run::<Cli>(),
    }
}
