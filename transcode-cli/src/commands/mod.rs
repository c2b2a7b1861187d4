//! CLI subcommand implementations.

pub mod completions;
pub mod index;
pub mod pattern;
pub mod presets;

pub use completions::CmdCompletions;
pub use index::CmdIndex;
pub use pattern::CmdPattern;
pub use presets::CmdPresets;
