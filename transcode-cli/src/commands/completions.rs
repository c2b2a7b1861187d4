//! Shell completion generation command.

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io::{self, Write};

/// Generate shell completions.
#[derive(Args, Debug)]
pub struct CmdCompletions {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CmdCompletions {
    /// Execute the completions command.
    pub fn run<C: CommandFactory>(&self) -> anyhow::Result<()> {
        self.write::<C>(&mut io::stdout())
    }

    fn write<C: CommandFactory>(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let mut cmd = C::command();
        generate(self.shell, &mut cmd, "transcode-picstruct", out);
        Ok(())
    }
}
