use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `sg completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `sg` to stdout.
///
/// # Errors
///
/// Never fails today; the signature matches the other command handlers.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout();
    generate(shell, command, "sg", &mut out);
    Ok(())
}
