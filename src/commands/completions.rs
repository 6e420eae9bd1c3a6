use crate::cli::args::Cli;
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::Shell;

pub fn run(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "cpak", &mut std::io::stdout());
    Ok(())
}
