use std::process::ExitCode;

use colored::Colorize;
use genform::cli::CommandLineInterface;
use tracing::Level;

fn init_tracing(level: Level, color: bool) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(color)
        .with_target(false)
        .init();
}

fn run(command_line_interface: &CommandLineInterface) -> anyhow::Result<()> {
    let settings = command_line_interface.settings()?;
    init_tracing(command_line_interface.log_level(&settings)?, settings.output.color);
    command_line_interface.run(&settings)
}

fn main() -> ExitCode {
    let command_line_interface = CommandLineInterface::load();
    match run(&command_line_interface) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
