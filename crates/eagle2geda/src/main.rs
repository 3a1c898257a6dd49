use std::io::{self, Read, Write};
use std::panic;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use eagle::{EagleError, LengthUnit};
use env_logger::Env;

/// Exit statuses, one per failure category.
mod status {
    pub const HELP: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const MALFORMED_INPUT: u8 = 3;
    pub const IO: u8 = 4;
    pub const INTERNAL: u8 = 5;
}

#[derive(Parser, Debug)]
#[command(name = "eagle2geda")]
#[command(
    about = "Convert an EAGLE XML board read from stdin into a gEDA pcb layout on stdout",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Linear unit of the coordinates in the input
    #[arg(short, long, value_enum, default_value_t = UnitArg::Mm)]
    units: UnitArg,

    /// Layout name written to the PCB header
    #[arg(short, long, default_value = "")]
    name: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum UnitArg {
    Mm,
    Mil,
}

impl From<UnitArg> for LengthUnit {
    fn from(units: UnitArg) -> Self {
        match units {
            UnitArg::Mm => LengthUnit::Millimeter,
            UnitArg::Mil => LengthUnit::Mil,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return ExitCode::from(cli_error_status(err.kind(), err.print())),
    };

    // Initialize logger with default level (overridden by RUST_LOG)
    let env = Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();

    match panic::catch_unwind(|| run(&cli)) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            eprintln!("{} {err:#}", "Error:".red());
            ExitCode::from(exit_status(&err))
        }
        Err(_) => {
            eprintln!("{} internal failure", "Error:".red());
            ExitCode::from(status::INTERNAL)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut xml = String::new();
    io::stdin()
        .read_to_string(&mut xml)
        .context("Failed to read board from stdin")?;

    let layout = eagle2geda::translate(&xml, cli.units.into(), &cli.name)
        .context("Failed to convert EAGLE board")?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(layout.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write layout to stdout")?;
    Ok(())
}

/// Status for a clap error after printing it. Failing to print is an I/O failure.
fn cli_error_status(kind: ErrorKind, printed: io::Result<()>) -> u8 {
    if let Err(err) = printed {
        eprintln!("{} {err}", "Error:".red());
        return status::IO;
    }
    match kind {
        ErrorKind::DisplayHelp => status::HELP,
        ErrorKind::DisplayVersion => 0,
        _ => status::USAGE,
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if cause.is::<EagleError>() {
            return status::MALFORMED_INPUT;
        }
        if cause.is::<io::Error>() {
            return status::IO;
        }
    }
    status::INTERNAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_status() {
        assert_eq!(cli_error_status(ErrorKind::DisplayHelp, Ok(())), status::HELP);
        assert_eq!(cli_error_status(ErrorKind::DisplayVersion, Ok(())), 0);
        assert_eq!(cli_error_status(ErrorKind::InvalidValue, Ok(())), status::USAGE);

        let closed = Err(io::Error::from(io::ErrorKind::BrokenPipe));
        assert_eq!(cli_error_status(ErrorKind::DisplayHelp, closed), status::IO);
    }

    #[test]
    fn test_exit_status_follows_the_cause() {
        let malformed = anyhow::Error::new(EagleError::UnknownEntity("nbsp".to_string()))
            .context("Failed to convert EAGLE board");
        assert_eq!(exit_status(&malformed), status::MALFORMED_INPUT);

        let io = anyhow::Error::new(io::Error::from(io::ErrorKind::UnexpectedEof))
            .context("Failed to read board from stdin");
        assert_eq!(exit_status(&io), status::IO);

        assert_eq!(exit_status(&anyhow::anyhow!("unexpected")), status::INTERNAL);
    }
}
