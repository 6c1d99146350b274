//! chrs - command-line front end for chrsmith

use std::process::ExitCode;

use chrsmith::cli;

fn main() -> ExitCode {
    cli::run()
}
