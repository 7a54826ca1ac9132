//! maskvault - Local-first mask-driven note routing for PARA-style vaults

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = maskvault::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
