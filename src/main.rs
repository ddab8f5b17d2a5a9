//! nest - nested task lists from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = nestlist::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
