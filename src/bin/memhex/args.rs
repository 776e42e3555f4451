//! `memhex` command line.
//!
//! ```text
//! memhex [-v|-q] init [PATH]
//! memhex [-v|-q] reference PATH
//! memhex [-v|-q] list [--arch A] [--test T] [--root DIR] [FILTER]
//! ```

mod error;
mod execute;
mod types;

use std::process::ExitCode;

use log::LevelFilter;

pub use types::Args;

use crate::logger;

pub fn run() -> ExitCode {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let level = if args.quiet {
        LevelFilter::Error
    } else if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = logger::init(level) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match args.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
