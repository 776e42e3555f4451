mod args;
mod logger;

use std::process::ExitCode;

fn main() -> ExitCode {
    args::run()
}
