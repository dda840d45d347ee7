mod args;

use std::process::ExitCode;

fn main() -> ExitCode {
    args::run()
}
