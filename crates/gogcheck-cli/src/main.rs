use gogcheck_core::logging;

mod cli;

use crate::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize logging as early as possible; fall back to stderr if the
    // state dir is unwritable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    Cli::run_from_args()
}
