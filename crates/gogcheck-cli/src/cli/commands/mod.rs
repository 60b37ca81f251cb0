//! Subcommand implementations.

mod dump;
mod verify;

pub use dump::run_dump_md5sums;
pub use verify::run_verify;

use std::fmt::Display;

/// Console gated by the quiet flag. Report lines go to stdout, error
/// summaries to stderr; quiet drops both without touching the exit status.
pub(crate) struct Console {
    quiet: bool,
}

impl Console {
    pub(crate) fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub(crate) fn out(&self, msg: impl Display) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    pub(crate) fn err(&self, msg: impl Display) {
        if !self.quiet {
            eprintln!("{msg}");
        }
    }
}
