//! # orgv
//!
//! Thin CLI client over the `orgvault` library. The binary only invokes
//! [`cli::run`] and handles process termination; everything user-facing
//! (argument parsing, dispatch, rendering) lives in `src/cli/`, and
//! everything from the library's API facade inward is UI-agnostic.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
