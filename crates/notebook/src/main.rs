//! # notebook CLI
//!
//! A thin shell over `notebookapp`'s API facade. The binary only invokes
//! `cli::run()` and handles process termination; argument parsing lives in
//! `cli/setup.rs`, dispatch in `cli/commands.rs`, and text output in
//! `cli/render.rs`.
//!
//! The library never prints. Everything the user sees is produced here.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
