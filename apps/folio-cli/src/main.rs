//! # Folio Terminal Cart
//!
//! Entry point for the `folio` binary. Setup and the session loop live in
//! `lib.rs` so they can be tested without a terminal.

use std::process::ExitCode;

use clap::Parser;
use folio_cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match folio_cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("folio: {}", e);
            ExitCode::FAILURE
        }
    }
}
