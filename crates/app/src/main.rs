//! Concession storefront CLI

use std::process;

use clap::Parser;

mod cli;

#[tokio::main]
pub async fn main() {
    _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = cli.run().await {
        #[expect(
            clippy::print_stderr,
            reason = "logging may not be initialised, must use eprintln for startup errors"
        )]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }
}
