//! codebase-analyzer CLI entry point.

use clap::Parser;
use codebase_analyzer::cli::{self, Cli, EXIT_FAILURE};
use codebase_analyzer::logging::{self, Verbosity};

fn main() {
    let args = Cli::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    let exit_code = match cli::run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    };

    std::process::exit(exit_code);
}
