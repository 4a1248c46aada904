//! Tracing subscriber setup for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! caller's choice.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How chatty the binary should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only.
    Quiet,
    /// `RUST_LOG` if set, otherwise info.
    #[default]
    Normal,
    /// Per-file debug events.
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Verbosity::Verbose,
            (false, true) => Verbosity::Quiet,
            (false, false) => Verbosity::Normal,
        }
    }

    /// Filter directive used when the flags decide the level.
    pub fn directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "codebase_analyzer=warn",
            Verbosity::Normal => "codebase_analyzer=info",
            Verbosity::Verbose => "codebase_analyzer=debug",
        }
    }
}

fn env_filter(verbosity: Verbosity) -> EnvFilter {
    match verbosity {
        Verbosity::Normal => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| verbosity.directive().into())
        }
        _ => verbosity.directive().into(),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean.
pub fn init(verbosity: Verbosity) {
    tracing_subscriber::registry()
        .with(env_filter(verbosity))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
