//! Imperative shell for the rhstor tools
//!
//! Everything that touches the network, the terminal, or the environment lives
//! here. Decisions are delegated to `rhstor_core`.

pub mod creator;
pub mod display;
pub mod duplicates;
pub mod error;
pub mod jira;
pub mod prelude;
pub mod search;
pub mod stories;
pub mod view;

/// Initialise `env_logger`. `--debug` turns on this crate's debug records
/// unless `RUST_LOG` says otherwise.
pub fn init_logging(debug: bool) {
    let default_filter = if debug { "warn,rhstor=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}
