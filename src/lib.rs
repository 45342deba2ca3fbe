//! Presenter library exports for testing

use clap::Subcommand;

pub mod core;
pub mod replay;
pub mod runtime;
pub mod tree;
pub mod tui;

#[cfg(test)]
pub mod test_support;

#[derive(Clone, Debug, Default, Subcommand)]
pub enum Mode {
    /// Interactive terminal viewer
    #[default]
    Tui,
    /// Run the nested-dismissal scenario headless, printing JSON transitions
    Replay,
}
