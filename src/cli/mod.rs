//! CLI module - argument parsing and the command runners

mod args;
pub mod correlate;
pub mod encode;
pub mod legend;
pub mod regress;

pub use args::*;
