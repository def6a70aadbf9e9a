//! Command-line interface module.

mod args;
pub mod classify;
pub mod plan;

pub use args::{Cli, ClassifyArgs, Commands, MarkerArg, PlanArgs};
