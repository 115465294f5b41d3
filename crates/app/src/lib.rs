//! envscope - command line front end for the environment workbench
//!
//! Wires the snapshot file, settings and tracing around
//! [`EnvironmentWorkbench`](envscope_application::EnvironmentWorkbench).

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::{Cli, Command};
pub use commands::{CommandError, run};
