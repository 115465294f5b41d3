//! Command line interface using clap derive.
//!
//! ```text
//! envscope [--state FILE] [--settings FILE] <command>
//! list [--collection ID]
//! resolve [--collection ID] [--unsaved] [--provenance]
//! set-active [--collection ID] <ENV_ID | --none>
//! commit [--collection ID] --draft FILE
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use envscope_domain::{EnvironmentId, RequestContext, ScopeKey};
use envscope_infrastructure::DEFAULT_SNAPSHOT_FILE;

/// Request id used for the request context the CLI acts in.
pub const CLI_REQUEST_ID: &str = "cli";

/// Resolve and edit scoped request environments.
#[derive(Debug, Parser)]
#[command(name = "envscope", author, version, about)]
pub struct Cli {
    /// Snapshot file holding environments and active selections
    #[arg(long, env = "ENVSCOPE_STATE", default_value = DEFAULT_SNAPSHOT_FILE, global = true)]
    pub state: PathBuf,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, env = "ENVSCOPE_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lists the environments of a scope, marking the active one.
    List(ScopeArgs),

    /// Prints the effective variables as JSON.
    Resolve(ResolveArgs),

    /// Changes the active environment of a scope.
    #[command(name = "set-active")]
    SetActive(SetActiveArgs),

    /// Replaces the variables of the active environment with a JSON draft.
    Commit(CommitArgs),
}

/// Scope selection shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct ScopeArgs {
    /// Collection id; the workspace scope when omitted
    #[arg(long, short = 'c', value_name = "ID")]
    pub collection: Option<String>,
}

impl ScopeArgs {
    /// Returns the scope key the command acts on.
    #[must_use]
    pub fn key(&self) -> ScopeKey {
        self.collection
            .as_deref()
            .map_or(ScopeKey::Workspace, ScopeKey::collection)
    }

    /// Returns a saved request context in the selected collection.
    #[must_use]
    pub fn context(&self) -> RequestContext {
        match &self.collection {
            Some(collection) => RequestContext::saved_in(CLI_REQUEST_ID, collection.as_str()),
            None => RequestContext::unsaved(CLI_REQUEST_ID),
        }
    }
}

/// Arguments of `resolve`.
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Scope the command acts on
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Resolve as if the request were not saved yet
    #[arg(long)]
    pub unsaved: bool,

    /// Print the scope each value came from
    #[arg(long)]
    pub provenance: bool,
}

impl ResolveArgs {
    /// Returns the request context to resolve for.
    #[must_use]
    pub fn context(&self) -> RequestContext {
        self.scope.context().with_saved(!self.unsaved)
    }
}

/// Arguments of `set-active`.
#[derive(Debug, Clone, Args)]
pub struct SetActiveArgs {
    /// Scope the command acts on
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Environment to activate
    #[arg(value_name = "ENV_ID", required_unless_present = "none", conflicts_with = "none")]
    pub environment: Option<String>,

    /// Clear the selection instead
    #[arg(long)]
    pub none: bool,
}

impl SetActiveArgs {
    /// Returns the new selection, `None` to clear.
    #[must_use]
    pub fn selection(&self) -> Option<EnvironmentId> {
        if self.none {
            return None;
        }
        self.environment.as_deref().map(EnvironmentId::from)
    }
}

/// Arguments of `commit`.
#[derive(Debug, Clone, Args)]
pub struct CommitArgs {
    /// Scope the command acts on
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// File holding the JSON object of variables
    #[arg(long, value_name = "FILE")]
    pub draft: PathBuf,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
