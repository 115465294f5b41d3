//! Command execution.
//!
//! Each command loads the snapshot into a fresh workbench, applies one event and,
//! for mutating commands, writes the snapshot back.

use std::io::Write;
use std::path::PathBuf;

use envscope_application::{ApplicationError, EnvironmentWorkbench, LoadWorkbench, SaveWorkbench};
use envscope_domain::{ResolvedVariables, WorkbenchSettings};
use envscope_infrastructure::{
    FileSnapshotRepository, InMemoryExecutionContext, TokioFileSystem, TracingNotifier,
};
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::cli::{Cli, Command, CommitArgs, ResolveArgs, ScopeArgs, SetActiveArgs};

/// Errors reported by the `envscope` binary.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The workbench rejected the operation.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The draft file could not be read.
    #[error("failed to read draft {}: {source}", path.display())]
    Draft {
        /// Draft file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Writing to the output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Encoding the output failed.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

type Repository = FileSnapshotRepository<TokioFileSystem>;

/// Runs a parsed command line, writing results to `out`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or saved, or the command fails.
pub async fn run(
    cli: &Cli,
    settings: WorkbenchSettings,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let repository = FileSnapshotRepository::new(TokioFileSystem::new(), &cli.state);
    let mut workbench = LoadWorkbench::new(repository.clone())
        .execute(
            Box::new(InMemoryExecutionContext::new()),
            Box::new(TracingNotifier::new()),
            settings,
        )
        .await?;

    match &cli.command {
        Command::List(args) => list(&workbench, args, out),
        Command::Resolve(args) => resolve(&workbench, args, out),
        Command::SetActive(args) => set_active(&mut workbench, repository, args, out).await,
        Command::Commit(args) => commit(&mut workbench, repository, args, out).await,
    }
}

fn list(
    workbench: &EnvironmentWorkbench,
    args: &ScopeArgs,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let key = args.key();
    let active = workbench.active(&key);
    for environment in workbench.environments(&key) {
        let marker = if Some(environment.id()) == active { '*' } else { ' ' };
        writeln!(
            out,
            "{marker} {}\t{}\t{} variable(s)",
            environment.id(),
            environment.name(),
            environment.variable_count()
        )?;
    }
    Ok(())
}

fn resolve(
    workbench: &EnvironmentWorkbench,
    args: &ResolveArgs,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let resolved = workbench.resolve_for(&args.context());
    let value = if args.provenance {
        with_provenance(&resolved)
    } else {
        serde_json::to_value(resolved.to_map())?
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

fn with_provenance(resolved: &ResolvedVariables) -> Value {
    let entries: Map<String, Value> = resolved
        .iter()
        .map(|(name, variable)| {
            (
                name.to_string(),
                json!({ "scope": variable.scope, "value": variable.value }),
            )
        })
        .collect();
    Value::Object(entries)
}

async fn set_active(
    workbench: &mut EnvironmentWorkbench,
    repository: Repository,
    args: &SetActiveArgs,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let key = args.scope.key();
    let selection = args.selection();
    if let Some(id) = &selection
        && workbench.registry().find(&key, id).is_err()
    {
        warn!(scope = %key, environment = %id, "Activating an environment that is not registered");
    }

    workbench.set_active(&key, selection);
    SaveWorkbench::new(repository).execute(workbench).await?;

    match workbench.active(&key) {
        Some(id) => writeln!(out, "{key}: {id}")?,
        None => writeln!(out, "{key}: no environment")?,
    }
    Ok(())
}

async fn commit(
    workbench: &mut EnvironmentWorkbench,
    repository: Repository,
    args: &CommitArgs,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let key = args.scope.key();
    let draft = tokio::fs::read_to_string(&args.draft)
        .await
        .map_err(|source| CommandError::Draft {
            path: args.draft.clone(),
            source,
        })?;

    workbench.set_request_context(args.scope.context());
    let target = workbench.open_session(&key)?.target().clone();
    workbench.edit_draft(&key, draft)?;
    let committed = workbench.commit(&key)?;
    SaveWorkbench::new(repository).execute(workbench).await?;

    writeln!(out, "{key}: committed {} variable(s) to {target}", committed.len())?;
    Ok(())
}
