//! Load workbench use case

use envscope_domain::WorkbenchSettings;
use tracing::debug;

use crate::error::ApplicationResult;
use crate::ports::{ExecutionContext, Notifier, SnapshotRepository};
use crate::workbench::EnvironmentWorkbench;

/// Loads the persisted environments and selection into a new workbench.
pub struct LoadWorkbench<R> {
    repository: R,
}

impl<R: SnapshotRepository> LoadWorkbench<R> {
    /// Creates a new `LoadWorkbench` use case.
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be read or holds duplicate ids.
    pub async fn execute(
        &self,
        execution: Box<dyn ExecutionContext>,
        notifier: Box<dyn Notifier>,
        settings: WorkbenchSettings,
    ) -> ApplicationResult<EnvironmentWorkbench> {
        let snapshot = self.repository.load().await?;
        debug!(
            workspace = snapshot.workspace.len(),
            collections = snapshot.collections.len(),
            "Loaded snapshot"
        );
        EnvironmentWorkbench::from_snapshot(snapshot, execution, notifier, settings)
    }
}
