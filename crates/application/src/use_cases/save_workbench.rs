//! Save workbench use case

use tracing::debug;

use crate::error::ApplicationResult;
use crate::ports::SnapshotRepository;
use crate::workbench::EnvironmentWorkbench;

/// Writes the committed environments and selection back to the store.
///
/// Open drafts are not part of the snapshot.
pub struct SaveWorkbench<R> {
    repository: R,
}

impl<R: SnapshotRepository> SaveWorkbench<R> {
    /// Creates a new `SaveWorkbench` use case.
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub async fn execute(&self, workbench: &EnvironmentWorkbench) -> ApplicationResult<()> {
        let snapshot = workbench.snapshot();
        self.repository.save(&snapshot).await?;
        debug!(revision = workbench.revision(), "Saved snapshot");
        Ok(())
    }
}
