//! Application use cases (persistence orchestration around the workbench).

mod load_workbench;
mod save_workbench;

pub use load_workbench::LoadWorkbench;
pub use save_workbench::SaveWorkbench;
