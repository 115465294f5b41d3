//! Environment and variable domain types

mod draft;
mod registry;
mod resolution;
mod scope;
mod selection;
mod session;
mod variable;

pub use draft::{DEFAULT_INDENT, parse_variables, serialize_variables};
pub use registry::EnvironmentRegistry;
pub use resolution::{PrecedenceResolver, ResolvedVariable, ResolvedVariables, merge_environments};
pub use scope::{CollectionId, EnvironmentId, Scope, ScopeKey};
pub use selection::{ActiveEnvironments, ActiveSelectionTracker};
pub use session::{EditSession, ExternalChange};
pub use variable::{Environment, VariableMap, VariableValue, variables_equal};
