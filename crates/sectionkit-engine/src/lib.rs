pub mod capability;
pub mod data_source;
pub mod edge;
pub mod models;
pub mod reconcile;
pub mod snapshot;
pub mod surface;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use capability::*;
pub use data_source::{
    Completion, DataSource, DataSourceOptions, HeaderTap, HeaderView, ListHandle,
    DEFAULT_EDGE_COMPLETION_OFFSET,
};
pub use edge::*;
pub use models::*;
pub use reconcile::{Edit, EditScript, Layout, LayoutSection, Reconciler, Registry, diff};
pub use snapshot::*;
pub use surface::*;
