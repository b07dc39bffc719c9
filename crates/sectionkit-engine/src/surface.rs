//! Boundary to the scrollable list that actually draws rows.
//!
//! The engine never decides how a row looks. It tells a [`RenderSurface`]
//! which reuse kinds exist, which structural edits to apply, and where to
//! scroll; the surface hands back cells that the engine configures with
//! their view-model.

use serde::{Deserialize, Serialize};

use crate::capability::ItemViewModel;
use crate::models::IndexPath;
use crate::reconcile::EditScript;
use crate::snapshot::Snapshot;

/// Where a surface materializes cells for a reuse identifier from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellSource {
    /// A cell class registered under this name
    Class(&'static str),
    /// A resource named after the reuse identifier
    Resource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReuseKind {
    pub identifier: String,
    pub source: CellSource,
}

impl ReuseKind {
    pub fn of(view_model: &dyn ItemViewModel) -> Self {
        let source = match view_model.cell_class() {
            Some(class) => CellSource::Class(class),
            None => CellSource::Resource,
        };
        Self {
            identifier: view_model.reuse_identifier().to_string(),
            source,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("no cell resource named \"{identifier}\" was found")]
    ResourceNotFound { identifier: String },
    #[error("cell class \"{class}\" is not known for \"{identifier}\"")]
    UnknownClass {
        identifier: String,
        class: &'static str,
    },
}

/// Animation style for inserted and deleted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAnimation {
    #[default]
    Automatic,
    Fade,
    Left,
    Right,
    Top,
    Bottom,
    Middle,
    None,
}

/// How a surface should present one committed edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub animation: RowAnimation,
    pub animated: bool,
}

impl Transition {
    pub fn animated(animation: RowAnimation) -> Self {
        Self {
            animation,
            animated: true,
        }
    }

    pub fn immediate() -> Self {
        Self {
            animation: RowAnimation::None,
            animated: false,
        }
    }
}

/// Where a row ends up in the viewport after a programmatic scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPosition {
    #[default]
    None,
    Top,
    Middle,
    Bottom,
}

/// A reusable visual that can display one view-model.
pub trait ConfigurableCell {
    fn configure(&mut self, view_model: &dyn ItemViewModel);
}

/// The scrollable list the engine drives.
///
/// All methods are called from the context that owns the
/// [`DataSource`](crate::DataSource).
pub trait RenderSurface {
    type Cell: ConfigurableCell;

    /// Make `kind` dequeueable. Called once per identifier per surface.
    fn register_reusable(&mut self, kind: &ReuseKind) -> Result<(), RegistrationError>;

    fn dequeue_reusable(&mut self, identifier: &str) -> Option<Self::Cell>;

    /// Apply a non-empty edit script atomically. `snapshot` is the state
    /// after the script and is where inserted rows are read from. Returning
    /// means the edit has settled.
    fn apply(&mut self, script: &EditScript, snapshot: &Snapshot, transition: Transition);

    /// Re-query heights and content for `snapshot` without structural changes
    fn refresh(&mut self, snapshot: &Snapshot);

    fn deselect_row(&mut self, at: IndexPath, animated: bool);

    fn scroll_to_offset(&mut self, offset: f64, animated: bool);

    fn scroll_to_row(&mut self, at: IndexPath, position: ScrollPosition, animated: bool);
}
