use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;

use crate::capability::ItemViewModel;
use crate::models::ItemId;

/// A row or header: a stable identity paired with a shared view-model.
///
/// The view-model is referenced, not owned; the host may keep its own `Arc`.
/// Equality and hashing only look at the identity.
#[derive(Clone)]
pub struct Item {
    id: ItemId,
    view_model: Arc<dyn ItemViewModel>,
}

impl Item {
    pub fn new(view_model: Arc<dyn ItemViewModel>) -> Self {
        Self {
            id: ItemId::new(),
            view_model,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn view_model(&self) -> &Arc<dyn ItemViewModel> {
        &self.view_model
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("reuse_identifier", &self.view_model.reuse_identifier())
            .finish()
    }
}

/// Position-based address of a row. Volatile: only valid for the list state
/// it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

/// Placement relative to an anchor item or section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Before,
    After,
}
