use std::hash::{Hash, Hasher};

use crate::models::{Item, SectionId};

/// An ordered group of rows with an optional header.
///
/// Value-like: cloning keeps the identity, so a host can edit `items` on its
/// own copy and hand the section back without losing diff continuity.
#[derive(Debug, Clone)]
pub struct Section {
    id: SectionId,
    pub items: Vec<Item>,
    pub header: Option<Item>,
}

impl Section {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            id: SectionId::new(),
            items,
            header: None,
        }
    }

    pub fn with_header(items: Vec<Item>, header: Item) -> Self {
        Self {
            id: SectionId::new(),
            items,
            header: Some(header),
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Header first (if any), then rows in order
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.header.iter().chain(self.items.iter())
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Section {}

impl Hash for Section {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
