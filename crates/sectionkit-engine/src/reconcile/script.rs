use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::{IndexPath, ItemId, SectionId};
use crate::snapshot::Snapshot;

/// One primitive structural operation.
///
/// Coordinates follow batch-update semantics: deletions and move sources are
/// indices in the old list, insertions and move targets are indices in the
/// new list, reloads address the new list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    DeleteItem { item: ItemId, at: IndexPath },
    DeleteSection { section: SectionId, at: usize },
    InsertSection { section: SectionId, at: usize },
    InsertItem { item: ItemId, at: IndexPath },
    MoveSection { section: SectionId, from: usize, to: usize },
    MoveItem { item: ItemId, from: IndexPath, to: IndexPath },
    ReloadSection { section: SectionId, at: usize },
    ReloadItem { item: ItemId, at: IndexPath },
}

impl Edit {
    /// Whether the edit changes membership or order (reloads do not)
    pub fn is_structural(&self) -> bool {
        !matches!(self, Edit::ReloadSection { .. } | Edit::ReloadItem { .. })
    }
}

/// Ordered edits transforming one snapshot into the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EditScript {
    edits: Vec<Edit>,
}

impl EditScript {
    pub fn new(edits: Vec<Edit>) -> Self {
        Self { edits }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter()
    }

    pub fn structural_count(&self) -> usize {
        self.edits.iter().filter(|e| e.is_structural()).count()
    }

    /// Apply the script to `old` the way a list surface applies a batch
    /// update: remove deleted and moved-out entries by old coordinates, then
    /// place inserted and moved-in entries by new coordinates in ascending
    /// order. Identities of inserted entries are read from `new`.
    ///
    /// Panics if the script addresses a position that does not exist, which
    /// means the script and the layouts disagree.
    pub fn replay(&self, old: &Layout, new: &Snapshot) -> Layout {
        let mut removed_rows: HashSet<IndexPath> = HashSet::new();
        let mut removed_sections: HashSet<usize> = HashSet::new();
        let mut section_inserts: Vec<(usize, SectionSource)> = Vec::new();
        let mut row_inserts: Vec<IndexPath> = Vec::new();

        for edit in &self.edits {
            match *edit {
                Edit::DeleteItem { at, .. } => {
                    removed_rows.insert(at);
                }
                Edit::DeleteSection { at, .. } => {
                    removed_sections.insert(at);
                }
                Edit::InsertSection { at, .. } => section_inserts.push((at, SectionSource::New)),
                Edit::InsertItem { at, .. } => row_inserts.push(at),
                Edit::MoveSection { section, from, to } => {
                    removed_sections.insert(from);
                    section_inserts.push((to, SectionSource::Moved(section)));
                }
                Edit::MoveItem { from, to, .. } => {
                    removed_rows.insert(from);
                    row_inserts.push(to);
                }
                Edit::ReloadSection { .. } | Edit::ReloadItem { .. } => {}
            }
        }

        let mut kept = Vec::with_capacity(old.sections.len());
        let mut moved: HashMap<SectionId, LayoutSection> = HashMap::new();
        for (index, section) in old.sections.iter().enumerate() {
            let rows = section
                .rows
                .iter()
                .enumerate()
                .filter(|(row, _)| !removed_rows.contains(&IndexPath::new(index, *row)))
                .map(|(_, id)| *id)
                .collect();
            let survivor = LayoutSection {
                id: section.id,
                rows,
            };
            if removed_sections.contains(&index) {
                moved.insert(section.id, survivor);
            } else {
                kept.push(survivor);
            }
        }

        section_inserts.sort_by_key(|(at, _)| *at);
        for (at, source) in section_inserts {
            let section = match source {
                SectionSource::New => {
                    LayoutSection::of(new.section_at(at).unwrap_or_else(|| {
                        panic!("edit script inserts section {at} beyond the new snapshot")
                    }))
                }
                SectionSource::Moved(id) => moved
                    .remove(&id)
                    .unwrap_or_else(|| panic!("edit script moves unknown {id}")),
            };
            kept.insert(at, section);
        }

        row_inserts.sort();
        for at in row_inserts {
            let id = new
                .item_at(at)
                .unwrap_or_else(|| panic!("edit script inserts row {at} beyond the new snapshot"))
                .id();
            kept[at.section].rows.insert(at.row, id);
        }

        Layout { sections: kept }
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

enum SectionSource {
    New,
    Moved(SectionId),
}

/// Identity-only picture of what a surface is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub sections: Vec<LayoutSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSection {
    pub id: SectionId,
    pub rows: Vec<ItemId>,
}

impl LayoutSection {
    fn of(section: &crate::models::Section) -> Self {
        Self {
            id: section.id(),
            rows: section.items.iter().map(|i| i.id()).collect(),
        }
    }
}

impl Layout {
    pub fn of(snapshot: &Snapshot) -> Self {
        Self {
            sections: snapshot.sections().iter().map(LayoutSection::of).collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}
