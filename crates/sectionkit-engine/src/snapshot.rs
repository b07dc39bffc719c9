//! # Snapshot
//!
//! A [`Snapshot`] is a complete, ordered description of the list at one point
//! in time: sections in order, rows in order within each section. It is a
//! value: every transformation returns a new snapshot and leaves the receiver
//! untouched, so the rendered snapshot stays valid for diffing while the next
//! one is being built.
//!
//! Transformations that address a section or row by identity fail with a
//! [`SnapshotError`] when that identity is absent. Every transformation
//! re-checks that section identities and row identities are pairwise
//! distinct, because the reconciler needs sets, not multisets.

use std::collections::HashSet;

use crate::models::{IndexPath, Item, ItemId, Position, Section, SectionId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("{0} is not in the snapshot")]
    UnknownItem(ItemId),
    #[error("{0} is not in the snapshot")]
    UnknownSection(SectionId),
    #[error("{0} appears more than once")]
    DuplicateItem(ItemId),
    #[error("{0} appears more than once")]
    DuplicateSection(SectionId),
    #[error("there is no section to append items to")]
    NoSections,
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    sections: Vec<Section>,
    /// Rows whose content must be re-queried although identity and position are unchanged
    reloaded_items: HashSet<ItemId>,
    /// Sections whose content must be re-queried although identity and position are unchanged
    reloaded_sections: HashSet<SectionId>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sections(sections: Vec<Section>) -> Result<Self, SnapshotError> {
        let snapshot = Self {
            sections,
            ..Self::default()
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section_at(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn item_at(&self, path: IndexPath) -> Option<&Item> {
        self.sections.get(path.section)?.items.get(path.row)
    }

    pub fn section_index(&self, section: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id() == section)
    }

    pub fn index_path(&self, item: ItemId) -> Option<IndexPath> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section, s)| {
                s.items
                    .iter()
                    .position(|i| i.id() == item)
                    .map(|row| IndexPath::new(section, row))
            })
    }

    pub fn contains_item(&self, item: ItemId) -> bool {
        self.index_path(item).is_some()
    }

    pub fn items_in(&self, section: SectionId) -> Option<&[Item]> {
        self.sections
            .iter()
            .find(|s| s.id() == section)
            .map(|s| s.items.as_slice())
    }

    pub fn is_item_reloaded(&self, item: ItemId) -> bool {
        self.reloaded_items.contains(&item)
    }

    pub fn is_section_reloaded(&self, section: SectionId) -> bool {
        self.reloaded_sections.contains(&section)
    }

    /// Check that section ids and row ids are pairwise distinct
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut sections = HashSet::with_capacity(self.sections.len());
        let mut items = HashSet::with_capacity(self.item_count());
        for section in &self.sections {
            if !sections.insert(section.id()) {
                return Err(SnapshotError::DuplicateSection(section.id()));
            }
            for item in &section.items {
                if !items.insert(item.id()) {
                    return Err(SnapshotError::DuplicateItem(item.id()));
                }
            }
        }
        Ok(())
    }

    pub fn appending_sections(
        &self,
        sections: impl IntoIterator<Item = Section>,
    ) -> Result<Self, SnapshotError> {
        let mut next = self.clone();
        next.sections.extend(sections);
        next.validate()?;
        Ok(next)
    }

    /// Append rows to `section`, or to the last section when `None`
    pub fn appending_items(
        &self,
        items: impl IntoIterator<Item = Item>,
        section: Option<SectionId>,
    ) -> Result<Self, SnapshotError> {
        let index = match section {
            Some(id) => self
                .section_index(id)
                .ok_or(SnapshotError::UnknownSection(id))?,
            None => self
                .sections
                .len()
                .checked_sub(1)
                .ok_or(SnapshotError::NoSections)?,
        };

        let mut next = self.clone();
        next.sections[index].items.extend(items);
        next.validate()?;
        Ok(next)
    }

    pub fn inserting_items(
        &self,
        items: impl IntoIterator<Item = Item>,
        position: Position,
        anchor: ItemId,
    ) -> Result<Self, SnapshotError> {
        let path = self
            .index_path(anchor)
            .ok_or(SnapshotError::UnknownItem(anchor))?;
        let row = match position {
            Position::Before => path.row,
            Position::After => path.row + 1,
        };

        let mut next = self.clone();
        next.sections[path.section].items.splice(row..row, items);
        next.validate()?;
        Ok(next)
    }

    pub fn deleting_items(&self, items: &[ItemId]) -> Result<Self, SnapshotError> {
        if let Some(missing) = items.iter().find(|id| !self.contains_item(**id)) {
            return Err(SnapshotError::UnknownItem(*missing));
        }
        Ok(self.deleting_items_if_present(items))
    }

    /// Lenient deletion: identities that are no longer present are skipped
    pub fn deleting_items_if_present(&self, items: &[ItemId]) -> Self {
        let doomed: HashSet<ItemId> = items.iter().copied().collect();
        let mut next = self.clone();
        for section in &mut next.sections {
            section.items.retain(|item| !doomed.contains(&item.id()));
        }
        next.reloaded_items.retain(|id| !doomed.contains(id));
        next
    }

    /// Move `item` next to `target`. Moving an item relative to itself is a no-op.
    pub fn moving_item(
        &self,
        item: ItemId,
        position: Position,
        target: ItemId,
    ) -> Result<Self, SnapshotError> {
        let from = self
            .index_path(item)
            .ok_or(SnapshotError::UnknownItem(item))?;
        if !self.contains_item(target) {
            return Err(SnapshotError::UnknownItem(target));
        }
        if item == target {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        let moved = next.sections[from.section].items.remove(from.row);
        let to = next
            .index_path(target)
            .ok_or(SnapshotError::UnknownItem(target))?;
        let row = match position {
            Position::Before => to.row,
            Position::After => to.row + 1,
        };
        next.sections[to.section].items.insert(row, moved);
        Ok(next)
    }

    /// Move `section` next to `target`. Moving a section relative to itself is a no-op.
    pub fn moving_section(
        &self,
        section: SectionId,
        position: Position,
        target: SectionId,
    ) -> Result<Self, SnapshotError> {
        let from = self
            .section_index(section)
            .ok_or(SnapshotError::UnknownSection(section))?;
        if self.section_index(target).is_none() {
            return Err(SnapshotError::UnknownSection(target));
        }
        if section == target {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        let moved = next.sections.remove(from);
        let to = next
            .section_index(target)
            .ok_or(SnapshotError::UnknownSection(target))?;
        let index = match position {
            Position::Before => to,
            Position::After => to + 1,
        };
        next.sections.insert(index, moved);
        Ok(next)
    }

    pub fn reloading_items(&self, items: &[ItemId]) -> Result<Self, SnapshotError> {
        if let Some(missing) = items.iter().find(|id| !self.contains_item(**id)) {
            return Err(SnapshotError::UnknownItem(*missing));
        }
        let mut next = self.clone();
        next.reloaded_items.extend(items.iter().copied());
        Ok(next)
    }

    pub fn reloading_sections(&self, sections: &[SectionId]) -> Result<Self, SnapshotError> {
        if let Some(missing) = sections
            .iter()
            .find(|id| self.section_index(**id).is_none())
        {
            return Err(SnapshotError::UnknownSection(*missing));
        }
        let mut next = self.clone();
        next.reloaded_sections.extend(sections.iter().copied());
        Ok(next)
    }

    pub fn deleting_all(&self) -> Self {
        Self::default()
    }

    /// Drop reload marks once the snapshot has been rendered
    pub(crate) fn settled(mut self) -> Self {
        self.reloaded_items.clear();
        self.reloaded_sections.clear();
        self
    }
}
