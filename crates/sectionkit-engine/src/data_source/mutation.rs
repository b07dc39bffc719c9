use crate::models::{Item, ItemId, Position, Section, SectionId};
use crate::snapshot::{Snapshot, SnapshotError};
use crate::surface::{RowAnimation, Transition};

/// How strictly identities in a mutation must resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    /// Every identity must be present; a missing one is a contract violation
    Required,
    /// Identities came from position-based addressing and may have gone stale
    BestEffort,
}

/// One requested edit, applied to whatever snapshot is current when its turn comes.
pub(crate) enum Mutation {
    AppendSections(Vec<Section>),
    AppendItems {
        items: Vec<Item>,
        section: Option<SectionId>,
    },
    InsertItems {
        items: Vec<Item>,
        position: Position,
        anchor: ItemId,
    },
    RemoveItems {
        items: Vec<ItemId>,
        lookup: Lookup,
    },
    MoveItem {
        item: ItemId,
        position: Position,
        target: ItemId,
    },
    MoveSection {
        section: SectionId,
        position: Position,
        target: SectionId,
    },
    ReloadItems {
        items: Vec<ItemId>,
        lookup: Lookup,
    },
    ReloadSections {
        sections: Vec<SectionId>,
        lookup: Lookup,
    },
    RemoveAll,
    Replace(Vec<Section>),
}

impl Mutation {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Mutation::AppendSections(_) => "append_sections",
            Mutation::AppendItems { .. } => "append_items",
            Mutation::InsertItems { .. } => "insert_items",
            Mutation::RemoveItems { .. } => "remove_items",
            Mutation::MoveItem { .. } => "move_item",
            Mutation::MoveSection { .. } => "move_section",
            Mutation::ReloadItems { .. } => "reload_items",
            Mutation::ReloadSections { .. } => "reload_sections",
            Mutation::RemoveAll => "remove_all",
            Mutation::Replace(_) => "set_sections",
        }
    }

    pub(crate) fn is_replace(&self) -> bool {
        matches!(self, Mutation::Replace(_))
    }

    /// Wholesale replacement is shown without row animation
    pub(crate) fn transition(&self, animation: RowAnimation) -> Transition {
        match self {
            Mutation::Replace(_) => Transition::immediate(),
            _ => Transition::animated(animation),
        }
    }

    pub(crate) fn apply(self, current: &Snapshot) -> Result<Snapshot, SnapshotError> {
        match self {
            Mutation::AppendSections(sections) => current.appending_sections(sections),
            Mutation::AppendItems { items, section } => current.appending_items(items, section),
            Mutation::InsertItems {
                items,
                position,
                anchor,
            } => current.inserting_items(items, position, anchor),
            Mutation::RemoveItems {
                items,
                lookup: Lookup::Required,
            } => current.deleting_items(&items),
            Mutation::RemoveItems {
                items,
                lookup: Lookup::BestEffort,
            } => Ok(current.deleting_items_if_present(&items)),
            Mutation::MoveItem {
                item,
                position,
                target,
            } => current.moving_item(item, position, target),
            Mutation::MoveSection {
                section,
                position,
                target,
            } => current.moving_section(section, position, target),
            Mutation::ReloadItems { items, lookup } => {
                let items = match lookup {
                    Lookup::Required => items,
                    Lookup::BestEffort => items
                        .into_iter()
                        .filter(|id| current.contains_item(*id))
                        .collect(),
                };
                current.reloading_items(&items)
            }
            Mutation::ReloadSections { sections, lookup } => {
                let sections = match lookup {
                    Lookup::Required => sections,
                    Lookup::BestEffort => sections
                        .into_iter()
                        .filter(|id| current.section_index(*id).is_some())
                        .collect(),
                };
                current.reloading_sections(&sections)
            }
            Mutation::RemoveAll => Ok(current.deleting_all()),
            Mutation::Replace(sections) => Snapshot::from_sections(sections),
        }
    }
}
