//! Two-level keyed diff between snapshots.
//!
//! Sections and rows are compared as identity sets. Entries only in the old
//! snapshot are deleted, entries only in the new one are inserted, and
//! survivors that changed place become single moves. Survivors that keep their
//! relative order are the longest increasing run of their old positions, so the
//! number of moves is minimal.
//!
//! Rows belonging to an inserted or deleted section travel with that section
//! edit and are not listed on their own.

use std::collections::HashMap;

use crate::models::{IndexPath, ItemId, SectionId};
use crate::reconcile::script::{Edit, EditScript};
use crate::snapshot::Snapshot;

pub fn diff(old: &Snapshot, new: &Snapshot) -> EditScript {
    let old_sections = section_positions(old);
    let new_sections = section_positions(new);
    let old_rows = row_positions(old);
    let new_rows = row_positions(new);

    let survives = |id: &SectionId| old_sections.contains_key(id) && new_sections.contains_key(id);

    let mut section_deletes = Vec::new();
    for (at, section) in old.sections().iter().enumerate() {
        if !new_sections.contains_key(&section.id()) {
            section_deletes.push(Edit::DeleteSection {
                section: section.id(),
                at,
            });
        }
    }

    let mut section_inserts = Vec::new();
    let mut common = Vec::new();
    for (at, section) in new.sections().iter().enumerate() {
        match old_sections.get(&section.id()) {
            None => section_inserts.push(Edit::InsertSection {
                section: section.id(),
                at,
            }),
            Some(&from) => common.push((section.id(), from, at)),
        }
    }

    let mut section_moves = Vec::new();
    let stable = longest_increasing(&common.iter().map(|(_, from, _)| *from).collect::<Vec<_>>());
    for ((section, from, to), keep) in common.iter().zip(stable) {
        if !keep {
            section_moves.push(Edit::MoveSection {
                section: *section,
                from: *from,
                to: *to,
            });
        }
    }

    let mut item_deletes = Vec::new();
    for (section_index, section) in old.sections().iter().enumerate() {
        if !new_sections.contains_key(&section.id()) {
            continue;
        }
        for (row, item) in section.items.iter().enumerate() {
            let gone = match new_rows.get(&item.id()) {
                None => true,
                // The destination section is new, so the row arrives with it
                Some(to) => !old_sections.contains_key(&new.sections()[to.section].id()),
            };
            if gone {
                item_deletes.push(Edit::DeleteItem {
                    item: item.id(),
                    at: IndexPath::new(section_index, row),
                });
            }
        }
    }

    let mut item_inserts = Vec::new();
    let mut item_moves = Vec::new();
    for (section_index, section) in new.sections().iter().enumerate() {
        if !old_sections.contains_key(&section.id()) {
            continue;
        }

        let mut same_section = Vec::new();
        for (row, item) in section.items.iter().enumerate() {
            let to = IndexPath::new(section_index, row);
            match old_rows.get(&item.id()) {
                None => item_inserts.push(Edit::InsertItem { item: item.id(), at: to }),
                Some(&from) => {
                    let from_section = old.sections()[from.section].id();
                    if from_section == section.id() {
                        same_section.push((item.id(), from, to));
                    } else if survives(&from_section) {
                        item_moves.push(Edit::MoveItem {
                            item: item.id(),
                            from,
                            to,
                        });
                    } else {
                        // The source section is deleted and takes the row with it
                        item_inserts.push(Edit::InsertItem { item: item.id(), at: to });
                    }
                }
            }
        }

        let stable = longest_increasing(
            &same_section
                .iter()
                .map(|(_, from, _)| from.row)
                .collect::<Vec<_>>(),
        );
        for ((item, from, to), keep) in same_section.into_iter().zip(stable) {
            if !keep {
                item_moves.push(Edit::MoveItem { item, from, to });
            }
        }
    }

    let mut section_reloads = Vec::new();
    for (at, section) in new.sections().iter().enumerate() {
        let Some(&from) = old_sections.get(&section.id()) else {
            continue;
        };
        let old_header = old.sections()[from].header.as_ref().map(|h| h.id());
        let new_header = section.header.as_ref().map(|h| h.id());
        if new.is_section_reloaded(section.id()) || old_header != new_header {
            section_reloads.push(Edit::ReloadSection {
                section: section.id(),
                at,
            });
        }
    }

    let mut item_reloads = Vec::new();
    for (section_index, section) in new.sections().iter().enumerate() {
        if !old_sections.contains_key(&section.id()) {
            continue;
        }
        for (row, item) in section.items.iter().enumerate() {
            if new.is_item_reloaded(item.id()) && old_rows.contains_key(&item.id()) {
                item_reloads.push(Edit::ReloadItem {
                    item: item.id(),
                    at: IndexPath::new(section_index, row),
                });
            }
        }
    }

    item_deletes.sort_by_key(|e| std::cmp::Reverse(old_index_path(e)));
    section_deletes.sort_by_key(|e| std::cmp::Reverse(section_index(e)));
    section_inserts.sort_by_key(section_index);
    item_inserts.sort_by_key(new_index_path);
    section_moves.sort_by_key(section_index);
    item_moves.sort_by_key(new_index_path);

    let mut edits = item_deletes;
    edits.extend(section_deletes);
    edits.extend(section_inserts);
    edits.extend(item_inserts);
    edits.extend(section_moves);
    edits.extend(item_moves);
    edits.extend(section_reloads);
    edits.extend(item_reloads);
    EditScript::new(edits)
}

fn section_positions(snapshot: &Snapshot) -> HashMap<SectionId, usize> {
    snapshot
        .sections()
        .iter()
        .enumerate()
        .map(|(index, section)| (section.id(), index))
        .collect()
}

fn row_positions(snapshot: &Snapshot) -> HashMap<ItemId, IndexPath> {
    let mut rows = HashMap::with_capacity(snapshot.item_count());
    for (section_index, section) in snapshot.sections().iter().enumerate() {
        for (row, item) in section.items.iter().enumerate() {
            rows.insert(item.id(), IndexPath::new(section_index, row));
        }
    }
    rows
}

fn old_index_path(edit: &Edit) -> IndexPath {
    match *edit {
        Edit::DeleteItem { at, .. } => at,
        Edit::MoveItem { from, .. } => from,
        _ => IndexPath::new(0, 0),
    }
}

fn new_index_path(edit: &Edit) -> IndexPath {
    match *edit {
        Edit::InsertItem { at, .. } | Edit::ReloadItem { at, .. } => at,
        Edit::MoveItem { to, .. } => to,
        _ => IndexPath::new(0, 0),
    }
}

fn section_index(edit: &Edit) -> usize {
    match *edit {
        Edit::DeleteSection { at, .. }
        | Edit::InsertSection { at, .. }
        | Edit::ReloadSection { at, .. } => at,
        Edit::MoveSection { to, .. } => to,
        _ => 0,
    }
}

/// Marks the members of one longest strictly increasing subsequence.
fn longest_increasing(values: &[usize]) -> Vec<bool> {
    // tails[k] = index of the smallest tail of an increasing run of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = vec![None; values.len()];

    for (i, &value) in values.iter().enumerate() {
        let len = tails.partition_point(|&t| values[t] < value);
        if len > 0 {
            previous[i] = Some(tails[len - 1]);
        }
        if len == tails.len() {
            tails.push(i);
        } else {
            tails[len] = i;
        }
    }

    let mut keep = vec![false; values.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        keep[i] = true;
        cursor = previous[i];
    }
    keep
}
