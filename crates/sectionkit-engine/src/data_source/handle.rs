use std::sync::{Arc, RwLock};

use crate::data_source::mutation::{Lookup, Mutation};
use crate::data_source::queue::{Completion, Job, JobSender};
use crate::models::{IndexPath, Item, ItemId, Position, Section, SectionId};
use crate::snapshot::Snapshot;
use crate::surface::ScrollPosition;

/// Thread-safe entry point to the mutation API.
///
/// Every call is queued and applied by the owning
/// [`DataSource`](crate::DataSource) in submission order; nothing is applied
/// synchronously. Completions run after the surface has taken the edit, or
/// straight away when the edit turned out to change nothing.
///
/// Identity-addressed calls treat an unknown identity as a contract
/// violation and panic when the edit is applied. Index-path calls resolve
/// their paths against [`sections`](Self::sections) at call time.
#[derive(Clone)]
pub struct ListHandle {
    pub(crate) jobs: JobSender,
    visible: Arc<RwLock<Visible>>,
}

/// The caller-visible list. While a `set_sections` is queued, the assigned
/// list stays visible and earlier edits do not overwrite it.
#[derive(Default)]
struct Visible {
    sections: Vec<Section>,
    pending_replaces: usize,
}

impl ListHandle {
    pub(crate) fn new(jobs: JobSender) -> Self {
        Self {
            jobs,
            visible: Arc::new(RwLock::new(Visible::default())),
        }
    }

    /// The caller-visible section list: the last applied state, or the
    /// last value given to [`set_sections`](Self::set_sections)
    pub fn sections(&self) -> Vec<Section> {
        // Recover from poisoned lock (another thread panicked while holding it)
        self.visible
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .sections
            .clone()
    }

    /// Replace the whole list. The new list is reconciled against what is
    /// shown, so sections and items that keep their identity are diffed,
    /// not rebuilt.
    pub fn set_sections(&self, sections: Vec<Section>) {
        {
            let mut visible = self.visible.write().unwrap_or_else(|e| e.into_inner());
            visible.pending_replaces += 1;
            visible.sections = sections.clone();
        }
        self.mutate(Mutation::Replace(sections), None);
    }

    pub fn append_sections(&self, sections: Vec<Section>, completion: Option<Completion>) {
        self.mutate(Mutation::AppendSections(sections), completion);
    }

    /// Append to `section`, or to the last section when `None`
    pub fn append_items(
        &self,
        items: Vec<Item>,
        section: Option<SectionId>,
        completion: Option<Completion>,
    ) {
        self.mutate(Mutation::AppendItems { items, section }, completion);
    }

    pub fn insert_items(
        &self,
        items: Vec<Item>,
        position: Position,
        anchor: ItemId,
        completion: Option<Completion>,
    ) {
        self.mutate(
            Mutation::InsertItems {
                items,
                position,
                anchor,
            },
            completion,
        );
    }

    /// Insert next to the row at `at`. Panics if there is no such row.
    pub fn insert_items_at(
        &self,
        items: Vec<Item>,
        position: Position,
        at: IndexPath,
        completion: Option<Completion>,
    ) {
        let anchor = self.require_item("insert_items_at", at);
        self.insert_items(items, position, anchor, completion);
    }

    pub fn remove_items(&self, items: Vec<ItemId>, completion: Option<Completion>) {
        self.mutate(
            Mutation::RemoveItems {
                items,
                lookup: Lookup::Required,
            },
            completion,
        );
    }

    /// Remove the rows at `paths`. Paths that point nowhere are skipped.
    pub fn remove_at(&self, paths: &[IndexPath], completion: Option<Completion>) {
        let items = self.resolve_items(paths);
        self.mutate(
            Mutation::RemoveItems {
                items,
                lookup: Lookup::BestEffort,
            },
            completion,
        );
    }

    pub fn move_item(
        &self,
        item: ItemId,
        position: Position,
        target: ItemId,
        completion: Option<Completion>,
    ) {
        self.mutate(
            Mutation::MoveItem {
                item,
                position,
                target,
            },
            completion,
        );
    }

    /// Move the row at `from` next to the row at `to`. Panics if either is missing.
    pub fn move_item_at(
        &self,
        from: IndexPath,
        position: Position,
        to: IndexPath,
        completion: Option<Completion>,
    ) {
        let item = self.require_item("move_item_at", from);
        let target = self.require_item("move_item_at", to);
        self.move_item(item, position, target, completion);
    }

    pub fn move_section(
        &self,
        section: SectionId,
        position: Position,
        target: SectionId,
        completion: Option<Completion>,
    ) {
        self.mutate(
            Mutation::MoveSection {
                section,
                position,
                target,
            },
            completion,
        );
    }

    /// Move the section at `from` next to the section at `to`. Panics if either is missing.
    pub fn move_section_at(
        &self,
        from: usize,
        position: Position,
        to: usize,
        completion: Option<Completion>,
    ) {
        let section = self.require_section("move_section_at", from);
        let target = self.require_section("move_section_at", to);
        self.move_section(section, position, target, completion);
    }

    pub fn reload_items(&self, items: Vec<ItemId>, completion: Option<Completion>) {
        self.mutate(
            Mutation::ReloadItems {
                items,
                lookup: Lookup::Required,
            },
            completion,
        );
    }

    /// Reload the rows at `paths`. Paths that point nowhere are skipped.
    pub fn reload_items_at(&self, paths: &[IndexPath], completion: Option<Completion>) {
        let items = self.resolve_items(paths);
        self.mutate(
            Mutation::ReloadItems {
                items,
                lookup: Lookup::BestEffort,
            },
            completion,
        );
    }

    pub fn reload_sections(&self, sections: Vec<SectionId>, completion: Option<Completion>) {
        self.mutate(
            Mutation::ReloadSections {
                sections,
                lookup: Lookup::Required,
            },
            completion,
        );
    }

    /// Reload the sections at `indexes`. Indexes that point nowhere are skipped.
    pub fn reload_sections_at(&self, indexes: &[usize], completion: Option<Completion>) {
        let sections = {
            let visible = self.visible.read().unwrap_or_else(|e| e.into_inner());
            indexes
                .iter()
                .filter_map(|index| visible.sections.get(*index).map(Section::id))
                .collect()
        };
        self.mutate(
            Mutation::ReloadSections {
                sections,
                lookup: Lookup::BestEffort,
            },
            completion,
        );
    }

    /// Remove every section and row
    pub fn remove_all(&self, completion: Option<Completion>) {
        self.mutate(Mutation::RemoveAll, completion);
    }

    pub fn scroll_to_top(&self, animated: bool) {
        self.jobs.send(Job::ScrollToTop { animated });
    }

    /// Scroll to the last row of the last section, if it has one
    pub fn scroll_to_bottom(&self, position: ScrollPosition, animated: bool) {
        self.jobs.send(Job::ScrollToBottom { position, animated });
    }

    /// Show the applied state, unless a later `set_sections` is still queued.
    /// `replaced` marks the commit of a queued `set_sections`.
    pub(crate) fn publish(&self, applied: &Snapshot, replaced: bool) {
        let mut visible = self.visible.write().unwrap_or_else(|e| e.into_inner());
        if replaced {
            visible.pending_replaces = visible.pending_replaces.saturating_sub(1);
        }
        if visible.pending_replaces == 0 {
            visible.sections = applied.sections().to_vec();
        }
    }

    fn mutate(&self, mutation: Mutation, completion: Option<Completion>) {
        self.jobs.send(Job::Mutate {
            mutation,
            completion,
        });
    }

    fn resolve_items(&self, paths: &[IndexPath]) -> Vec<ItemId> {
        let visible = self.visible.read().unwrap_or_else(|e| e.into_inner());
        paths
            .iter()
            .filter_map(|path| visible.sections.get(path.section)?.items.get(path.row))
            .map(Item::id)
            .collect()
    }

    fn require_item(&self, operation: &str, at: IndexPath) -> ItemId {
        let visible = self.visible.read().unwrap_or_else(|e| e.into_inner());
        match visible
            .sections
            .get(at.section)
            .and_then(|s| s.items.get(at.row))
        {
            Some(item) => item.id(),
            None => panic!("sectionkit: {operation}: there is no row at {at}"),
        }
    }

    fn require_section(&self, operation: &str, index: usize) -> SectionId {
        let visible = self.visible.read().unwrap_or_else(|e| e.into_inner());
        match visible.sections.get(index) {
            Some(section) => section.id(),
            None => panic!("sectionkit: {operation}: there is no section {index}"),
        }
    }
}
