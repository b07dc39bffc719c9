//! # Reconciliation
//!
//! [`diff`] turns a pair of snapshots into an ordered [`EditScript`];
//! [`Reconciler`] owns the rendered state and commits scripts to a
//! [`RenderSurface`].
//!
//! The applied snapshot is only replaced once the surface has taken the
//! script, so until then it remains the base for the next diff.

pub mod diff;
pub mod script;

use std::collections::HashSet;

pub use diff::diff;
pub use script::{Edit, EditScript, Layout, LayoutSection};

use crate::capability::ItemViewModel;
use crate::models::{Item, ItemId, Section};
use crate::snapshot::Snapshot;
use crate::surface::{RenderSurface, ReuseKind, Transition};

/// What has already been set up on the current surface.
#[derive(Debug, Default)]
pub struct Registry {
    reuse_identifiers: HashSet<String>,
    wired_items: HashSet<ItemId>,
}

impl Registry {
    pub fn is_registered(&self, identifier: &str) -> bool {
        self.reuse_identifiers.contains(identifier)
    }

    pub fn is_wired(&self, item: ItemId) -> bool {
        self.wired_items.contains(&item)
    }

    /// Returns `true` the first time `item` is seen
    pub(crate) fn mark_wired(&mut self, item: ItemId) -> bool {
        self.wired_items.insert(item)
    }

    pub fn wired_count(&self) -> usize {
        self.wired_items.len()
    }

    /// Forget items, headers included, that `snapshot` no longer holds
    pub(crate) fn retain_wired(&mut self, snapshot: &Snapshot) {
        let live: HashSet<ItemId> = snapshot
            .sections()
            .iter()
            .flat_map(Section::all_items)
            .map(Item::id)
            .collect();
        self.wired_items.retain(|item| live.contains(item));
    }

    pub fn clear(&mut self) {
        self.reuse_identifiers.clear();
        self.wired_items.clear();
    }
}

pub struct Reconciler<S> {
    surface: S,
    applied: Snapshot,
    registry: Registry,
}

impl<S: RenderSurface> Reconciler<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            applied: Snapshot::new(),
            registry: Registry::default(),
        }
    }

    /// The snapshot the surface is currently showing
    pub fn applied(&self) -> &Snapshot {
        &self.applied
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Swap in a new surface. Registrations belong to the old surface and
    /// are forgotten; the caller re-registers and re-presents.
    pub fn replace_surface(&mut self, surface: S) -> S {
        self.registry.clear();
        std::mem::replace(&mut self.surface, surface)
    }

    /// Register the reuse kind of `view_model` unless already done.
    ///
    /// Panics when the surface has no way to build cells of that kind: the
    /// list cannot render without them and this is a configuration mistake.
    pub fn register(&mut self, view_model: &dyn ItemViewModel) {
        if self.registry.is_registered(view_model.reuse_identifier()) {
            return;
        }
        let kind = ReuseKind::of(view_model);
        if let Err(err) = self.surface.register_reusable(&kind) {
            panic!("sectionkit: {err}");
        }
        log::trace!("registered reuse identifier {}", kind.identifier);
        self.registry.reuse_identifiers.insert(kind.identifier);
    }

    /// Diff `next` against the applied snapshot and hand the script to the
    /// surface. An empty script never reaches the surface.
    ///
    /// Wiring of items that left the list is dropped, so a re-added item is
    /// wired again.
    ///
    /// Panics, naming `operation`, if `next` repeats an identity.
    pub fn commit(&mut self, next: Snapshot, transition: Transition, operation: &str) -> EditScript {
        if let Err(err) = next.validate() {
            panic!("sectionkit: {operation} produced an inconsistent snapshot: {err}");
        }

        let script = diff(&self.applied, &next);
        if script.is_empty() {
            log::trace!("{operation}: no changes");
        } else {
            log::debug!("{operation}: applying {} edits", script.len());
            self.surface.apply(&script, &next, transition);
        }
        self.registry.retain_wired(&next);
        self.applied = next.settled();
        script
    }

    /// Show the whole applied snapshot on a surface that has nothing yet
    pub fn present(&mut self) -> EditScript {
        let script = diff(&Snapshot::new(), &self.applied);
        if !script.is_empty() {
            log::debug!("presenting {} sections on new surface", self.applied.section_count());
            self.surface
                .apply(&script, &self.applied, Transition::immediate());
        }
        script
    }

    /// Re-query content for the applied snapshot without a structural edit
    pub fn refresh(&mut self) {
        self.surface.refresh(&self.applied);
    }
}
