//! # Data source
//!
//! [`DataSource`] binds a [`Snapshot`] of sections to a [`RenderSurface`].
//! It is the single owner of the applied snapshot, the surface and the
//! registration state, and must be driven from one context (normally the UI
//! thread):
//!
//! 1. Hosts and view-models submit edits through cloned [`ListHandle`]s,
//!    from any thread.
//! 2. The owner calls [`DataSource::run_pending`] from its event loop. Each
//!    queued edit is turned into the next snapshot, diffed against the
//!    applied one, committed to the surface, and only then completed.
//! 3. The surface reports selection and scrolling back through
//!    [`did_select_row`](DataSource::did_select_row) and
//!    [`did_scroll`](DataSource::did_scroll), and asks for cells through
//!    [`cell_for_row`](DataSource::cell_for_row) and
//!    [`header_view`](DataSource::header_view).
//!
//! ```rust,ignore
//! let mut source = DataSource::new(surface);
//! let list = source.handle();
//! list.append_sections(vec![Section::new(items)], None);
//! source.run_pending();
//! ```

pub mod handle;
pub(crate) mod mutation;
pub(crate) mod queue;

use std::sync::Arc;

pub use handle::ListHandle;
pub use queue::Completion;

use crate::capability::{ItemViewModel, RowHeight};
use crate::edge::{EdgeDetector, ScrollMetrics};
use crate::models::{IndexPath, Item};
use crate::reconcile::{Reconciler, Registry};
use crate::snapshot::Snapshot;
use crate::surface::{ConfigurableCell, RenderSurface, RowAnimation};
use queue::{Job, JobReceiver};

pub const DEFAULT_EDGE_COMPLETION_OFFSET: f64 = 60.0;

/// Host-facing behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataSourceOptions {
    /// Distance from an edge at which reached-top / reached-bottom fire
    pub edge_completion_offset: f64,
    /// Animation for inserted and deleted rows
    pub row_animation: RowAnimation,
    /// Deselect a row right after it is tapped
    pub deselect_after_tap: bool,
}

impl Default for DataSourceOptions {
    fn default() -> Self {
        Self {
            edge_completion_offset: DEFAULT_EDGE_COMPLETION_OFFSET,
            row_animation: RowAnimation::Automatic,
            deselect_after_tap: true,
        }
    }
}

/// A configured header cell and the tap target attached to it.
pub struct HeaderView<C> {
    pub cell: C,
    /// Present when the header's view-model is tappable
    pub tap: Option<HeaderTap>,
}

/// Routes a tap on a rendered header to its view-model.
#[derive(Clone)]
pub struct HeaderTap {
    view_model: Arc<dyn ItemViewModel>,
}

impl HeaderTap {
    pub fn fire(&self) {
        if let Some(tappable) = self.view_model.as_tappable() {
            tappable.on_tap();
        }
    }
}

type EdgeCallback = Box<dyn FnMut()>;

pub struct DataSource<S: RenderSurface> {
    reconciler: Reconciler<S>,
    jobs: JobReceiver,
    handle: ListHandle,
    options: DataSourceOptions,
    on_reach_top: Option<EdgeCallback>,
    on_reach_bottom: Option<EdgeCallback>,
}

impl<S: RenderSurface> DataSource<S> {
    pub fn new(surface: S) -> Self {
        Self::with_options(surface, DataSourceOptions::default())
    }

    pub fn with_options(surface: S, options: DataSourceOptions) -> Self {
        let (sender, jobs) = queue::channel();
        Self {
            reconciler: Reconciler::new(surface),
            jobs,
            handle: ListHandle::new(sender),
            options,
            on_reach_top: None,
            on_reach_bottom: None,
        }
    }

    pub fn handle(&self) -> ListHandle {
        self.handle.clone()
    }

    pub fn options(&self) -> &DataSourceOptions {
        &self.options
    }

    pub fn set_edge_completion_offset(&mut self, offset: f64) {
        self.options.edge_completion_offset = offset;
    }

    pub fn set_row_animation(&mut self, animation: RowAnimation) {
        self.options.row_animation = animation;
    }

    pub fn set_deselect_after_tap(&mut self, deselect: bool) {
        self.options.deselect_after_tap = deselect;
    }

    pub fn set_on_reach_top(&mut self, callback: impl FnMut() + 'static) {
        self.on_reach_top = Some(Box::new(callback));
    }

    pub fn set_on_reach_bottom(&mut self, callback: impl FnMut() + 'static) {
        self.on_reach_bottom = Some(Box::new(callback));
    }

    /// The snapshot the surface is showing
    pub fn snapshot(&self) -> &Snapshot {
        self.reconciler.applied()
    }

    pub fn surface(&self) -> &S {
        self.reconciler.surface()
    }

    /// Reuse kinds and item wiring set up on the current surface
    pub fn registry(&self) -> &Registry {
        self.reconciler.registry()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.reconciler.surface_mut()
    }

    /// Move the list onto a new surface. Reuse kinds and item wiring are set
    /// up again and the current snapshot is presented without animation.
    pub fn replace_surface(&mut self, surface: S) -> S {
        let previous = self.reconciler.replace_surface(surface);
        let applied = self.reconciler.applied().clone();
        self.configure(&applied);
        self.reconciler.present();
        previous
    }

    /// Apply every queued job in submission order. Jobs queued by
    /// completions run in the same call. Returns the number of jobs run.
    pub fn run_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Some(job) = self.jobs.next() {
            self.process(job);
            processed += 1;
        }
        processed
    }

    fn process(&mut self, job: Job) {
        match job {
            Job::Mutate {
                mutation,
                completion,
            } => {
                let operation = mutation.name();
                let replaced = mutation.is_replace();
                let transition = mutation.transition(self.options.row_animation);
                let next = match mutation.apply(self.reconciler.applied()) {
                    Ok(next) => next,
                    Err(err) => panic!("sectionkit: {operation}: {err}"),
                };
                self.configure(&next);
                self.reconciler.commit(next, transition, operation);
                self.handle.publish(self.reconciler.applied(), replaced);
                if let Some(completion) = completion {
                    completion();
                }
            }
            Job::Reapply => self.reconciler.refresh(),
            Job::ScrollToTop { animated } => {
                self.reconciler.surface_mut().scroll_to_offset(0.0, animated);
            }
            Job::ScrollToBottom { position, animated } => {
                let snapshot = self.reconciler.applied();
                let last = snapshot.section_count().checked_sub(1).and_then(|section| {
                    snapshot.sections()[section]
                        .len()
                        .checked_sub(1)
                        .map(|row| IndexPath::new(section, row))
                });
                if let Some(at) = last {
                    self.reconciler
                        .surface_mut()
                        .scroll_to_row(at, position, animated);
                }
            }
        }
    }

    fn configure(&mut self, snapshot: &Snapshot) {
        for section in snapshot.sections() {
            for item in section.all_items() {
                self.configure_item(item);
            }
        }
    }

    /// Register the item's reuse kind and wire its capabilities, once per
    /// item per surface
    fn configure_item(&mut self, item: &Item) {
        if self.reconciler.registry().is_wired(item.id()) {
            return;
        }
        let view_model = item.view_model();
        self.reconciler.register(view_model.as_ref());
        self.reconciler.registry_mut().mark_wired(item.id());

        if let Some(deletable) = view_model.as_deletable() {
            let jobs = self.handle.jobs.clone();
            let id = item.id();
            deletable.on_delete().set(Arc::new(move || {
                jobs.send(Job::Mutate {
                    mutation: mutation::Mutation::RemoveItems {
                        items: vec![id],
                        lookup: mutation::Lookup::BestEffort,
                    },
                    completion: None,
                });
            }));
        }

        if let Some(mutable) = view_model.as_mutable() {
            let jobs = self.handle.jobs.clone();
            mutable
                .on_change()
                .set(Arc::new(move || jobs.send(Job::Reapply)));
        }
    }

    pub fn number_of_sections(&self) -> usize {
        self.snapshot().section_count()
    }

    pub fn number_of_rows(&self, section: usize) -> usize {
        self.snapshot().section_at(section).map_or(0, |s| s.len())
    }

    pub fn item_at(&self, at: IndexPath) -> Option<&Item> {
        self.snapshot().item_at(at)
    }

    /// Dequeue and configure the cell for the row at `at`
    pub fn cell_for_row(&mut self, at: IndexPath) -> Option<S::Cell> {
        let view_model = self.snapshot().item_at(at)?.view_model().clone();
        self.dequeue_configured(view_model.as_ref())
    }

    /// Dequeue and configure the header of `section`, attaching a tap
    /// target when the header is tappable
    pub fn header_view(&mut self, section: usize) -> Option<HeaderView<S::Cell>> {
        let view_model = self
            .snapshot()
            .section_at(section)?
            .header
            .as_ref()?
            .view_model()
            .clone();
        let cell = self.dequeue_configured(view_model.as_ref())?;
        let tap = view_model
            .as_tappable()
            .is_some()
            .then(|| HeaderTap {
                view_model: view_model.clone(),
            });
        Some(HeaderView { cell, tap })
    }

    pub fn height_for_row(&self, at: IndexPath) -> RowHeight {
        self.item_at(at)
            .map_or(RowHeight::Automatic, |item| item.view_model().item_height())
    }

    /// Sections without a header take no space for one
    pub fn height_for_header(&self, section: usize) -> RowHeight {
        self.snapshot()
            .section_at(section)
            .and_then(|s| s.header.as_ref())
            .map_or(RowHeight::Fixed(0.0), |header| {
                header.view_model().item_height()
            })
    }

    /// Primary selection of a row: optionally deselect, then tap
    pub fn did_select_row(&mut self, at: IndexPath) {
        if self.options.deselect_after_tap {
            self.reconciler.surface_mut().deselect_row(at, true);
        }
        let Some(item) = self.snapshot().item_at(at) else {
            return;
        };
        let view_model = item.view_model().clone();
        if let Some(tappable) = view_model.as_tappable() {
            tappable.on_tap();
        }
    }

    /// Fire the edge callbacks for this scroll position
    pub fn did_scroll(&mut self, metrics: ScrollMetrics) {
        let edges = EdgeDetector::new(self.options.edge_completion_offset).evaluate(metrics);
        if edges.bottom
            && let Some(callback) = self.on_reach_bottom.as_mut()
        {
            callback();
        }
        if edges.top
            && let Some(callback) = self.on_reach_top.as_mut()
        {
            callback();
        }
    }

    fn dequeue_configured(&mut self, view_model: &dyn ItemViewModel) -> Option<S::Cell> {
        let identifier = view_model.reuse_identifier();
        match self.reconciler.surface_mut().dequeue_reusable(identifier) {
            Some(mut cell) => {
                cell.configure(view_model);
                Some(cell)
            }
            None => {
                log::warn!("surface has no reusable cell for \"{identifier}\"");
                None
            }
        }
    }
}
