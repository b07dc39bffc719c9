//! Recording surface and view-models shared by the integration tests.
#![allow(dead_code)]

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sectionkit_engine::{
    CallbackSlot, ConfigurableCell, Deletable, EditScript, IndexPath, Item, ItemViewModel,
    Layout, Mutable, RegistrationError, RenderSurface, ReuseKind, RowHeight, ScrollPosition,
    Section, Snapshot, Tappable, Transition,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Scroll {
    Offset { offset: f64, animated: bool },
    Row { at: IndexPath, position: ScrollPosition, animated: bool },
}

/// Surface that keeps an identity layout by replaying every script it is
/// given and checks the result against the snapshot it was handed.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub layout: Layout,
    pub commits: Vec<(EditScript, Transition)>,
    pub registered: Vec<ReuseKind>,
    /// Identifiers the surface pretends it has no resource for
    pub missing: HashSet<String>,
    pub deselected: Vec<IndexPath>,
    pub refreshes: usize,
    pub scrolls: Vec<Scroll>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_resource(identifier: &str) -> Self {
        let mut surface = Self::new();
        surface.missing.insert(identifier.to_string());
        surface
    }

    pub fn is_registered(&self, identifier: &str) -> bool {
        self.registered.iter().any(|k| k.identifier == identifier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordingCell {
    pub identifier: String,
    pub text: Option<String>,
}

impl ConfigurableCell for RecordingCell {
    fn configure(&mut self, view_model: &dyn ItemViewModel) {
        self.text = text_of(view_model);
    }
}

impl RenderSurface for RecordingSurface {
    type Cell = RecordingCell;

    fn register_reusable(&mut self, kind: &ReuseKind) -> Result<(), RegistrationError> {
        if self.missing.contains(&kind.identifier) {
            return Err(RegistrationError::ResourceNotFound {
                identifier: kind.identifier.clone(),
            });
        }
        self.registered.push(kind.clone());
        Ok(())
    }

    fn dequeue_reusable(&mut self, identifier: &str) -> Option<RecordingCell> {
        self.is_registered(identifier).then(|| RecordingCell {
            identifier: identifier.to_string(),
            text: None,
        })
    }

    fn apply(&mut self, script: &EditScript, snapshot: &Snapshot, transition: Transition) {
        assert!(!script.is_empty(), "surface was handed an empty script");
        self.layout = script.replay(&self.layout, snapshot);
        assert_eq!(self.layout, Layout::of(snapshot), "replayed layout diverged");
        self.commits.push((script.clone(), transition));
    }

    fn refresh(&mut self, _snapshot: &Snapshot) {
        self.refreshes += 1;
    }

    fn deselect_row(&mut self, at: IndexPath, _animated: bool) {
        self.deselected.push(at);
    }

    fn scroll_to_offset(&mut self, offset: f64, animated: bool) {
        self.scrolls.push(Scroll::Offset { offset, animated });
    }

    fn scroll_to_row(&mut self, at: IndexPath, position: ScrollPosition, animated: bool) {
        self.scrolls.push(Scroll::Row {
            at,
            position,
            animated,
        });
    }
}

/// Interactive row: tappable, deletable and mutable.
#[derive(Debug)]
pub struct Row {
    pub title: String,
    taps: AtomicUsize,
    delete: CallbackSlot,
    change: CallbackSlot,
}

impl Row {
    pub fn new(title: &str) -> Arc<Self> {
        Arc::new(Self {
            title: title.to_string(),
            taps: AtomicUsize::new(0),
            delete: CallbackSlot::new(),
            change: CallbackSlot::new(),
        })
    }

    pub fn taps(&self) -> usize {
        self.taps.load(Ordering::SeqCst)
    }

    /// What a swipe-to-delete in the cell would do
    pub fn request_delete(&self) -> bool {
        self.delete.fire()
    }

    /// What a content change in the cell would do
    pub fn request_refresh(&self) -> bool {
        self.change.fire()
    }
}

impl ItemViewModel for Row {
    fn reuse_identifier(&self) -> &str {
        "row"
    }

    fn cell_class(&self) -> Option<&'static str> {
        Some("RowCell")
    }

    fn item_height(&self) -> RowHeight {
        RowHeight::Fixed(44.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_tappable(&self) -> Option<&dyn Tappable> {
        Some(self)
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        Some(self)
    }

    fn as_mutable(&self) -> Option<&dyn Mutable> {
        Some(self)
    }
}

impl Tappable for Row {
    fn on_tap(&self) {
        self.taps.fetch_add(1, Ordering::SeqCst);
    }
}

impl Deletable for Row {
    fn on_delete(&self) -> &CallbackSlot {
        &self.delete
    }
}

impl Mutable for Row {
    fn on_change(&self) -> &CallbackSlot {
        &self.change
    }
}

/// Static text with no capabilities, loaded from a resource.
#[derive(Debug)]
pub struct Plain {
    pub title: String,
    reuse_identifier: String,
}

impl Plain {
    pub fn new(title: &str) -> Arc<Self> {
        Self::with_identifier(title, "plain")
    }

    pub fn with_identifier(title: &str, identifier: &str) -> Arc<Self> {
        Arc::new(Self {
            title: title.to_string(),
            reuse_identifier: identifier.to_string(),
        })
    }
}

impl ItemViewModel for Plain {
    fn reuse_identifier(&self) -> &str {
        &self.reuse_identifier
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Tappable section header with a fixed height.
#[derive(Debug)]
pub struct Header {
    pub title: String,
    taps: AtomicUsize,
}

impl Header {
    pub fn new(title: &str) -> Arc<Self> {
        Arc::new(Self {
            title: title.to_string(),
            taps: AtomicUsize::new(0),
        })
    }

    pub fn taps(&self) -> usize {
        self.taps.load(Ordering::SeqCst)
    }
}

impl ItemViewModel for Header {
    fn reuse_identifier(&self) -> &str {
        "header"
    }

    fn item_height(&self) -> RowHeight {
        RowHeight::Fixed(28.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_tappable(&self) -> Option<&dyn Tappable> {
        Some(self)
    }
}

impl Tappable for Header {
    fn on_tap(&self) {
        self.taps.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn text_of(view_model: &dyn ItemViewModel) -> Option<String> {
    let any = view_model.as_any();
    if let Some(row) = any.downcast_ref::<Row>() {
        return Some(row.title.clone());
    }
    if let Some(plain) = any.downcast_ref::<Plain>() {
        return Some(plain.title.clone());
    }
    any.downcast_ref::<Header>().map(|header| header.title.clone())
}

/// A row item together with its view-model, so tests can poke it
pub fn row(title: &str) -> (Item, Arc<Row>) {
    let view_model = Row::new(title);
    (Item::new(view_model.clone()), view_model)
}

pub fn plain(title: &str) -> Item {
    Item::new(Plain::new(title))
}

pub fn plain_section(titles: &[&str]) -> Section {
    Section::new(titles.iter().map(|t| plain(t)).collect())
}

/// Row titles per section, in order
pub fn titles(snapshot: &Snapshot) -> Vec<Vec<String>> {
    snapshot
        .sections()
        .iter()
        .map(|section| {
            section
                .items
                .iter()
                .map(|item| text_of(item.view_model().as_ref()).unwrap_or_default())
                .collect()
        })
        .collect()
}
