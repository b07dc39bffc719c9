//! View-models for the demo feed.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sectionkit_engine::{
    CallbackSlot, Deletable, Item, ItemViewModel, Mutable, RowHeight, Section, Tappable,
};

pub const ROWS_PER_PAGE: usize = 8;

/// A post: tapping likes it, and it can delete itself.
#[derive(Debug)]
pub struct FeedRow {
    pub title: String,
    likes: AtomicUsize,
    delete: CallbackSlot,
    change: CallbackSlot,
}

impl FeedRow {
    pub fn new(title: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            title: title.into(),
            likes: AtomicUsize::new(0),
            delete: CallbackSlot::new(),
            change: CallbackSlot::new(),
        })
    }

    pub fn likes(&self) -> usize {
        self.likes.load(Ordering::SeqCst)
    }
}

impl ItemViewModel for FeedRow {
    fn reuse_identifier(&self) -> &str {
        "feed-row"
    }

    fn cell_class(&self) -> Option<&'static str> {
        Some("FeedRowCell")
    }

    fn item_height(&self) -> RowHeight {
        RowHeight::Fixed(1.0)
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

impl Tappable for FeedRow {
    fn on_tap(&self) {
        self.likes.fetch_add(1, Ordering::SeqCst);
        self.change.fire();
    }
}

impl Deletable for FeedRow {
    fn on_delete(&self) -> &CallbackSlot {
        &self.delete
    }
}

impl Mutable for FeedRow {
    fn on_change(&self) -> &CallbackSlot {
        &self.change
    }
}

/// Section title; tapping pins or unpins it.
#[derive(Debug)]
pub struct FeedHeader {
    pub title: String,
    pinned: AtomicBool,
    change: CallbackSlot,
}

impl FeedHeader {
    pub fn new(title: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            title: title.into(),
            pinned: AtomicBool::new(false),
            change: CallbackSlot::new(),
        })
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.load(Ordering::SeqCst)
    }
}

impl ItemViewModel for FeedHeader {
    fn reuse_identifier(&self) -> &str {
        "feed-header"
    }

    fn cell_class(&self) -> Option<&'static str> {
        Some("FeedHeaderCell")
    }

    fn item_height(&self) -> RowHeight {
        RowHeight::Fixed(1.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_tappable(&self) -> Option<&dyn Tappable> {
        Some(self)
    }

    fn as_mutable(&self) -> Option<&dyn Mutable> {
        Some(self)
    }
}

impl Tappable for FeedHeader {
    fn on_tap(&self) {
        self.pinned.fetch_xor(true, Ordering::SeqCst);
        self.change.fire();
    }
}

impl Mutable for FeedHeader {
    fn on_change(&self) -> &CallbackSlot {
        &self.change
    }
}

/// Static notice loaded from the "banner" resource.
#[derive(Debug)]
pub struct Banner {
    pub text: String,
}

impl ItemViewModel for Banner {
    fn reuse_identifier(&self) -> &str {
        "banner"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One line of text for whatever view-model a cell was configured with
pub fn describe(view_model: &dyn ItemViewModel) -> String {
    let any = view_model.as_any();
    if let Some(row) = any.downcast_ref::<FeedRow>() {
        return match row.likes() {
            0 => row.title.clone(),
            likes => format!("{}  ♥ {likes}", row.title),
        };
    }
    if let Some(header) = any.downcast_ref::<FeedHeader>() {
        let pin = if header.is_pinned() { "📌 " } else { "" };
        return format!("{pin}{}", header.title);
    }
    if let Some(banner) = any.downcast_ref::<Banner>() {
        return banner.text.clone();
    }
    format!("<{}>", view_model.reuse_identifier())
}

pub fn post(title: impl Into<String>) -> Item {
    Item::new(FeedRow::new(title))
}

/// Rows for page `page` of the endless "Older" section
pub fn page(page: usize) -> Vec<Item> {
    (0..ROWS_PER_PAGE)
        .map(|n| post(format!("Older post {}", page * ROWS_PER_PAGE + n + 1)))
        .collect()
}

pub fn initial_feed() -> Vec<Section> {
    vec![
        Section::new(vec![Item::new(Arc::new(Banner {
            text: "Welcome to sectionkit. Press ? for keys.".to_string(),
        }))]),
        Section::with_header(
            vec![post("Release notes"), post("Roadmap"), post("Call for testers")],
            Item::new(FeedHeader::new("Pinned")),
        ),
        Section::with_header(page(0), Item::new(FeedHeader::new("Older"))),
    ]
}
