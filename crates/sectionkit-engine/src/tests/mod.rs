//! Fixtures shared by the unit tests.

use std::any::Any;
use std::sync::Arc;

use crate::capability::ItemViewModel;
use crate::models::{Item, Section};
use crate::snapshot::Snapshot;

/// Plain view-model identified by its title in assertions.
#[derive(Debug)]
pub struct Label {
    pub title: String,
}

impl Label {
    pub fn new(title: &str) -> Arc<Self> {
        Arc::new(Self {
            title: title.to_string(),
        })
    }
}

impl ItemViewModel for Label {
    fn reuse_identifier(&self) -> &str {
        "label"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn item(title: &str) -> Item {
    Item::new(Label::new(title))
}

pub fn title(item: &Item) -> String {
    item.view_model()
        .as_any()
        .downcast_ref::<Label>()
        .map(|label| label.title.clone())
        .unwrap_or_else(|| "?".to_string())
}

/// Row titles per section, in order
pub fn titles(snapshot: &Snapshot) -> Vec<Vec<String>> {
    snapshot
        .sections()
        .iter()
        .map(|section| section.items.iter().map(title).collect())
        .collect()
}

pub fn section(titles: &[&str]) -> Section {
    Section::new(titles.iter().map(|t| item(t)).collect())
}
