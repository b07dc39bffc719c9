//! Line-based list surface for the terminal.
//!
//! Every header and row takes one line. The surface keeps an identity
//! [`Layout`] by replaying the scripts it is given, which is all it needs
//! to map rows to lines and scroll.

use std::collections::{HashMap, HashSet};

use sectionkit_engine::{
    CellSource, ConfigurableCell, EditScript, IndexPath, ItemViewModel, Layout, RegistrationError,
    RenderSurface, ReuseKind, ScrollPosition, Snapshot, Transition,
};

use crate::feed;

/// Cell classes this surface knows how to build.
const CELL_CLASSES: &[&str] = &["FeedRowCell", "FeedHeaderCell"];

/// One rendered line of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerminalCell {
    pub text: String,
}

impl ConfigurableCell for TerminalCell {
    fn configure(&mut self, view_model: &dyn ItemViewModel) {
        self.text = feed::describe(view_model);
    }
}

/// What occupies a line of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Header(usize),
    Row(IndexPath),
}

#[derive(Debug)]
pub struct TerminalSurface {
    layout: Layout,
    has_header: Vec<bool>,
    resources: HashSet<String>,
    registered: HashMap<String, CellSource>,
    /// First visible line
    pub offset: usize,
    pub viewport: usize,
    /// Row briefly shown as selected until the data source deselects it
    pub highlighted: Option<IndexPath>,
    /// Short description of the last committed change, for the status bar
    pub last_change: String,
}

impl TerminalSurface {
    pub fn new(resources: &[&str]) -> Self {
        Self {
            layout: Layout::default(),
            has_header: Vec::new(),
            resources: resources.iter().map(|r| r.to_string()).collect(),
            registered: HashMap::new(),
            offset: 0,
            viewport: 0,
            highlighted: None,
            last_change: String::new(),
        }
    }

    /// Every line in display order
    pub fn lines(&self) -> Vec<Line> {
        let mut lines = Vec::with_capacity(self.layout.row_count() + self.layout.sections.len());
        for (section, laid_out) in self.layout.sections.iter().enumerate() {
            if self.has_header.get(section).copied().unwrap_or(false) {
                lines.push(Line::Header(section));
            }
            lines.extend((0..laid_out.rows.len()).map(|row| Line::Row(IndexPath::new(section, row))));
        }
        lines
    }

    pub fn line_of(&self, at: IndexPath) -> Option<usize> {
        self.lines().iter().position(|line| *line == Line::Row(at))
    }

    /// Total content height in lines
    pub fn content_extent(&self) -> usize {
        self.lines().len()
    }

    fn max_offset(&self) -> usize {
        self.content_extent().saturating_sub(self.viewport)
    }

    /// Scroll just enough for `line` to be visible
    pub fn reveal(&mut self, line: usize) {
        if line < self.offset {
            self.offset = line;
        } else if self.viewport > 0 && line >= self.offset + self.viewport {
            self.offset = line + 1 - self.viewport;
        }
    }

    fn remember_headers(&mut self, snapshot: &Snapshot) {
        self.has_header = snapshot
            .sections()
            .iter()
            .map(|section| section.header.is_some())
            .collect();
    }
}

impl RenderSurface for TerminalSurface {
    type Cell = TerminalCell;

    fn register_reusable(&mut self, kind: &ReuseKind) -> Result<(), RegistrationError> {
        match kind.source {
            CellSource::Class(class) if !CELL_CLASSES.contains(&class) => {
                return Err(RegistrationError::UnknownClass {
                    identifier: kind.identifier.clone(),
                    class,
                });
            }
            CellSource::Resource if !self.resources.contains(&kind.identifier) => {
                return Err(RegistrationError::ResourceNotFound {
                    identifier: kind.identifier.clone(),
                });
            }
            _ => {}
        }
        self.registered
            .insert(kind.identifier.clone(), kind.source.clone());
        Ok(())
    }

    fn dequeue_reusable(&mut self, identifier: &str) -> Option<TerminalCell> {
        self.registered
            .contains_key(identifier)
            .then(TerminalCell::default)
    }

    fn apply(&mut self, script: &EditScript, snapshot: &Snapshot, transition: Transition) {
        self.layout = script.replay(&self.layout, snapshot);
        self.remember_headers(snapshot);
        self.offset = self.offset.min(self.max_offset());
        self.last_change = if transition.animated {
            format!("{} edits ({:?})", script.len(), transition.animation)
        } else {
            format!("{} edits", script.len())
        };
    }

    fn refresh(&mut self, snapshot: &Snapshot) {
        self.remember_headers(snapshot);
    }

    fn deselect_row(&mut self, at: IndexPath, _animated: bool) {
        if self.highlighted == Some(at) {
            self.highlighted = None;
        }
    }

    fn scroll_to_offset(&mut self, offset: f64, _animated: bool) {
        self.offset = (offset.max(0.0) as usize).min(self.max_offset());
    }

    fn scroll_to_row(&mut self, at: IndexPath, position: ScrollPosition, _animated: bool) {
        let Some(line) = self.line_of(at) else {
            return;
        };
        let offset = match position {
            ScrollPosition::None => {
                self.reveal(line);
                return;
            }
            ScrollPosition::Top => line,
            ScrollPosition::Middle => line.saturating_sub(self.viewport / 2),
            ScrollPosition::Bottom => (line + 1).saturating_sub(self.viewport),
        };
        self.offset = offset.min(self.max_offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{initial_feed, post};
    use pretty_assertions::assert_eq;
    use sectionkit_engine::{DataSource, Section};

    fn presented() -> DataSource<TerminalSurface> {
        let mut source = DataSource::new(TerminalSurface::new(&["banner"]));
        source.handle().set_sections(initial_feed());
        source.run_pending();
        source
    }

    #[test]
    fn test_headers_take_a_line() {
        let source = presented();
        let lines = source.surface().lines();

        assert_eq!(lines[0], Line::Row(IndexPath::new(0, 0)));
        assert_eq!(lines[1], Line::Header(1));
        assert_eq!(lines[2], Line::Row(IndexPath::new(1, 0)));
        assert_eq!(source.surface().content_extent(), 1 + 4 + 9);
    }

    #[test]
    fn test_scroll_to_bottom_shows_last_row() {
        let mut source = presented();
        source.surface_mut().viewport = 5;
        source
            .handle()
            .scroll_to_bottom(ScrollPosition::Bottom, true);
        source.run_pending();

        let surface = source.surface();
        assert_eq!(surface.offset, surface.content_extent() - 5);
    }

    #[test]
    fn test_removing_rows_pulls_offset_back() {
        let mut source = presented();
        source.surface_mut().viewport = 5;
        source.surface_mut().offset = 9;
        source.handle().set_sections(vec![Section::new(vec![post("only")])]);
        source.run_pending();

        assert_eq!(source.surface().offset, 0);
        assert_eq!(source.surface().lines(), vec![Line::Row(IndexPath::new(0, 0))]);
    }

    #[test]
    #[should_panic(expected = "no cell resource named \"banner\"")]
    fn test_missing_banner_resource_is_fatal() {
        let mut source = DataSource::new(TerminalSurface::new(&[]));
        source.handle().set_sections(initial_feed());
        source.run_pending();
    }
}
