mod feed;
mod surface;

use std::io::{Stdout, stdout};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use sectionkit_config::Config;
use sectionkit_engine::{
    DataSource, DataSourceOptions, IndexPath, Item, ListHandle, Position, ScrollMetrics,
    ScrollPosition, Section,
};

use crate::feed::{FeedHeader, post};
use crate::surface::{Line as ListLine, TerminalSurface};

const MAX_PAGES: usize = 6;

struct App {
    source: DataSource<TerminalSurface>,
    list: ListHandle,
    /// Index of the selected row across all sections
    cursor: usize,
    created: usize,
    status: String,
    show_help: bool,
}

impl App {
    fn new(options: DataSourceOptions) -> Self {
        let mut source = DataSource::with_options(TerminalSurface::new(&["banner"]), options);
        let list = source.handle();

        // Endless feed: load another page whenever the bottom comes within reach.
        // Edge callbacks fire on every qualifying scroll, so latch while a page is loading.
        let loading = Arc::new(AtomicBool::new(false));
        let pages = Arc::new(AtomicUsize::new(1));
        let pager = list.clone();
        source.set_on_reach_bottom(move || {
            if pages.load(Ordering::SeqCst) >= MAX_PAGES || loading.swap(true, Ordering::SeqCst) {
                return;
            }
            let page = pages.fetch_add(1, Ordering::SeqCst);
            let older = pager.sections().last().map(Section::id);
            let loading = loading.clone();
            log::debug!("loading page {page}");
            pager.append_items(
                feed::page(page),
                older,
                Some(Box::new(move || loading.store(false, Ordering::SeqCst))),
            );
        });
        source.set_on_reach_top(|| log::trace!("reached top"));

        list.set_sections(feed::initial_feed());
        source.run_pending();

        Self {
            source,
            list,
            cursor: 0,
            created: 0,
            status: String::new(),
            show_help: false,
        }
    }

    fn rows(&self) -> Vec<IndexPath> {
        self.source
            .surface()
            .lines()
            .into_iter()
            .filter_map(|line| match line {
                ListLine::Row(at) => Some(at),
                ListLine::Header(_) => None,
            })
            .collect()
    }

    fn selected(&self) -> Option<IndexPath> {
        self.rows().get(self.cursor).copied()
    }

    fn next_row(&mut self) {
        let count = self.rows().len();
        if count > 0 {
            self.cursor = (self.cursor + 1).min(count - 1);
        }
        self.follow_cursor();
    }

    fn previous_row(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.follow_cursor();
    }

    /// Keep the cursor on screen and report the scroll position
    fn follow_cursor(&mut self) {
        if let Some(line) = self.selected().and_then(|at| self.source.surface().line_of(at)) {
            self.source.surface_mut().reveal(line);
        }
        self.report_scroll();
    }

    fn report_scroll(&mut self) {
        let surface = self.source.surface();
        let metrics = ScrollMetrics {
            offset: surface.offset as f64,
            content_extent: surface.content_extent() as f64,
            viewport_extent: surface.viewport as f64,
        };
        self.source.did_scroll(metrics);
    }

    fn tap(&mut self) {
        if let Some(at) = self.selected() {
            self.source.surface_mut().highlighted = Some(at);
            self.source.did_select_row(at);
        }
    }

    fn tap_header(&mut self) {
        let Some(at) = self.selected() else { return };
        match self.source.header_view(at.section) {
            Some(header) => match header.tap {
                Some(tap) => tap.fire(),
                None => self.status = format!("\"{}\" cannot be tapped", header.cell.text),
            },
            None => self.status = "this section has no header".to_string(),
        }
    }

    /// Let the row delete itself, the way a swipe action would
    fn delete_selected(&mut self) {
        let fired = self
            .selected()
            .and_then(|at| self.source.item_at(at))
            .and_then(|item| item.view_model().as_deletable().map(|d| d.on_delete().fire()));
        if fired != Some(true) {
            self.status = "this row cannot be deleted".to_string();
        }
    }

    fn remove_selected(&mut self) {
        if let Some(at) = self.selected() {
            self.list.remove_at(&[at], None);
        }
    }

    fn insert_after_selected(&mut self) {
        self.created += 1;
        let item = post(format!("New post {}", self.created));
        match self.selected() {
            Some(at) => self.list.insert_items_at(vec![item], Position::After, at, None),
            None => self.list.set_sections(vec![Section::new(vec![item])]),
        }
    }

    fn add_section(&mut self) {
        self.created += 1;
        let header = Item::new(FeedHeader::new(format!("Section {}", self.created)));
        self.list
            .append_sections(vec![Section::with_header(Vec::new(), header)], None);
    }

    /// Swap the selected row with its neighbour in display order
    fn move_selected(&mut self, down: bool) {
        let rows = self.rows();
        let Some(&from) = rows.get(self.cursor) else {
            return;
        };
        let neighbour = if down {
            rows.get(self.cursor + 1)
        } else {
            self.cursor.checked_sub(1).and_then(|i| rows.get(i))
        };
        let Some(&to) = neighbour else { return };
        let position = if down { Position::After } else { Position::Before };
        self.list.move_item_at(from, position, to, None);
        self.cursor = if down { self.cursor + 1 } else { self.cursor - 1 };
    }

    fn reload_selected(&mut self) {
        if let Some(at) = self.selected() {
            self.list.reload_items_at(&[at], None);
        }
    }

    /// Apply queued edits, then keep the cursor within the list
    fn settle(&mut self) {
        if self.source.run_pending() > 0 {
            let count = self.rows().len();
            self.cursor = self.cursor.min(count.saturating_sub(1));
            self.status = self.source.surface().last_change.clone();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = match Config::load() {
        Ok(Some(config)) => config.options(),
        Ok(None) => DataSourceOptions {
            // Lines, not points
            edge_completion_offset: 2.0,
            ..DataSourceOptions::default()
        },
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            std::process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.settle();
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Char('?') => app.show_help = !app.show_help,
            KeyCode::Down | KeyCode::Char('j') => app.next_row(),
            KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
            KeyCode::Enter | KeyCode::Char(' ') => app.tap(),
            KeyCode::Char('h') => app.tap_header(),
            KeyCode::Char('d') => app.delete_selected(),
            KeyCode::Char('x') => app.remove_selected(),
            KeyCode::Char('a') => app.insert_after_selected(),
            KeyCode::Char('s') => app.add_section(),
            KeyCode::Char('J') => app.move_selected(true),
            KeyCode::Char('K') => app.move_selected(false),
            KeyCode::Char('r') => app.reload_selected(),
            KeyCode::Char('c') => app.list.remove_all(None),
            KeyCode::Char('g') => {
                app.cursor = 0;
                app.list.scroll_to_top(true);
            }
            KeyCode::Char('G') => {
                app.cursor = app.rows().len().saturating_sub(1);
                app.list.scroll_to_bottom(ScrollPosition::Bottom, true);
            }
            KeyCode::Char('R') => app.list.set_sections(feed::initial_feed()),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());

    let list_area = chunks[0];
    let viewport = list_area.height.saturating_sub(2) as usize;
    if app.source.surface().viewport != viewport {
        app.source.surface_mut().viewport = viewport;
        app.report_scroll();
    }

    let selected = app.selected();
    let offset = app.source.surface().offset;
    let visible: Vec<ListLine> = app
        .source
        .surface()
        .lines()
        .into_iter()
        .skip(offset)
        .take(viewport)
        .collect();

    let mut lines = Vec::with_capacity(visible.len());
    for line in visible {
        let rendered = match line {
            ListLine::Header(section) => app.source.header_view(section).map(|header| {
                Line::from(Span::styled(
                    header.cell.text,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            }),
            ListLine::Row(at) => app.source.cell_for_row(at).map(|cell| {
                let style = if Some(at) == selected {
                    Style::default().bg(Color::Yellow).fg(Color::Black)
                } else if app.source.surface().highlighted == Some(at) {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(format!("  {}", cell.text), style))
            }),
        };
        lines.push(rendered.unwrap_or_default());
    }

    let title = format!(
        "Feed ({} sections, {} rows)",
        app.source.number_of_sections(),
        app.source.snapshot().item_count()
    );
    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, list_area);

    let help = if app.show_help {
        "j/k move | Enter tap | h header | d delete | x remove | a add | s section | J/K reorder | r reload | c clear | g/G top/bottom | R reset | q quit"
    } else {
        "? keys | q quit"
    };
    let status = Line::from(vec![
        Span::raw(help),
        Span::raw("  "),
        Span::styled(app.status.clone(), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(vec![status]), chunks[1]);
}
