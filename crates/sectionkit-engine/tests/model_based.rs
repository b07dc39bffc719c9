//! Random edit sequences against a plain reference model. After every step
//! the surface, which only ever sees edit scripts, must show exactly what
//! the model holds.

mod common;

use common::{Plain, RecordingSurface};
use proptest::prelude::*;
use proptest::sample::Index;
use sectionkit_engine::{
    DataSource, IndexPath, Item, ItemId, Layout, LayoutSection, Position, Section, SectionId,
};

#[derive(Debug, Clone)]
enum Op {
    AppendSection(usize),
    AppendItem(Index),
    Insert(Index, Position),
    Remove(Index),
    MoveItem(Index, Index, Position),
    MoveSection(Index, Index, Position),
    Reload(Index),
    Rotate(usize),
    RemoveAll,
}

fn position() -> impl Strategy<Value = Position> {
    prop_oneof![Just(Position::Before), Just(Position::After)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..4).prop_map(Op::AppendSection),
        4 => any::<Index>().prop_map(Op::AppendItem),
        4 => (any::<Index>(), position()).prop_map(|(at, p)| Op::Insert(at, p)),
        4 => any::<Index>().prop_map(Op::Remove),
        4 => (any::<Index>(), any::<Index>(), position())
            .prop_map(|(from, to, p)| Op::MoveItem(from, to, p)),
        2 => (any::<Index>(), any::<Index>(), position())
            .prop_map(|(from, to, p)| Op::MoveSection(from, to, p)),
        2 => any::<Index>().prop_map(Op::Reload),
        2 => (1usize..8).prop_map(Op::Rotate),
        1 => Just(Op::RemoveAll),
    ]
}

fn fresh() -> Item {
    Item::new(Plain::new("row"))
}

#[derive(Debug, Default)]
struct Model {
    sections: Vec<(SectionId, Vec<ItemId>)>,
}

impl Model {
    fn flat(&self) -> Vec<ItemId> {
        self.sections
            .iter()
            .flat_map(|(_, rows)| rows.iter().copied())
            .collect()
    }

    fn path_of(&self, item: ItemId) -> IndexPath {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section, (_, rows))| {
                rows.iter()
                    .position(|r| *r == item)
                    .map(|row| IndexPath::new(section, row))
            })
            .unwrap()
    }

    fn insert_next_to(&mut self, item: ItemId, position: Position, target: ItemId) {
        let at = self.path_of(target);
        let row = match position {
            Position::Before => at.row,
            Position::After => at.row + 1,
        };
        self.sections[at.section].1.insert(row, item);
    }

    fn layout(&self) -> Layout {
        Layout {
            sections: self
                .sections
                .iter()
                .map(|(id, rows)| LayoutSection {
                    id: *id,
                    rows: rows.clone(),
                })
                .collect(),
        }
    }
}

/// Apply `op` through the handle and to the model
fn step(source: &mut DataSource<RecordingSurface>, model: &mut Model, op: &Op) {
    let list = source.handle();
    let flat = model.flat();
    match op {
        Op::AppendSection(rows) => {
            let section = Section::new((0..*rows).map(|_| fresh()).collect());
            model.sections.push((
                section.id(),
                section.items.iter().map(Item::id).collect(),
            ));
            list.append_sections(vec![section], None);
        }
        Op::AppendItem(at) => {
            if model.sections.is_empty() {
                return;
            }
            let index = at.index(model.sections.len());
            let item = fresh();
            model.sections[index].1.push(item.id());
            list.append_items(vec![item], Some(model.sections[index].0), None);
        }
        Op::Insert(at, position) => {
            if flat.is_empty() {
                return;
            }
            let anchor = flat[at.index(flat.len())];
            let item = fresh();
            model.insert_next_to(item.id(), *position, anchor);
            list.insert_items(vec![item], *position, anchor, None);
        }
        Op::Remove(at) => {
            if flat.is_empty() {
                return;
            }
            let item = flat[at.index(flat.len())];
            let path = model.path_of(item);
            model.sections[path.section].1.remove(path.row);
            list.remove_items(vec![item], None);
        }
        Op::MoveItem(from, to, position) => {
            if flat.is_empty() {
                return;
            }
            let item = flat[from.index(flat.len())];
            let target = flat[to.index(flat.len())];
            if item != target {
                let path = model.path_of(item);
                model.sections[path.section].1.remove(path.row);
                model.insert_next_to(item, *position, target);
            }
            list.move_item(item, *position, target, None);
        }
        Op::MoveSection(from, to, position) => {
            if model.sections.is_empty() {
                return;
            }
            let from = from.index(model.sections.len());
            let section = model.sections[from].0;
            let target = model.sections[to.index(model.sections.len())].0;
            if section != target {
                let moved = model.sections.remove(from);
                let to = model
                    .sections
                    .iter()
                    .position(|(id, _)| *id == target)
                    .unwrap();
                let index = match position {
                    Position::Before => to,
                    Position::After => to + 1,
                };
                model.sections.insert(index, moved);
            }
            list.move_section(section, *position, target, None);
        }
        Op::Reload(at) => {
            if flat.is_empty() {
                return;
            }
            list.reload_items(vec![flat[at.index(flat.len())]], None);
        }
        Op::Rotate(by) => {
            if flat.is_empty() {
                return;
            }
            let mut sections = list.sections();
            let mut items: Vec<Item> = sections
                .iter_mut()
                .flat_map(|s| std::mem::take(&mut s.items))
                .collect();
            let len = items.len();
            items.rotate_left(by % len);
            let mut items = items.into_iter();
            for (section, (_, rows)) in sections.iter_mut().zip(model.sections.iter_mut()) {
                section.items = items.by_ref().take(rows.len()).collect();
                *rows = section.items.iter().map(Item::id).collect();
            }
            list.set_sections(sections);
        }
        Op::RemoveAll => {
            model.sections.clear();
            list.remove_all(None);
        }
    }
}

proptest! {
    #[test]
    fn surface_tracks_every_edit(ops in prop::collection::vec(op(), 1..40)) {
        let mut source = DataSource::new(RecordingSurface::new());
        let mut model = Model::default();

        for op in &ops {
            step(&mut source, &mut model, op);
            source.run_pending();

            let expected = model.layout();
            prop_assert_eq!(&Layout::of(source.snapshot()), &expected);
            prop_assert_eq!(&source.surface().layout, &expected);
        }
    }

    #[test]
    fn batched_edits_end_in_the_same_place(ops in prop::collection::vec(op(), 1..20)) {
        let mut source = DataSource::new(RecordingSurface::new());
        let mut model = Model::default();

        // Queue everything first: identities resolve against the snapshot
        // at processing time, so the batch must agree with the model too.
        for op in ops.iter().filter(|op| !matches!(op, Op::Rotate(_))) {
            step(&mut source, &mut model, op);
        }
        source.run_pending();

        prop_assert_eq!(&source.surface().layout, &model.layout());
    }
}
