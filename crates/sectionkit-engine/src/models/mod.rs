pub mod identity;
pub mod item;
pub mod section;

pub use identity::{ItemId, SectionId};
pub use item::{IndexPath, Item, Position};
pub use section::Section;
