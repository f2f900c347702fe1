// src/components/mod.rs

pub mod card;
pub mod combination;
pub mod drag_context;
pub mod drop_target;
pub mod hand;

pub use card::{Card, Rank, Suit};
pub use combination::{CombinationKind, CombinationSlot, MIN_COMBINATION_SIZE};
pub use drag_context::{DragContext, DragOrigin, PointerKind};
pub use drop_target::{DropTarget, ZoneKind};
pub use hand::HandSlot;
