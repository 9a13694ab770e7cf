//! Scene graph seam - the display-side contract the bridge drives

mod display_list;

pub use display_list::DisplayList;

use crate::engine::{TileId, TileRect};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One display-list entry.
///
/// The scene owns this record, never the tile's pixel memory; `rect` is
/// where the engine composites the tile on screen and `depth` orders
/// overlapping items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneTile {
    pub id: TileId,
    pub rect: TileRect,
    pub depth: i32,
}

/// 2D scene graph as consumed by the notification bridge
pub trait SceneGraph {
    /// Depth of every item currently in the display list
    fn depths(&self) -> Vec<i32>;

    /// Add an item; replaces any existing item with the same id
    fn insert(&mut self, tile: SceneTile);

    /// Reorder an existing item. Unknown ids are ignored.
    fn set_depth(&mut self, id: TileId, depth: i32);

    /// Mark an item's on-screen region dirty for the next redraw pass.
    /// Unknown ids are ignored.
    fn invalidate(&mut self, id: TileId);
}

/// Scene handle shared between the host and the notification bridge
pub type SharedScene = Arc<RwLock<dyn SceneGraph>>;
