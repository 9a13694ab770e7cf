//! Indexmap-backed scene graph for hosts without one of their own

use super::{SceneGraph, SceneTile};
use crate::engine::{TileId, TileRect};
use indexmap::IndexMap;

/// Ordered display list keyed by tile id, with a drainable dirty-region
/// queue the host consumes on each redraw pass.
#[derive(Debug, Default)]
pub struct DisplayList {
    items: IndexMap<TileId, SceneTile>,
    dirty: Vec<TileRect>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: TileId) -> Option<&SceneTile> {
        self.items.get(&id)
    }

    /// Items in insertion order
    pub fn items(&self) -> impl Iterator<Item = &SceneTile> {
        self.items.values()
    }

    /// Drain the regions invalidated since the last call
    pub fn take_dirty(&mut self) -> Vec<TileRect> {
        std::mem::take(&mut self.dirty)
    }

    /// Drop every item and pending dirty region
    pub fn clear(&mut self) {
        self.items.clear();
        self.dirty.clear();
    }
}

impl SceneGraph for DisplayList {
    fn depths(&self) -> Vec<i32> {
        self.items.values().map(|tile| tile.depth).collect()
    }

    fn insert(&mut self, tile: SceneTile) {
        self.dirty.push(tile.rect);
        self.items.insert(tile.id, tile);
    }

    fn set_depth(&mut self, id: TileId, depth: i32) {
        if let Some(tile) = self.items.get_mut(&id) {
            tile.depth = depth;
            self.dirty.push(tile.rect);
        }
    }

    fn invalidate(&mut self, id: TileId) {
        if let Some(tile) = self.items.get(&id) {
            self.dirty.push(tile.rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(id: u64, depth: i32) -> SceneTile {
        SceneTile {
            id: TileId(id),
            rect: TileRect::new(0, 0, 64, 64),
            depth,
        }
    }

    #[test]
    fn test_insert_preserves_order_and_keys_by_id() {
        let mut list = DisplayList::new();
        list.insert(tile(2, 0));
        list.insert(tile(1, 0));
        list.insert(tile(3, 0));

        let order: Vec<TileId> = list.items().map(|t| t.id).collect();
        assert_eq!(order, vec![TileId(2), TileId(1), TileId(3)]);
    }

    #[test]
    fn test_reinsert_replaces_entry() {
        let mut list = DisplayList::new();
        list.insert(tile(1, 0));
        list.insert(tile(1, 5));
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(TileId(1)).map(|t| t.depth), Some(5));
    }

    #[test]
    fn test_set_depth_ignores_unknown_id() {
        let mut list = DisplayList::new();
        list.set_depth(TileId(9), 3);
        assert!(list.is_empty());
    }

    #[test]
    fn test_invalidate_queues_region_without_changing_count() {
        let mut list = DisplayList::new();
        list.insert(tile(1, 0));
        list.take_dirty();

        list.invalidate(TileId(1));
        assert_eq!(list.len(), 1);
        assert_eq!(list.take_dirty().len(), 1);
    }

    #[test]
    fn test_take_dirty_drains() {
        let mut list = DisplayList::new();
        list.insert(tile(1, 0));
        assert_eq!(list.take_dirty().len(), 1);
        assert!(list.take_dirty().is_empty());
    }
}
