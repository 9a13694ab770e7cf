//! Notification bridge - forwards engine tile events onto a scene graph

use crate::engine::{SurfaceSize, TileObserver, TileRef};
use crate::scene::{SceneTile, SharedScene};

/// Sentinel for [`SceneBridge::new`]: pick a depth above everything
/// already in the scene.
pub const AUTO_DEPTH: i32 = -1;

/// Subscribes to the engine's tile lifecycle and mirrors it into one scene
/// graph. The depth is fixed at construction; every tile this bridge
/// inserts shares it.
pub struct SceneBridge {
    scene: SharedScene,
    depth: i32,
}

impl SceneBridge {
    /// Bind to `scene`. A negative `requested_depth` auto-computes one
    /// greater than the maximum depth currently in the scene, floor 0.
    pub fn new(scene: SharedScene, requested_depth: i32) -> Self {
        let depth = if requested_depth < 0 {
            let mut depth = 0;
            for item_depth in scene.read().depths() {
                if item_depth + 1 > depth {
                    depth = item_depth + 1;
                }
            }
            depth
        } else {
            requested_depth
        };

        tracing::debug!(depth, "scene bridge created");
        Self { scene, depth }
    }

    /// The fixed z-order assigned to tiles this bridge inserts
    pub fn depth(&self) -> i32 {
        self.depth
    }
}

impl TileObserver for SceneBridge {
    fn tile_created(&self, _surface: SurfaceSize, tile: &TileRef) {
        self.scene.write().insert(SceneTile {
            id: tile.id,
            rect: tile.rect,
            depth: self.depth,
        });
    }

    fn tile_updated(&self, _surface: SurfaceSize, tile: &TileRef) {
        self.scene.write().invalidate(tile.id);
    }

    fn surface_cleared(&self, _surface: SurfaceSize) {
        // Intentionally left to the host: the scene keeps its items and
        // decides itself whether a cleared surface should empty the
        // display list.
        tracing::debug!("surface cleared, scene left untouched");
    }
}
