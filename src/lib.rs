//! brushscene - adapter between a tile-based brush engine and a 2D scene
//! graph.
//!
//! A [`PaintContext`] owns a brush engine (anything implementing
//! [`PaintEngine`]) and exposes the flat stroke/brush/render surface a
//! host calls into. Attaching a scene via
//! [`PaintContext::add_to_scene`] wires a [`SceneBridge`] that mirrors
//! the engine's tile lifecycle into the scene's display list, so redraw
//! stays incremental per tile.

pub mod bridge;
pub mod context;
pub mod engine;
pub mod library;
pub mod scene;

pub use bridge::{SceneBridge, AUTO_DEPTH};
pub use context::PaintContext;
pub use engine::{
    BrushSetting, GridEngine, PaintEngine, SurfaceSize, TileId, TileObserver, TileRect, TileRef,
    TILE_SIZE,
};
pub use library::{BrushGroup, BrushInfo, BrushLibrary, LibraryError};
pub use scene::{DisplayList, SceneGraph, SceneTile, SharedScene};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber. For binaries and demos; hosts
/// with their own subscriber skip this.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brushscene=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
