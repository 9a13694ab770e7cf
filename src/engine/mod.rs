//! Engine seam - the brush engine contract and its tile notification channel

mod dab;
mod grid;

pub use grid::{GridEngine, TILE_SIZE};

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Paint surface dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned pixel rectangle, the footprint of a tile on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Stable identifier for a tile within one surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u64);

/// Borrowed view of a tile handed to observers.
///
/// Carries identity and footprint only; pixel storage stays inside the
/// engine. Observers hand the id and rect on to a display list, they never
/// take ownership of raster memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRef {
    pub id: TileId,
    pub rect: TileRect,
}

/// Enumerated brush parameters, mirroring the engine's setting table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrushSetting {
    /// Natural log of the dab radius in pixels
    RadiusLogarithmic,
    /// Base opacity (0.0 - 1.0)
    Opaque,
    /// Edge falloff (0.0 = soft, 1.0 = hard)
    Hardness,
    ColorH,
    ColorS,
    ColorV,
    Eraser,
    Smudge,
}

impl BrushSetting {
    pub const ALL: [BrushSetting; 8] = [
        BrushSetting::RadiusLogarithmic,
        BrushSetting::Opaque,
        BrushSetting::Hardness,
        BrushSetting::ColorH,
        BrushSetting::ColorS,
        BrushSetting::ColorV,
        BrushSetting::Eraser,
        BrushSetting::Smudge,
    ];

    /// Built-in default, the value a freshly loaded brush starts from
    pub fn default_value(self) -> f32 {
        match self {
            BrushSetting::RadiusLogarithmic => 2.0,
            BrushSetting::Opaque => 1.0,
            BrushSetting::Hardness => 0.8,
            BrushSetting::ColorH => 0.0,
            BrushSetting::ColorS => 0.0,
            BrushSetting::ColorV => 0.0,
            BrushSetting::Eraser => 0.0,
            BrushSetting::Smudge => 0.0,
        }
    }
}

/// Receiver for the engine's tile lifecycle notifications.
///
/// The engine invokes these synchronously on whichever thread performed the
/// mutating call, so handlers must not re-enter the engine.
pub trait TileObserver {
    /// A tile was allocated for the first time
    fn tile_created(&self, surface: SurfaceSize, tile: &TileRef);
    /// An existing tile's pixels changed
    fn tile_updated(&self, surface: SurfaceSize, tile: &TileRef);
    /// The whole surface was cleared and all tiles dropped
    fn surface_cleared(&self, surface: SurfaceSize);
}

/// Brush engine contract.
///
/// Implemented by the external engine binding the host supplies; the crate
/// ships [`GridEngine`] as a reference implementation for tests and demos.
/// A `PaintContext` owns exactly one engine, there is no process-wide
/// handle.
pub trait PaintEngine {
    fn set_surface_size(&mut self, size: SurfaceSize);
    fn surface_size(&self) -> SurfaceSize;

    /// Blank the surface, drop every tile, notify observers
    fn clear_surface(&mut self);

    /// Replace the active brush from a serialized brush definition.
    ///
    /// The buffer is NUL-terminated by the caller. Parsing (or ignoring)
    /// the definition is the engine's business.
    fn load_brush(&mut self, bytes: &[u8]);

    fn brush_value(&self, setting: BrushSetting) -> f32;
    fn set_brush_value(&mut self, setting: BrushSetting, value: f32);

    /// Set the active paint color as straight RGBA in 0.0 - 1.0
    fn set_brush_color(&mut self, color: [f32; 4]);

    /// Blit an image into the surface, growing it if needed
    fn load_image(&mut self, image: &RgbaImage);
    /// Read the current surface back out
    fn render_image(&self) -> RgbaImage;

    fn start_stroke(&mut self);
    fn end_stroke(&mut self);
    /// Continue the active stroke to (x, y). Pressure and tilt handling is
    /// engine-defined; motion outside a stroke may be ignored.
    fn stroke_to(&mut self, x: f32, y: f32, pressure: f32, xtilt: f32, ytilt: f32);

    /// Register a tile lifecycle observer for the engine's lifetime
    fn add_observer(&mut self, observer: Arc<dyn TileObserver>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_defaults_cover_all_variants() {
        for setting in BrushSetting::ALL {
            let value = setting.default_value();
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_radius_default_is_positive_in_pixels() {
        let radius = BrushSetting::RadiusLogarithmic.default_value().exp();
        assert!(radius > 1.0);
    }
}
