//! Paint context - the flat procedural surface hosts call into.
//!
//! Owns the engine outright and at most one scene bridge; nothing here is
//! process-global, a host wanting two canvases builds two contexts.

use crate::bridge::SceneBridge;
use crate::engine::{BrushSetting, PaintEngine, SurfaceSize};
use crate::scene::SharedScene;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct PaintContext {
    engine: Box<dyn PaintEngine>,
    bridge: Option<Arc<SceneBridge>>,
    brush_path: Option<PathBuf>,
}

impl PaintContext {
    pub fn new(engine: Box<dyn PaintEngine>) -> Self {
        Self {
            engine,
            bridge: None,
            brush_path: None,
        }
    }

    /// Wire tile notifications into `scene`. Only the first call takes
    /// effect; later calls are ignored so repeated wiring cannot insert
    /// tiles twice. Pass a negative `depth` to stack above existing items.
    pub fn add_to_scene(&mut self, scene: SharedScene, depth: i32) {
        if self.bridge.is_some() {
            tracing::warn!("scene already attached, ignoring additional scene");
            return;
        }
        let bridge = Arc::new(SceneBridge::new(scene, depth));
        self.engine.add_observer(bridge.clone());
        self.bridge = Some(bridge);
    }

    pub fn set_surface_size(&mut self, size: SurfaceSize) {
        self.engine.set_surface_size(size);
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.engine.surface_size()
    }

    pub fn clear_surface(&mut self) {
        self.engine.clear_surface();
    }

    /// Load a brush definition file into the engine.
    ///
    /// The file is read whole and passed on NUL-terminated. With
    /// `preserve_size` the current radius survives the load, overriding
    /// whatever the new brush ships as its default. An unreadable file
    /// leaves the engine and the active brush path untouched.
    pub fn load_brush(&mut self, path: &Path, preserve_size: bool) {
        let radius = preserve_size.then(|| self.engine.brush_value(BrushSetting::RadiusLogarithmic));

        let mut bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "brush file not readable, keeping current brush");
                return;
            }
        };
        bytes.push(0);

        self.brush_path = Some(path.to_path_buf());
        self.engine.load_brush(&bytes);
        if let Some(radius) = radius {
            self.engine
                .set_brush_value(BrushSetting::RadiusLogarithmic, radius);
        }
    }

    /// Path of the last successfully loaded brush
    pub fn active_brush(&self) -> Option<&Path> {
        self.brush_path.as_deref()
    }

    pub fn set_brush_color(&mut self, color: [f32; 4]) {
        self.engine.set_brush_color(color);
    }

    pub fn brush_value(&self, setting: BrushSetting) -> f32 {
        self.engine.brush_value(setting)
    }

    pub fn set_brush_value(&mut self, setting: BrushSetting, value: f32) {
        self.engine.set_brush_value(setting, value);
    }

    pub fn load_image(&mut self, image: &RgbaImage) {
        self.engine.load_image(image);
    }

    pub fn render_image(&self) -> RgbaImage {
        self.engine.render_image()
    }

    pub fn start_stroke(&mut self) {
        self.engine.start_stroke();
    }

    pub fn end_stroke(&mut self) {
        self.engine.end_stroke();
    }

    /// Stroke motion with full pressure and no tilt
    pub fn basic_stroke_to(&mut self, x: f32, y: f32) {
        self.engine.stroke_to(x, y, 1.0, 0.0, 0.0);
    }

    /// Stroke motion with explicit pressure and tilt. No range or
    /// stroke-started validation happens here; that is the engine's call.
    pub fn stroke_to(&mut self, x: f32, y: f32, pressure: f32, xtilt: f32, ytilt: f32) {
        self.engine.stroke_to(x, y, pressure, xtilt, ytilt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::AUTO_DEPTH;
    use crate::engine::GridEngine;
    use crate::scene::DisplayList;
    use parking_lot::RwLock;

    fn context() -> PaintContext {
        PaintContext::new(Box::new(GridEngine::new(SurfaceSize::new(256, 256))))
    }

    fn shared_scene() -> SharedScene {
        Arc::new(RwLock::new(DisplayList::new()))
    }

    fn temp_brush_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("brushscene-{}-{}.myb", std::process::id(), name));
        std::fs::write(&path, b"{\"version\": 3}").unwrap();
        path
    }

    #[test]
    fn test_first_scene_wins() {
        let mut ctx = context();
        let first = shared_scene();
        let second = shared_scene();
        ctx.add_to_scene(first.clone(), AUTO_DEPTH);
        ctx.add_to_scene(second.clone(), AUTO_DEPTH);

        ctx.start_stroke();
        ctx.basic_stroke_to(32.0, 32.0);
        ctx.end_stroke();

        assert!(!first.read().depths().is_empty());
        assert!(second.read().depths().is_empty());
    }

    #[test]
    fn test_tiles_arrive_at_bridge_depth() {
        let mut ctx = context();
        let scene = shared_scene();
        ctx.add_to_scene(scene.clone(), 9);

        ctx.start_stroke();
        ctx.basic_stroke_to(32.0, 32.0);
        ctx.end_stroke();

        let depths = scene.read().depths();
        assert!(!depths.is_empty());
        assert!(depths.iter().all(|&d| d == 9));
    }

    #[test]
    fn test_load_brush_preserving_size() {
        let mut ctx = context();
        let path = temp_brush_file("preserve");
        ctx.set_brush_value(BrushSetting::RadiusLogarithmic, 4.25);

        ctx.load_brush(&path, true);
        assert_eq!(ctx.brush_value(BrushSetting::RadiusLogarithmic), 4.25);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_brush_without_preserve_takes_brush_default() {
        let mut ctx = context();
        let path = temp_brush_file("default");
        ctx.set_brush_value(BrushSetting::RadiusLogarithmic, 4.25);

        ctx.load_brush(&path, false);
        assert_eq!(
            ctx.brush_value(BrushSetting::RadiusLogarithmic),
            BrushSetting::RadiusLogarithmic.default_value()
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_brush_file_keeps_previous_brush() {
        let mut ctx = context();
        let path = temp_brush_file("kept");
        ctx.load_brush(&path, false);
        assert_eq!(ctx.active_brush(), Some(path.as_path()));

        ctx.load_brush(Path::new("/nonexistent/brush.myb"), false);
        assert_eq!(ctx.active_brush(), Some(path.as_path()));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_no_brush_loaded_yet() {
        let ctx = context();
        assert!(ctx.active_brush().is_none());
    }

    #[test]
    fn test_render_after_basic_stroke_marks_pixels() {
        let mut ctx = context();
        ctx.set_brush_color([1.0, 0.0, 0.0, 1.0]);
        ctx.start_stroke();
        ctx.basic_stroke_to(64.0, 64.0);
        ctx.end_stroke();

        let image = ctx.render_image();
        assert!(image.get_pixel(64, 64)[3] > 0);
    }

    #[test]
    fn test_surface_size_forwarding() {
        let mut ctx = context();
        ctx.set_surface_size(SurfaceSize::new(300, 200));
        assert_eq!(ctx.surface_size(), SurfaceSize::new(300, 200));
    }
}
