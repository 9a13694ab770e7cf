//! Reference engine: a 64-px tile grid over a plain RGBA surface.
//!
//! Exists so the notification bridge and facade can be exercised without a
//! native engine binding. Stroke dynamics stay trivial on purpose - dabs
//! are stamped at fixed spacing with pressure scaling opacity only.

use super::dab::{stamp_dab, DabParams};
use super::{BrushSetting, PaintEngine, SurfaceSize, TileId, TileObserver, TileRect, TileRef};
use image::RgbaImage;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Edge length of one grid tile in pixels
pub const TILE_SIZE: u32 = 64;

enum TileEvent {
    Created(TileRef),
    Updated(TileRef),
}

/// In-crate [`PaintEngine`] implementation backed by an [`RgbaImage`]
pub struct GridEngine {
    canvas: RgbaImage,
    settings: HashMap<BrushSetting, f32>,
    color: [f32; 4],
    tiles: HashSet<TileId>,
    stroke_active: bool,
    last_point: Option<(f32, f32)>,
    observers: Vec<Arc<dyn TileObserver>>,
}

impl GridEngine {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            canvas: RgbaImage::new(size.width, size.height),
            settings: Self::default_settings(),
            color: [0.0, 0.0, 0.0, 1.0],
            tiles: HashSet::new(),
            stroke_active: false,
            last_point: None,
            observers: Vec::new(),
        }
    }

    fn default_settings() -> HashMap<BrushSetting, f32> {
        BrushSetting::ALL
            .iter()
            .map(|&s| (s, s.default_value()))
            .collect()
    }

    /// Number of tiles allocated so far
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    fn tile_id(tx: u32, ty: u32) -> TileId {
        TileId(((ty as u64) << 32) | tx as u64)
    }

    fn tile_ref(&self, tx: u32, ty: u32) -> TileRef {
        let x = tx * TILE_SIZE;
        let y = ty * TILE_SIZE;
        TileRef {
            id: Self::tile_id(tx, ty),
            rect: TileRect::new(
                x,
                y,
                TILE_SIZE.min(self.canvas.width() - x),
                TILE_SIZE.min(self.canvas.height() - y),
            ),
        }
    }

    /// Record created/updated events for every tile overlapping `rect`
    fn touch_rect(&mut self, rect: TileRect, events: &mut Vec<TileEvent>, seen: &mut HashSet<TileId>) {
        let tx0 = rect.x / TILE_SIZE;
        let ty0 = rect.y / TILE_SIZE;
        let tx1 = (rect.x + rect.width.max(1) - 1) / TILE_SIZE;
        let ty1 = (rect.y + rect.height.max(1) - 1) / TILE_SIZE;

        for ty in ty0..=ty1 {
            for tx in tx0..=tx1 {
                let id = Self::tile_id(tx, ty);
                if !seen.insert(id) {
                    continue;
                }
                let tile = self.tile_ref(tx, ty);
                if self.tiles.insert(id) {
                    events.push(TileEvent::Created(tile));
                } else {
                    events.push(TileEvent::Updated(tile));
                }
            }
        }
    }

    fn dispatch(&self, events: Vec<TileEvent>) {
        let surface = self.surface_size();
        for event in &events {
            for observer in &self.observers {
                match event {
                    TileEvent::Created(tile) => observer.tile_created(surface, tile),
                    TileEvent::Updated(tile) => observer.tile_updated(surface, tile),
                }
            }
        }
    }

    fn dab_params(&self, pressure: f32) -> DabParams {
        let radius = self.brush_value(BrushSetting::RadiusLogarithmic).exp();
        DabParams {
            radius,
            hardness: self.brush_value(BrushSetting::Hardness),
            color: self.color,
            strength: self.brush_value(BrushSetting::Opaque) * pressure.clamp(0.0, 1.0),
        }
    }

    /// Stamp dabs from the previous stroke point to (x, y) at fixed spacing
    fn stamp_segment(&mut self, x: f32, y: f32, pressure: f32) {
        let dab = self.dab_params(pressure);
        let spacing = (dab.radius * 0.5).max(1.0);

        let mut stamps = Vec::new();
        match self.last_point {
            Some((px, py)) => {
                let dx = x - px;
                let dy = y - py;
                let dist = (dx * dx + dy * dy).sqrt();
                let steps = (dist / spacing).ceil().max(1.0) as usize;
                for step in 1..=steps {
                    let t = step as f32 / steps as f32;
                    stamps.push((px + dx * t, py + dy * t));
                }
            }
            None => stamps.push((x, y)),
        }

        let mut events = Vec::new();
        let mut seen = HashSet::new();
        for (sx, sy) in stamps {
            if let Some(dirty) = stamp_dab(&mut self.canvas, sx, sy, &dab) {
                self.touch_rect(dirty, &mut events, &mut seen);
            }
        }
        self.last_point = Some((x, y));
        self.dispatch(events);
    }
}

impl PaintEngine for GridEngine {
    fn set_surface_size(&mut self, size: SurfaceSize) {
        if size == self.surface_size() {
            return;
        }
        // Reallocates the surface; existing tile records are dropped
        // without notification, matching the brush library binding.
        tracing::debug!(
            width = size.width,
            height = size.height,
            dropped_tiles = self.tiles.len(),
            "surface resized"
        );
        self.canvas = RgbaImage::new(size.width, size.height);
        self.tiles.clear();
        self.last_point = None;
    }

    fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width(), self.canvas.height())
    }

    fn clear_surface(&mut self) {
        let size = self.surface_size();
        self.canvas = RgbaImage::new(size.width, size.height);
        self.tiles.clear();
        self.last_point = None;
        for observer in &self.observers {
            observer.surface_cleared(size);
        }
    }

    fn load_brush(&mut self, bytes: &[u8]) {
        // No .myb parsing here; a new brush just resets every setting to
        // its built-in default.
        tracing::debug!(len = bytes.len(), "brush definition loaded");
        self.settings = Self::default_settings();
    }

    fn brush_value(&self, setting: BrushSetting) -> f32 {
        self.settings
            .get(&setting)
            .copied()
            .unwrap_or_else(|| setting.default_value())
    }

    fn set_brush_value(&mut self, setting: BrushSetting, value: f32) {
        self.settings.insert(setting, value);
    }

    fn set_brush_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }

    fn load_image(&mut self, image: &RgbaImage) {
        if image.width() > self.canvas.width() || image.height() > self.canvas.height() {
            let grown = SurfaceSize::new(
                image.width().max(self.canvas.width()),
                image.height().max(self.canvas.height()),
            );
            let mut canvas = RgbaImage::new(grown.width, grown.height);
            image::imageops::replace(&mut canvas, &self.canvas, 0, 0);
            self.canvas = canvas;
        }
        image::imageops::replace(&mut self.canvas, image, 0, 0);

        let mut events = Vec::new();
        let mut seen = HashSet::new();
        self.touch_rect(
            TileRect::new(0, 0, image.width(), image.height()),
            &mut events,
            &mut seen,
        );
        self.dispatch(events);
    }

    fn render_image(&self) -> RgbaImage {
        self.canvas.clone()
    }

    fn start_stroke(&mut self) {
        self.stroke_active = true;
        self.last_point = None;
    }

    fn end_stroke(&mut self) {
        self.stroke_active = false;
        self.last_point = None;
    }

    fn stroke_to(&mut self, x: f32, y: f32, pressure: f32, _xtilt: f32, _ytilt: f32) {
        if !self.stroke_active {
            tracing::trace!(x, y, "stroke motion outside an active stroke ignored");
            return;
        }
        self.stamp_segment(x, y, pressure);
    }

    fn add_observer(&mut self, observer: Arc<dyn TileObserver>) {
        self.observers.push(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct EventLog {
        created: Mutex<Vec<TileRef>>,
        updated: Mutex<Vec<TileRef>>,
        cleared: Mutex<usize>,
    }

    impl TileObserver for EventLog {
        fn tile_created(&self, _surface: SurfaceSize, tile: &TileRef) {
            self.created.lock().push(*tile);
        }
        fn tile_updated(&self, _surface: SurfaceSize, tile: &TileRef) {
            self.updated.lock().push(*tile);
        }
        fn surface_cleared(&self, _surface: SurfaceSize) {
            *self.cleared.lock() += 1;
        }
    }

    fn engine_with_log() -> (GridEngine, Arc<EventLog>) {
        let mut engine = GridEngine::new(SurfaceSize::new(256, 256));
        let log = Arc::new(EventLog::default());
        engine.add_observer(log.clone());
        (engine, log)
    }

    #[test]
    fn test_first_touch_creates_tile() {
        let (mut engine, log) = engine_with_log();
        engine.start_stroke();
        engine.stroke_to(32.0, 32.0, 1.0, 0.0, 0.0);
        engine.end_stroke();

        assert!(!log.created.lock().is_empty());
        assert_eq!(engine.tile_count(), log.created.lock().len());
    }

    #[test]
    fn test_second_touch_updates_not_creates() {
        let (mut engine, log) = engine_with_log();
        engine.start_stroke();
        engine.stroke_to(32.0, 32.0, 1.0, 0.0, 0.0);
        engine.end_stroke();
        let created_before = log.created.lock().len();

        engine.start_stroke();
        engine.stroke_to(32.0, 32.0, 1.0, 0.0, 0.0);
        engine.end_stroke();

        assert_eq!(log.created.lock().len(), created_before);
        assert!(!log.updated.lock().is_empty());
    }

    #[test]
    fn test_motion_without_stroke_is_ignored() {
        let (mut engine, log) = engine_with_log();
        engine.stroke_to(32.0, 32.0, 1.0, 0.0, 0.0);
        assert!(log.created.lock().is_empty());
        assert_eq!(engine.tile_count(), 0);
    }

    #[test]
    fn test_clear_surface_drops_tiles_and_notifies() {
        let (mut engine, log) = engine_with_log();
        engine.start_stroke();
        engine.stroke_to(32.0, 32.0, 1.0, 0.0, 0.0);
        engine.end_stroke();
        assert!(engine.tile_count() > 0);

        engine.clear_surface();
        assert_eq!(engine.tile_count(), 0);
        assert_eq!(*log.cleared.lock(), 1);

        let image = engine.render_image();
        assert!(image.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_load_brush_resets_radius() {
        let (mut engine, _log) = engine_with_log();
        engine.set_brush_value(BrushSetting::RadiusLogarithmic, 4.5);
        engine.load_brush(b"dummy brush\0");
        assert_eq!(
            engine.brush_value(BrushSetting::RadiusLogarithmic),
            BrushSetting::RadiusLogarithmic.default_value()
        );
    }

    #[test]
    fn test_load_image_emits_created_tiles() {
        let (mut engine, log) = engine_with_log();
        let image = RgbaImage::from_pixel(128, 128, image::Rgba([10, 20, 30, 255]));
        engine.load_image(&image);

        // 128x128 over a 64-px grid is 4 tiles
        assert_eq!(log.created.lock().len(), 4);
        assert_eq!(engine.render_image().get_pixel(0, 0)[0], 10);
    }

    #[test]
    fn test_load_image_grows_surface() {
        let mut engine = GridEngine::new(SurfaceSize::new(64, 64));
        let image = RgbaImage::new(200, 100);
        engine.load_image(&image);
        assert_eq!(engine.surface_size(), SurfaceSize::new(200, 100));
    }

    #[test]
    fn test_resize_drops_tiles_silently() {
        let (mut engine, log) = engine_with_log();
        engine.start_stroke();
        engine.stroke_to(32.0, 32.0, 1.0, 0.0, 0.0);
        engine.end_stroke();

        engine.set_surface_size(SurfaceSize::new(512, 512));
        assert_eq!(engine.tile_count(), 0);
        assert_eq!(*log.cleared.lock(), 0);
    }

    #[test]
    fn test_stroke_segment_touches_tiles_along_path() {
        let (mut engine, log) = engine_with_log();
        engine.start_stroke();
        engine.stroke_to(8.0, 8.0, 1.0, 0.0, 0.0);
        engine.stroke_to(200.0, 8.0, 1.0, 0.0, 0.0);
        engine.end_stroke();

        // A 200-px horizontal sweep crosses at least four tile columns
        assert!(log.created.lock().len() >= 4);
    }
}
