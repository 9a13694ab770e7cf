//! Headless painting demo: draws a few strokes through the full adapter
//! path and saves the result as a PNG.
//!
//! Usage: `cargo run --example headless [output.png] [brush_dir]`

use brushscene::{
    BrushLibrary, BrushSetting, DisplayList, GridEngine, PaintContext, SharedScene, SurfaceSize,
    AUTO_DEPTH,
};
use parking_lot::RwLock;
use std::sync::Arc;

fn main() {
    brushscene::init_logging();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "headless.png".to_string());

    let scene: SharedScene = Arc::new(RwLock::new(DisplayList::new()));
    let mut ctx = PaintContext::new(Box::new(GridEngine::new(SurfaceSize::new(512, 512))));
    ctx.add_to_scene(scene.clone(), AUTO_DEPTH);

    if let Some(brush_dir) = args.next() {
        match BrushLibrary::scan(std::path::Path::new(&brush_dir)) {
            Ok(groups) => {
                if let Some(brush) = groups.first().and_then(|g| g.brushes.first()) {
                    tracing::info!(brush = %brush.name, "using first library brush");
                    ctx.load_brush(&brush.path, false);
                }
            }
            Err(err) => tracing::warn!(%err, "brush library unavailable, using defaults"),
        }
    }

    ctx.set_brush_value(BrushSetting::RadiusLogarithmic, 2.5);
    ctx.set_brush_color([0.8, 0.2, 0.1, 1.0]);

    // A sine sweep and a diagonal, pressure ramping up along each
    ctx.start_stroke();
    for i in 0..=100 {
        let t = i as f32 / 100.0;
        let x = 30.0 + t * 450.0;
        let y = 256.0 + (t * std::f32::consts::PI * 3.0).sin() * 120.0;
        ctx.stroke_to(x, y, 0.3 + 0.7 * t, 0.0, 0.0);
    }
    ctx.end_stroke();

    ctx.set_brush_color([0.1, 0.3, 0.8, 1.0]);
    ctx.start_stroke();
    for i in 0..=60 {
        let t = i as f32 / 60.0;
        ctx.stroke_to(40.0 + t * 430.0, 40.0 + t * 430.0, 1.0, 0.0, 0.0);
    }
    ctx.end_stroke();

    tracing::info!(tiles = scene.read().depths().len(), "scene populated");

    let image = ctx.render_image();
    if let Err(err) = image.save(&output) {
        tracing::error!(%err, %output, "failed to save render");
        std::process::exit(1);
    }
    tracing::info!(%output, "render saved");
}
