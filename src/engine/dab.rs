//! Round dab stamping with hardness falloff.
//!
//! Deliberately plain scalar compositing: the reference engine only needs
//! tiles to visibly change so the notification path can be exercised.

use super::TileRect;
use image::RgbaImage;

/// Per-dab parameters resolved from the brush settings
#[derive(Debug, Clone, Copy)]
pub(crate) struct DabParams {
    pub radius: f32,
    pub hardness: f32,
    pub color: [f32; 4],
    /// Pressure-scaled opacity multiplier
    pub strength: f32,
}

/// Mask value at `dist` pixels from the dab center.
///
/// Flat 1.0 inside `hardness * radius`, linear falloff to 0.0 at `radius`.
fn mask_at(dist: f32, radius: f32, hardness: f32) -> f32 {
    let hard_edge = radius * hardness.clamp(0.0, 1.0);
    if dist <= hard_edge {
        1.0
    } else if dist >= radius {
        0.0
    } else {
        1.0 - (dist - hard_edge) / (radius - hard_edge)
    }
}

/// Stamp one dab at (cx, cy), source-over.
///
/// Returns the dirty rect clipped to the canvas, or `None` when the dab
/// lies entirely outside it.
pub(crate) fn stamp_dab(canvas: &mut RgbaImage, cx: f32, cy: f32, dab: &DabParams) -> Option<TileRect> {
    let radius = dab.radius.max(0.5);
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);

    let x0 = ((cx - radius).floor() as i64).max(0);
    let y0 = ((cy - radius).floor() as i64).max(0);
    let x1 = ((cx + radius).ceil() as i64 + 1).min(w);
    let y1 = ((cy + radius).ceil() as i64 + 1).min(h);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let mask = mask_at(dist, radius, dab.hardness);
            if mask <= 0.0 {
                continue;
            }

            let alpha = (mask * dab.strength * dab.color[3]).clamp(0.0, 1.0);
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            for ch in 0..3 {
                let src = dab.color[ch] * 255.0;
                let dst = pixel[ch] as f32;
                pixel[ch] = (src * alpha + dst * (1.0 - alpha)).round() as u8;
            }
            let dst_a = pixel[3] as f32 / 255.0;
            let out_a = alpha + dst_a * (1.0 - alpha);
            pixel[3] = (out_a * 255.0).round() as u8;
        }
    }

    Some(TileRect::new(
        x0 as u32,
        y0 as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    ))
}
