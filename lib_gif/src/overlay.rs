//! Procedural overlay effects. Every effect is a pure mapping
//! `(x, y, frame_idx, frame_count) -> Option<RGB>`; there is no state
//! shared between frames or columns, so frames can be rendered in any
//! order.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Flame(FlameParams),
    Tears(TearParams),
}

/// A continuous flame band across the top of the frame: a rippling
/// lower edge, a three-segment vertical gradient and a subtle flicker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlameParams {
    /// Band bottom, as a fraction of frame height.
    pub bottom_frac: f32,
    /// Mean band height, as a fraction of frame height.
    pub height_frac: f32,
    pub color_top: [u8; 3],
    pub color_mid: [u8; 3],
    pub color_base: [u8; 3],
    pub color_core: [u8; 3],
}

impl Default for FlameParams {
    fn default() -> Self {
        FlameParams {
            bottom_frac: 0.24,
            height_frac: 0.26,
            color_top: [220, 30, 0],
            color_mid: [255, 120, 0],
            color_base: [255, 210, 0],
            color_core: [255, 255, 200],
        }
    }
}

/// Two teardrops falling from under the eyes, phase-offset so they
/// never move in lockstep. Each drop is an ellipse body, a triangular
/// tip and a small highlight.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TearParams {
    pub left_eye_frac: f32,
    pub right_eye_frac: f32,
    pub color_base: [u8; 3],
    pub color_highlight: [u8; 3],
}

impl Default for TearParams {
    fn default() -> Self {
        TearParams {
            left_eye_frac: 0.35,
            right_eye_frac: 0.65,
            color_base: [100, 180, 255],
            color_highlight: [200, 230, 255],
        }
    }
}

/// Computes the overlay color for one pixel, or `None` where the
/// underlying frame shows through.
pub fn shade(
    effect: &Effect,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    frame_idx: usize,
    frame_count: usize,
) -> Option<[u8; 3]> {
    match effect {
        Effect::Flame(params) => flame_pixel(params, x, y, width, height, frame_idx, frame_count),
        Effect::Tears(params) => tear_pixel(params, x, y, width, height, frame_idx, frame_count),
    }
}

/// Paints the effect onto a raw RGBA buffer (4 bytes per pixel, row
/// major). Overlay pixels become fully opaque.
pub fn apply(
    effect: &Effect,
    rgba: &mut [u8],
    width: u32,
    height: u32,
    frame_idx: usize,
    frame_count: usize,
) {
    debug_assert_eq!(rgba.len(), (width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            if let Some(color) = shade(effect, x, y, width, height, frame_idx, frame_count) {
                let at = ((y * width + x) * 4) as usize;
                rgba[at] = color[0];
                rgba[at + 1] = color[1];
                rgba[at + 2] = color[2];
                rgba[at + 3] = 255;
            }
        }
    }
}

fn flame_pixel(
    params: &FlameParams,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    frame_idx: usize,
    frame_count: usize,
) -> Option<[u8; 3]> {
    let band_bottom = (height as f32 * params.bottom_frac) as i64;
    let band_height = height as f32 * params.height_frac;
    if band_bottom < 1 || i64::from(y) >= band_bottom {
        return None;
    }

    let t = frame_idx as f32 / frame_count.max(1) as f32;
    let xf = x as f32 / width.saturating_sub(1).max(1) as f32;

    // Two waves of different frequency and phase make an organic lower
    // edge; the jitter term adds a per-column shimmer.
    let flow1 = TAU * t;
    let flow2 = TAU * 2.2 * t;
    let ripple = band_height * 0.50 * (TAU * 2.0 * xf + flow1).sin()
        + band_height * 0.30 * (TAU * (5.0 * xf + 0.3) - flow2).sin();
    let jitter = (TAU * (12.3 * xf + t * 5.1)).sin() * 0.8;

    let top = (band_bottom as f32 - (band_height * 0.6 + ripple + jitter)) as i64;
    let top = top.clamp(0, band_bottom - 1);
    if i64::from(y) < top {
        return None;
    }

    let column_height = (band_bottom - top).max(1);
    let v = if column_height > 1 {
        (i64::from(y) - top) as f32 / (column_height - 1) as f32
    } else {
        1.0
    };

    // Red at the tips, yellow toward the base, a bright core at the
    // very bottom of the band.
    let color = if v < 0.40 {
        lerp_rgb(params.color_top, params.color_mid, v / 0.40)
    } else if v < 0.85 {
        lerp_rgb(params.color_mid, params.color_base, (v - 0.40) / 0.45)
    } else {
        lerp_rgb(params.color_base, params.color_core, (v - 0.85) / 0.15)
    };

    let flicker = 0.90 + 0.12 * (TAU * (7.0 * xf + t * 3.5)).sin();
    Some(scale_rgb(color, flicker))
}

fn tear_pixel(
    params: &TearParams,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    frame_idx: usize,
    frame_count: usize,
) -> Option<[u8; 3]> {
    let frames = frame_count.max(1);
    let w = width as f32;
    let h = height as f32;

    let eye_radius = w * 0.12;
    let start_y = h * 0.45 + eye_radius + 5.0;
    let end_y = h - 20.0;
    let size = h / 10.0;

    // Left and right drops cycle at the same rate but out of phase.
    let drops = [
        (params.left_eye_frac, frame_idx * 2),
        (params.right_eye_frac, frame_idx * 2 + frames / 3),
    ];

    for (eye_frac, raw_phase) in drops {
        let phase = raw_phase % (frames * 2);
        if phase >= frames {
            continue;
        }
        let progress = phase as f32 / frames as f32;
        let drop_y = start_y + (end_y - start_y) * progress;
        if drop_y >= end_y {
            continue;
        }
        let drop_x = w * eye_frac;
        if let Some(color) = teardrop_pixel(params, x as f32, y as f32, drop_x, drop_y, size) {
            return Some(color);
        }
    }
    None
}

/// Membership test for one drop at `(cx, cy)` (top of the drop).
fn teardrop_pixel(
    params: &TearParams,
    x: f32,
    y: f32,
    cx: f32,
    cy: f32,
    size: f32,
) -> Option<[u8; 3]> {
    let body_w = size * 0.6;

    // Highlight first so it wins over the body.
    if in_ellipse(
        x,
        y,
        cx - body_w / 4.0,
        cy + size * 0.15,
        cx + body_w / 6.0,
        cy + size * 0.35,
    ) {
        return Some(params.color_highlight);
    }

    // Upper body: ellipse.
    if in_ellipse(x, y, cx - body_w / 2.0, cy, cx + body_w / 2.0, cy + size * 0.7) {
        return Some(params.color_base);
    }

    // Lower tip: triangle tapering from the shoulders to a point.
    let shoulder_y = cy + size * 0.6;
    let tip_y = cy + size;
    if y >= shoulder_y && y <= tip_y {
        let taper = 1.0 - (y - shoulder_y) / (tip_y - shoulder_y);
        if (x - cx).abs() <= body_w / 2.0 * taper {
            return Some(params.color_base);
        }
    }
    None
}

fn in_ellipse(x: f32, y: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> bool {
    let rx = (x1 - x0) / 2.0;
    let ry = (y1 - y0) / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let dx = (x - (x0 + rx)) / rx;
    let dy = (y - (y0 + ry)) / ry;
    dx * dx + dy * dy <= 1.0
}

pub fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
}

pub fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

fn scale_rgb(color: [u8; 3], factor: f32) -> [u8; 3] {
    let scale = |c: u8| (f32::from(c) * factor).clamp(0.0, 255.0) as u8;
    [scale(color[0]), scale(color[1]), scale(color[2])]
}
