use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::character::{CharacterInfo, SkinRef};

/// Hue tolerance used when a character info carries no explicit range.
const DEFAULT_COLOR_RANGE: f32 = 40.0;

pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Resolves the raster image for a skin, in the same order browser sources
/// resolve: named skin image (unless forced), then a recolor of
/// `Default.png` for hex variants, then the shared `Random/<tag>.png`
/// asset. Every missing file falls through; `None` means nothing to show.
pub fn resolve_panel_image(
    char_root: &Path,
    character: &str,
    skin: &SkinRef,
    info: &CharacterInfo,
    subfolder: &str,
    fallback_tag: &str,
) -> Option<RgbaImage> {
    let char_dir = char_root.join(character).join(subfolder);

    let named = char_dir.join(format!("{}.png", skin.name));
    if named.is_file() && !skin.force {
        if let Some(img) = open_rgba(&named) {
            return Some(img);
        }
    }

    let default = char_dir.join("Default.png");
    if default.is_file() {
        if let Some(mut img) = open_rgba(&default) {
            if let Some(hex) = &skin.hex {
                recolor_toward(
                    &mut img,
                    info.og_color.as_deref(),
                    hex,
                    info.color_range.unwrap_or(DEFAULT_COLOR_RANGE),
                );
            }
            return Some(img);
        }
    }

    let fallback = char_root.join("Random").join(format!("{fallback_tag}.png"));
    open_rgba(&fallback)
}

fn open_rgba(path: &Path) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(img) => Some(img.to_rgba8()),
        Err(err) => {
            debug!(?err, path = %path.display(), "failed decoding skin image");
            None
        }
    }
}

/// Rotates the hue of every pixel whose hue lies within `range` degrees of
/// the character's original color, shifting it toward the target hex.
/// Without an original color there is no range to select, so the image
/// passes through untouched.
pub fn recolor_toward(img: &mut RgbaImage, og_hex: Option<&str>, target_hex: &str, range: f32) {
    let Some(og) = og_hex.and_then(parse_hex_color) else {
        return;
    };
    let Some(target) = parse_hex_color(target_hex) else {
        return;
    };
    let (og_h, _, _) = rgb_to_hsv(og);
    let (target_h, _, _) = rgb_to_hsv(target);
    let delta = target_h - og_h;

    for pixel in img.pixels_mut() {
        if pixel.0[3] == 0 {
            continue;
        }
        let (h, s, v) = rgb_to_hsv([pixel.0[0], pixel.0[1], pixel.0[2]]);
        if hue_distance(h, og_h) > range {
            continue;
        }
        let [r, g, b] = hsv_to_rgb((h + delta).rem_euclid(360.0), s, v);
        pixel.0[0] = r;
        pixel.0[1] = g;
        pixel.0[2] = b;
    }
}

fn hue_distance(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}

fn rgb_to_hsv([r, g, b]: [u8; 3]) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    ]
}
