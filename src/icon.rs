//! Tray icon drawn at runtime: a camera glyph with a status dot.

use image::{ImageBuffer, Rgba, RgbaImage};

pub const ICON_SIZE: u32 = 32;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const LIGHT_GLYPH: Rgba<u8> = Rgba([255, 255, 255, 255]);
const DARK_GLYPH: Rgba<u8> = Rgba([32, 32, 32, 255]);
pub const MEETING_DOT: Rgba<u8> = Rgba([231, 76, 60, 255]);
pub const FREE_DOT: Rgba<u8> = Rgba([46, 204, 113, 255]);

const DOT_CENTER: (i64, i64) = (25, 25);
const DOT_RADIUS: i64 = 6;

/// Detects if the system is using light mode.
pub fn is_light_mode() -> bool {
    match dark_light::detect() {
        Ok(dark_light::Mode::Light) => true,
        // Default to dark mode (white glyph) when unspecified or on error
        Ok(dark_light::Mode::Dark) | Ok(dark_light::Mode::Unspecified) => false,
        Err(_) => false,
    }
}

fn in_dot(x: u32, y: u32) -> bool {
    let dx = x as i64 - DOT_CENTER.0;
    let dy = y as i64 - DOT_CENTER.1;
    dx * dx + dy * dy <= DOT_RADIUS * DOT_RADIUS
}

fn in_camera(x: u32, y: u32) -> bool {
    let body = (2..=18).contains(&x) && (8..=21).contains(&y);
    // Lens hood widens to the right of the body.
    let hood = (19..=27).contains(&x) && {
        let spread = (x - 19) / 2 + 2;
        (14 - spread..=15 + spread).contains(&y)
    };
    body || hood
}

/// Draw the icon for the given meeting state.
///
/// `light_mode` selects a dark glyph so it stays visible on light panels.
pub fn render_icon(in_meeting: bool, light_mode: bool) -> RgbaImage {
    let glyph = if light_mode { DARK_GLYPH } else { LIGHT_GLYPH };
    let dot = if in_meeting { MEETING_DOT } else { FREE_DOT };

    ImageBuffer::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        if in_dot(x, y) {
            dot
        } else if in_camera(x, y) {
            glyph
        } else {
            TRANSPARENT
        }
    })
}

/// Icon matching the current desktop theme.
pub fn themed_icon(in_meeting: bool) -> RgbaImage {
    render_icon(in_meeting, is_light_mode())
}

/// Convert RGBA pixels to the ARGB layout used by StatusNotifierItem.
pub fn to_argb(image: &RgbaImage) -> Vec<u8> {
    let mut argb = Vec::with_capacity(image.as_raw().len());
    for pixel in image.pixels() {
        argb.extend_from_slice(&[pixel[3], pixel[0], pixel[1], pixel[2]]);
    }
    argb
}
