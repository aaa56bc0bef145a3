//! Alpha compositing of one raster onto another.

use image::{Rgba, RgbaImage};

use crate::geometry::Point;

/// Composite `source` onto `target` with its top-left corner at `at`.
///
/// Parts of `source` that fall outside `target` are clipped. Returns the
/// number of target pixels touched.
pub fn blend_image(target: &mut RgbaImage, source: &RgbaImage, at: Point) -> u64 {
    let target_width = target.width() as i64;
    let target_height = target.height() as i64;

    // Visible region, clamped to target bounds
    let x_start = at.x.max(0);
    let y_start = at.y.max(0);
    let x_end = (at.x + source.width() as i64).min(target_width);
    let y_end = (at.y + source.height() as i64).min(target_height);

    if x_start >= x_end || y_start >= y_end {
        return 0;
    }

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let src = *source.get_pixel((tx - at.x) as u32, (ty - at.y) as u32);
            let dst = target.get_pixel_mut(tx as u32, ty as u32);
            *dst = blend_pixels(*dst, src);
        }
    }

    ((x_end - x_start) * (y_end - y_start)) as u64
}

/// Porter-Duff "over": result = foreground + background * (1 - foreground.alpha)
pub fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    match foreground[3] {
        0 => return background,
        255 => return foreground,
        _ => {}
    }

    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
