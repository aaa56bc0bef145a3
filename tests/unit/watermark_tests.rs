// Watermark compositor tests

use image::{Rgba, RgbaImage};
use rstest::rstest;
use std::path::Path;
use tempfile::TempDir;
use viewmark::geometry::Point;
use viewmark::raster::{decode_image, encode_image, OutputFormat};
use viewmark::watermark::*;
use viewmark::Error;

fn save_png(dir: &TempDir, name: &str, image: RgbaImage) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, encode_image(image, OutputFormat::Png).unwrap()).unwrap();
    path
}

#[rstest]
#[case(100, 100, 40, 40, 4, 4)]
#[case(50, 50, 0, 10, 1, 7)]
#[case(50, 50, 10, 0, 7, 1)]
#[case(0, 0, 0, 0, 1, 1)]
#[case(1920, 1080, 200, 100, 11, 12)]
#[case(10, 10, 11, 11, 2, 2)]
#[case::widest_base(u32::MAX, 1, 1, 1, u32::MAX as u64 + 2, 3)]
#[case::tallest_base(1, u32::MAX, 1, 1, 3, u32::MAX as u64 + 2)]
fn test_repeat_counts(
    #[case] base_w: u32,
    #[case] base_h: u32,
    #[case] wm_w: u32,
    #[case] wm_h: u32,
    #[case] repeat_x: u64,
    #[case] repeat_y: u64,
) {
    let grid = tile_grid(base_w, base_h, wm_w, wm_h);
    assert_eq!((grid.repeat_x, grid.repeat_y), (repeat_x, repeat_y));

    // The last copy in each tiled direction must reach the origin.
    let last = grid.anchor(grid.repeat_x - 1, grid.repeat_y - 1);
    if wm_w > 0 {
        assert!(last.x <= 0, "column gap at x = {}", last.x);
    }
    if wm_h > 0 {
        assert!(last.y <= 0, "row gap at y = {}", last.y);
    }
}

#[test]
fn test_positions_match_tile_count() {
    let grid = tile_grid(1920, 1080, 200, 100);
    assert_eq!(grid.positions().count() as u128, grid.tile_count());
}

#[test]
fn test_anchor_sequence_for_square_tiles() {
    let grid = tile_grid(100, 100, 40, 40);
    let anchors: Vec<Point> = grid.positions().collect();

    let steps = [100i64, 60, 20, -20];
    let expected: Vec<Point> = steps
        .iter()
        .flat_map(|&x| steps.iter().map(move |&y| Point::new(x, y)))
        .collect();
    assert_eq!(anchors, expected);
}

#[test]
fn test_zero_width_watermark_anchors_stay_on_right_edge() {
    let anchors: Vec<Point> = tile_grid(50, 50, 0, 10).positions().collect();
    let ys: Vec<i64> = anchors.iter().map(|p| p.y).collect();
    assert!(anchors.iter().all(|p| p.x == 50));
    assert_eq!(ys, vec![50, 40, 30, 20, 10, 0, -10]);
}

#[rstest]
#[case(100, 100, 40, 40)]
#[case(37, 91, 8, 13)]
#[case(64, 48, 64, 48)]
#[case(5, 5, 9, 3)]
fn test_opaque_tiles_cover_whole_base(
    #[case] base_w: u32,
    #[case] base_h: u32,
    #[case] wm_w: u32,
    #[case] wm_h: u32,
) {
    let base = RgbaImage::from_pixel(base_w, base_h, Rgba([255, 255, 255, 255]));
    let mark = RgbaImage::from_pixel(wm_w, wm_h, Rgba([0, 0, 200, 255]));

    let bytes = apply_watermark(base, &mark, OutputFormat::Png).unwrap();
    let out = decode_image(&bytes).unwrap();

    assert_eq!(out.dimensions(), (base_w, base_h));
    assert!(out.pixels().all(|p| *p == Rgba([0, 0, 200, 255])));
}

#[test]
fn test_tiles_are_aligned_to_bottom_right() {
    // Two-tone 4x4 tile: left half red, right half green. Anchored at the
    // right edge, column 0 of the base lands on column 2 of a tile.
    let mut mark = RgbaImage::new(4, 4);
    for (x, _, p) in mark.enumerate_pixels_mut() {
        *p = if x < 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 255, 0, 255])
        };
    }
    let base = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));

    let out = decode_image(&apply_watermark(base, &mark, OutputFormat::Png).unwrap()).unwrap();

    assert_eq!(*out.get_pixel(0, 0), Rgba([0, 255, 0, 255]));
    assert_eq!(*out.get_pixel(2, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(*out.get_pixel(9, 9), Rgba([0, 255, 0, 255]));
}

#[test]
fn test_semi_transparent_watermark_blends_over_base() {
    let base = RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 255]));
    let mark = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 128]));

    let out = decode_image(&apply_watermark(base, &mark, OutputFormat::Png).unwrap()).unwrap();

    // Each pixel is covered by exactly one tile since tiles abut.
    assert!(out.pixels().all(|p| *p == Rgba([128, 128, 128, 255])));
}

#[test]
fn test_from_path_overload() {
    let dir = tempfile::tempdir().unwrap();
    let mark_path = save_png(
        &dir,
        "mark.png",
        RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255])),
    );
    let base = RgbaImage::from_pixel(7, 5, Rgba([0, 0, 0, 255]));

    let bytes = apply_watermark_from_path(base, &mark_path, OutputFormat::Bmp).unwrap();
    let out = decode_image(&bytes).unwrap();

    assert_eq!(out.dimensions(), (7, 5));
    assert!(out.pixels().all(|p| *p == Rgba([9, 9, 9, 255])));
}

#[test]
fn test_files_overload() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = save_png(
        &dir,
        "base.png",
        RgbaImage::from_pixel(12, 8, Rgba([255, 255, 255, 255])),
    );
    let mark_path = save_png(&dir, "mark.png", RgbaImage::new(4, 4));

    let bytes = apply_watermark_files(&base_path, &mark_path, OutputFormat::WebP).unwrap();
    let out = decode_image(&bytes).unwrap();

    assert_eq!(out.dimensions(), (12, 8));
    assert!(out.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
}

#[test]
fn test_missing_watermark_file() {
    let base = RgbaImage::new(2, 2);
    let err = apply_watermark_from_path(base, Path::new("/nonexistent/mark.png"), OutputFormat::Png)
        .unwrap_err();
    match err {
        Error::Load { path, .. } => assert_eq!(path, Path::new("/nonexistent/mark.png")),
        other => panic!("expected Load, got {:?}", other),
    }
}

#[test]
fn test_corrupt_base_file() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("base.png");
    std::fs::write(&base_path, b"not an image").unwrap();
    let mark_path = save_png(&dir, "mark.png", RgbaImage::new(1, 1));

    let err = apply_watermark_files(&base_path, &mark_path, OutputFormat::Png).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[rstest]
#[case(OutputFormat::Avif)]
#[case(OutputFormat::Tiff)]
fn test_formats_without_encoder(#[case] format: OutputFormat) {
    let base = RgbaImage::new(2, 2);
    let mark = RgbaImage::new(1, 1);
    let err = apply_watermark(base, &mark, format).unwrap_err();
    assert!(matches!(err, Error::InvalidFormat { .. }));
}
