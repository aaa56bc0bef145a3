// Rendering bridge tests
//
// A recording surface stands in for the graphics layer so the order of
// clear / acquire / draw / release can be checked from the outside.

use image::{Rgba, RgbaImage};
use rstest::rstest;
use std::cell::Cell;
use std::ffi::c_void;
use std::ptr::NonNull;
use viewmark::geometry::{Point, Rect};
use viewmark::raster::{
    decode_image, Color, DeviceContext, DrawingSurface, Hdc, OutputFormat, SmoothingMode,
    SurfaceError,
};
use viewmark::render::*;
use viewmark::Error;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Clear(Color),
    GetHdc(Hdc),
    Draw,
    ReleaseHdc(Hdc),
}

struct RecordingSurface {
    image: RgbaImage,
    events: Vec<Event>,
    outstanding: Option<Hdc>,
    next: usize,
    smoothing: SmoothingMode,
    fail_clear: bool,
}

impl RecordingSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            events: Vec::new(),
            outstanding: None,
            next: 0x1000,
            smoothing: SmoothingMode::Default,
            fail_clear: false,
        }
    }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl DrawingSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn clear(&mut self, color: Color) -> Result<(), SurfaceError> {
        if self.fail_clear {
            return Err(SurfaceError::Draw("clear refused".to_string()));
        }
        self.events.push(Event::Clear(color));
        for p in self.image.pixels_mut() {
            *p = color.to_rgba();
        }
        Ok(())
    }

    fn smoothing_mode(&self) -> SmoothingMode {
        self.smoothing
    }

    fn set_smoothing_mode(&mut self, mode: SmoothingMode) {
        self.smoothing = mode;
    }

    fn draw_image(&mut self, _image: &RgbaImage, _at: Point) -> Result<(), SurfaceError> {
        self.events.push(Event::Draw);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn get_hdc(&mut self) -> Result<Hdc, SurfaceError> {
        if let Some(hdc) = self.outstanding {
            return Err(SurfaceError::Busy(hdc.as_raw()));
        }
        self.next += 1;
        let hdc = Hdc::from_raw(self.next).unwrap();
        self.outstanding = Some(hdc);
        self.events.push(Event::GetHdc(hdc));
        Ok(hdc)
    }

    fn release_hdc(&mut self, hdc: Hdc) {
        assert_eq!(self.outstanding, Some(hdc), "released a handle not issued");
        self.outstanding = None;
        self.events.push(Event::ReleaseHdc(hdc));
    }

    fn bits_mut(&mut self, hdc: Hdc) -> Result<&mut RgbaImage, SurfaceError> {
        if self.outstanding != Some(hdc) {
            return Err(SurfaceError::InvalidHandle(hdc.as_raw()));
        }
        Ok(&mut self.image)
    }
}

/// Draws a diagonal line, or fails with a fixed code when `fail_with` is set.
struct Diagonal {
    fail_with: Option<u32>,
    draws: Cell<usize>,
}

impl Diagonal {
    fn ok() -> Self {
        Self {
            fail_with: None,
            draws: Cell::new(0),
        }
    }

    fn failing(code: u32) -> Self {
        Self {
            fail_with: Some(code),
            draws: Cell::new(0),
        }
    }
}

impl EmbeddedObject for Diagonal {
    fn name(&self) -> &str {
        "Diagonal"
    }

    fn as_view_object(&self) -> Option<&dyn ViewObject> {
        Some(self)
    }
}

impl ViewObject for Diagonal {
    fn draw(
        &self,
        aspect: u32,
        index: i32,
        _aspect_info: Option<NonNull<c_void>>,
        _target_device: Option<&TargetDevice>,
        _target_dc: Option<Hdc>,
        dc: &mut DeviceContext<'_>,
        bounds: &Rect,
        _window_bounds: Option<&Rect>,
        _continue_fn: Option<ContinueFn>,
        _continue_arg: u32,
    ) -> Result<(), DrawError> {
        self.draws.set(self.draws.get() + 1);
        assert_eq!(aspect, DVASPECT_CONTENT);
        assert_eq!(index, LINDEX_WHOLE);
        if let Some(code) = self.fail_with {
            return Err(DrawError::new(code, "diagonal refused"));
        }
        let n = bounds.width().min(bounds.height()) as i32;
        for i in 0..n {
            dc.put_pixel(bounds.left + i, bounds.top + i, Color::BLACK)
                .map_err(|e| DrawError::new(VIEW_E_DRAW, e.to_string()))?;
        }
        Ok(())
    }
}

struct Label;

impl EmbeddedObject for Label {}

#[test]
fn test_event_order_on_success() {
    let mut surface = RecordingSurface::new(8, 8);
    let object = Diagonal::ok();

    render_into_surface(&object, &mut surface, Color::WHITE).unwrap();

    let hdc = match surface.events[1] {
        Event::GetHdc(hdc) => hdc,
        ref other => panic!("expected GetHdc, got {:?}", other),
    };
    assert_eq!(
        surface.events,
        vec![
            Event::Clear(Color::WHITE),
            Event::GetHdc(hdc),
            Event::ReleaseHdc(hdc)
        ]
    );
    assert_eq!(object.draws.get(), 1);
    assert_eq!(*surface.image.get_pixel(3, 3), Rgba([0, 0, 0, 255]));
    assert_eq!(*surface.image.get_pixel(3, 4), Rgba([255, 255, 255, 255]));
}

#[rstest]
#[case::draw_failure(VIEW_E_DRAW)]
#[case::blank(OLE_E_BLANK)]
#[case::unspecified(E_FAIL)]
fn test_failed_draw_releases_handle_once(#[case] code: u32) {
    let mut surface = RecordingSurface::new(4, 4);
    let object = Diagonal::failing(code);

    let err = render_into_surface(&object, &mut surface, Color::BLACK).unwrap_err();

    match err {
        Error::RenderFailure { code: got, .. } => assert_eq!(got, code),
        other => panic!("expected RenderFailure, got {:?}", other),
    }
    assert_eq!(surface.count(|e| matches!(e, Event::GetHdc(_))), 1);
    assert_eq!(surface.count(|e| matches!(e, Event::ReleaseHdc(_))), 1);
    assert!(surface.outstanding.is_none());
    assert!(surface
        .image
        .pixels()
        .all(|p| *p == Color::BLACK.to_rgba()));
}

#[test]
fn test_capability_mismatch_releases_handle() {
    let mut surface = RecordingSurface::new(3, 3);

    let err = render_into_surface(&Label, &mut surface, Color::rgb(10, 20, 30)).unwrap_err();

    match &err {
        Error::CapabilityMismatch { object } => assert!(object.ends_with("Label")),
        other => panic!("expected CapabilityMismatch, got {:?}", other),
    }
    assert_eq!(surface.count(|e| matches!(e, Event::ReleaseHdc(_))), 1);
    assert!(surface
        .image
        .pixels()
        .all(|p| *p == Rgba([10, 20, 30, 255])));
}

#[test]
fn test_clear_failure_skips_draw() {
    let mut surface = RecordingSurface::new(2, 2);
    surface.fail_clear = true;
    let object = Diagonal::ok();

    let err = render_into_surface(&object, &mut surface, Color::WHITE).unwrap_err();

    assert!(matches!(err, Error::CompositeFailure(_)));
    assert!(surface.events.is_empty());
    assert_eq!(object.draws.get(), 0);
}

#[test]
fn test_render_into_raster_overwrites_prior_content() {
    let mut image = RgbaImage::from_pixel(5, 5, Rgba([1, 2, 3, 4]));

    render_into(&Diagonal::ok(), &mut image, Color::WHITE).unwrap();

    assert_eq!(*image.get_pixel(4, 0), Rgba([255, 255, 255, 255]));
    assert_eq!(*image.get_pixel(4, 4), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_zero_sized_destination() {
    let mut image = RgbaImage::new(0, 0);
    let object = Diagonal::ok();

    render_into(&object, &mut image, Color::WHITE).unwrap();

    assert_eq!(object.draws.get(), 1);
}

#[test]
fn test_static_picture_renders_through_bridge() {
    let mut source = RgbaImage::from_pixel(2, 2, Rgba([0, 128, 0, 255]));
    source.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
    let picture = StaticPicture::new(source);

    let image = render_to_image(&picture, 2, 2, Color::WHITE).unwrap();

    assert_eq!(*image.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    assert_eq!(*image.get_pixel(1, 1), Rgba([0, 128, 0, 255]));
}

#[rstest]
#[case(OutputFormat::Png)]
#[case(OutputFormat::Bmp)]
#[case(OutputFormat::Jpeg)]
fn test_render_to_bytes_keeps_dimensions(#[case] format: OutputFormat) {
    let bytes = render_to_bytes(&Diagonal::ok(), 20, 10, Color::WHITE, format).unwrap();
    assert_eq!(decode_image(&bytes).unwrap().dimensions(), (20, 10));
}
