//! End-to-end checks of the public layout and compositing API.

use filmstrip_render::{
    fit, plan, Canvas, FilmstripOptions, FilmstripRenderer, FrameSpacing, LayoutParameters, Rect,
    SourceImage,
};
use image::{DynamicImage, Rgb, RgbImage};
use pretty_assertions::assert_eq;

const TOLERANCE: f64 = 1e-6;

fn print_canvas() -> Canvas {
    Canvas::new(1155, 1726, 309.0)
}

fn photo(width: u32, height: u32, color: Rgb<u8>) -> SourceImage {
    SourceImage::new(
        format!("{width}x{height}"),
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, color)),
    )
}

#[test]
fn two_strips_on_print_canvas() {
    let canvas = print_canvas();
    let strips = plan(&canvas, &LayoutParameters::default());

    assert_eq!(strips.len(), 2);
    for strip in &strips {
        assert_eq!(strip.rect.width.round(), 520.0);
        assert_eq!(strip.frames.len(), 3);
    }

    let spacing = strips[1].rect.x - strips[0].rect.right();
    assert_eq!(spacing.round(), 58.0);

    let left_margin = strips[0].rect.x;
    let right_margin = canvas.width_f64() - strips[1].rect.right();
    assert!((left_margin - right_margin).abs() < TOLERANCE);

    let top_margin = strips[0].rect.y;
    let bottom_margin = canvas.height_f64() - strips[0].rect.bottom();
    assert!((top_margin - bottom_margin).abs() < TOLERANCE);

    for frame in &strips[0].frames {
        assert!((frame.rect.height - strips[0].rect.height / 3.0).abs() < TOLERANCE);
    }
    assert!(strips[0].frame_gap().abs() < TOLERANCE);
}

#[test]
fn frames_and_gaps_sum_to_strip_height() {
    let canvas = print_canvas();
    let params = LayoutParameters {
        frame_spacing: FrameSpacing::FrameHeightFraction(0.28),
        ..LayoutParameters::default()
    };

    for strip in plan(&canvas, &params) {
        let gap = strip.frame_gap();
        assert!(gap > 0.0);

        let heights: f64 = strip.frames.iter().map(|frame| frame.rect.height).sum();
        let total = heights + gap * (strip.frames.len() + 1) as f64;
        assert!((total - strip.rect.height).abs() < TOLERANCE);
    }
}

#[test]
fn landscape_photo_in_portrait_frame() {
    let frame = Rect::new(40.0, 60.0, 520.0, 550.0);
    let fit = fit(&frame, 4000, 3000).unwrap();

    assert!((fit.scale - 0.13).abs() < TOLERANCE);
    assert!((fit.scaled_width - 520.0).abs() < TOLERANCE);
    assert!((fit.scaled_height - 390.0).abs() < TOLERANCE);
    assert!((fit.offset_x - frame.x).abs() < TOLERANCE);
    assert!((fit.offset_y - (frame.y + 80.0)).abs() < TOLERANCE);
}

#[test]
fn photos_always_paint_over_strip_fill() {
    let colors = [Rgb([200, 30, 30]), Rgb([30, 200, 30]), Rgb([30, 30, 200])];
    let sources =
        [photo(640, 480, colors[0]), photo(480, 640, colors[1]), photo(500, 500, colors[2])];
    let options = FilmstripOptions { canvas: Canvas::new(578, 863, 155.0), ..Default::default() };

    let output = FilmstripRenderer.render(&sources, &options).unwrap();
    let raster = &output.raster;

    for placement in &output.placements {
        let bounds = placement.rect().pixel_bounds(&options.canvas);
        let expected = colors[placement.source];
        // sample away from resampling edges
        for (x, y) in [
            (bounds.x + 2, bounds.y + 2),
            (bounds.x + bounds.width - 3, bounds.y + bounds.height - 3),
            (bounds.x + bounds.width / 2, bounds.y + bounds.height / 2),
        ] {
            assert_eq!(
                *raster.get_pixel(x, y),
                expected,
                "strip {} slot {}",
                placement.strip,
                placement.slot
            );
        }
    }
}

#[test]
fn strips_repeat_the_same_sequence() {
    let sources = [
        photo(300, 200, Rgb([250, 0, 0])),
        photo(200, 300, Rgb([0, 250, 0])),
        photo(300, 300, Rgb([0, 0, 250])),
    ];
    let options = FilmstripOptions { canvas: Canvas::new(400, 600, 100.0), ..Default::default() };
    let output = FilmstripRenderer.render(&sources, &options).unwrap();

    let first: Vec<usize> =
        output.placements.iter().filter(|p| p.strip == 0).map(|p| p.source).collect();
    let second: Vec<usize> =
        output.placements.iter().filter(|p| p.strip == 1).map(|p| p.source).collect();
    assert_eq!(first, vec![0, 1, 2]);
    assert_eq!(first, second);

    // the second strip is the first one shifted right by strip width plus spacing
    let shift = output.strips[1].rect.x - output.strips[0].rect.x;
    for (a, b) in output.placements[..3].iter().zip(&output.placements[3..]) {
        assert!((b.fit.offset_x - a.fit.offset_x - shift).abs() < TOLERANCE);
        assert!((b.fit.offset_y - a.fit.offset_y).abs() < TOLERANCE);
    }
}

#[test]
fn zero_pixel_source_fails_the_whole_render() {
    let sources = [
        photo(300, 200, Rgb([1, 2, 3])),
        SourceImage::new("broken", DynamicImage::ImageRgb8(RgbImage::new(0, 0))),
        photo(300, 300, Rgb([1, 2, 3])),
    ];
    let err = FilmstripRenderer.render(&sources, &FilmstripOptions::default()).unwrap_err();
    assert!(err.to_string().contains("broken"), "{err}");
}
