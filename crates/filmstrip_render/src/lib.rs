mod layout;
mod raster;

pub mod config;
pub mod session;

use image::RgbImage;
use log::debug;

pub use config::FilmstripConfig;
pub use layout::{
    canvas::{Canvas, PhysicalSize, PixelBounds, Rect},
    fit::{fit, Fit},
    plan::{plan, Frame, FrameSpacing, LayoutParameters, Strip},
};
pub use raster::{
    color,
    compose::{Placement, PAPER},
    layers::{Layer, LayerKind, LayerStack},
    source::SourceImage,
};

use raster::compose;

#[derive(Debug, thiserror::Error)]
pub enum FilmstripError {
    #[error("invalid layout: {0}")]
    Configuration(String),
    #[error("image {label:?} for strip {strip} frame {slot} has unusable size {width}x{height}")]
    InvalidImage { strip: usize, slot: usize, label: String, width: u32, height: u32 },
    #[error("expected {expected} source images, got {found}")]
    SourceCount { expected: usize, found: usize },
    #[error("please select exactly {expected} images (got {found})")]
    Selection { expected: usize, found: usize },
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("print failed: {0}")]
    Print(String),
}

/// Opaque RGB output, one byte per channel.
pub type RasterBuffer = RgbImage;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilmstripOptions {
    pub canvas: Canvas,
    pub layout: LayoutParameters,
}

#[derive(Clone, Debug)]
pub struct RenderOutput {
    /// Flattened RGB composite with the canvas dimensions.
    pub raster: RasterBuffer,
    pub strips: Vec<Strip>,
    pub placements: Vec<Placement>,
}

/// Geometry of a filmstrip without any pixels, for previews and reports.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPlan {
    pub canvas: Canvas,
    pub strips: Vec<Strip>,
    pub placements: Vec<Placement>,
}

#[derive(Default)]
pub struct FilmstripRenderer;

impl FilmstripRenderer {
    pub fn render(
        &self,
        sources: &[SourceImage],
        options: &FilmstripOptions,
    ) -> Result<RenderOutput, FilmstripError> {
        check_source_count(sources.len(), &options.layout)?;
        options.layout.validate(&options.canvas)?;

        let strips = plan(&options.canvas, &options.layout);
        let (raster, placements) =
            compose::render(&options.canvas, &strips, sources, &options.layout)?;

        debug!(
            "rendered {}x{} filmstrip with {} placements",
            raster.width(),
            raster.height(),
            placements.len()
        );

        Ok(RenderOutput { raster, strips, placements })
    }

    /// Plans strips and fits images of the given pixel sizes without resampling.
    pub fn plan_only(
        &self,
        dimensions: &[(u32, u32)],
        options: &FilmstripOptions,
    ) -> Result<LayoutPlan, FilmstripError> {
        check_source_count(dimensions.len(), &options.layout)?;
        options.layout.validate(&options.canvas)?;

        let strips = plan(&options.canvas, &options.layout);
        let labels: Vec<String> = (1..=dimensions.len()).map(|n| format!("image {n}")).collect();
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        let placements = compose::place(&strips, dimensions, &labels, &options.layout)?;

        Ok(LayoutPlan { canvas: options.canvas, strips, placements })
    }
}

fn check_source_count(found: usize, layout: &LayoutParameters) -> Result<(), FilmstripError> {
    let expected = layout.required_sources();
    if found == expected {
        Ok(())
    } else {
        Err(FilmstripError::SourceCount { expected, found })
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Rgb};

    use super::*;

    fn source(width: u32, height: u32) -> SourceImage {
        SourceImage::new(
            format!("{width}x{height}"),
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 20, 30]))),
        )
    }

    #[test]
    fn default_render_matches_canvas() {
        let sources = [source(40, 30), source(30, 40), source(20, 20)];
        let output = FilmstripRenderer.render(&sources, &FilmstripOptions::default()).unwrap();

        assert_eq!(output.raster.dimensions(), (1139, 1708));
        assert_eq!(output.strips.len(), 2);
        assert_eq!(output.placements.len(), 6);
    }

    #[test]
    fn wrong_source_count_is_rejected_before_planning() {
        let sources = [source(40, 30), source(30, 40)];
        let err = FilmstripRenderer.render(&sources, &FilmstripOptions::default()).unwrap_err();
        assert!(matches!(err, FilmstripError::SourceCount { expected: 3, found: 2 }));
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let options = FilmstripOptions {
            layout: LayoutParameters { strip_width_fraction: 0.6, ..Default::default() },
            ..Default::default()
        };
        let err = FilmstripRenderer.plan_only(&[(1, 1); 3], &options).unwrap_err();
        assert!(matches!(err, FilmstripError::Configuration(_)));
    }

    #[test]
    fn plan_only_matches_render_geometry() {
        let sources = [source(40, 30), source(30, 40), source(20, 20)];
        let options = FilmstripOptions::default();
        let rendered = FilmstripRenderer.render(&sources, &options).unwrap();
        let planned =
            FilmstripRenderer.plan_only(&[(40, 30), (30, 40), (20, 20)], &options).unwrap();

        assert_eq!(rendered.strips, planned.strips);
        assert_eq!(rendered.placements, planned.placements);
    }
}
