use std::collections::HashMap;

use image::imageops::FilterType;
use image::RgbImage;
use log::debug;

use super::layers::{Layer, LayerStack};
use super::source::SourceImage;
use crate::layout::canvas::{Canvas, Rect};
use crate::layout::fit::{fit, Fit};
use crate::layout::plan::{LayoutParameters, Strip};
use crate::FilmstripError;

/// The document fill showing wherever no strip is painted.
pub const PAPER: image::Rgb<u8> = image::Rgb([255, 255, 255]);

/// One photograph assigned to one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub strip: usize,
    pub slot: usize,
    /// Index into the source list.
    pub source: usize,
    pub fit: Fit,
}

impl Placement {
    pub fn rect(&self) -> Rect {
        self.fit.rect()
    }
}

/// Fits the assigned source into every frame of every strip.
pub fn place(
    strips: &[Strip],
    dimensions: &[(u32, u32)],
    labels: &[&str],
    params: &LayoutParameters,
) -> Result<Vec<Placement>, FilmstripError> {
    let mut placements = Vec::with_capacity(strips.iter().map(|strip| strip.frames.len()).sum());

    for strip in strips {
        for frame in &strip.frames {
            let source = params.source_index(strip.index, frame.slot);
            let &(width, height) = dimensions.get(source).ok_or(FilmstripError::SourceCount {
                expected: params.required_sources(),
                found: dimensions.len(),
            })?;

            let fit =
                fit(&frame.rect, width, height).ok_or_else(|| FilmstripError::InvalidImage {
                    strip: strip.index,
                    slot: frame.slot,
                    label: labels.get(source).map(|label| label.to_string()).unwrap_or_default(),
                    width,
                    height,
                })?;

            debug!(
                "strip {} frame {}: source {} scaled by {:.4} to {:.1}x{:.1} at ({:.1}, {:.1})",
                strip.index,
                frame.slot,
                source,
                fit.scale,
                fit.scaled_width,
                fit.scaled_height,
                fit.offset_x,
                fit.offset_y
            );

            placements.push(Placement { strip: strip.index, slot: frame.slot, source, fit });
        }
    }

    Ok(placements)
}

/// Builds the layer stack for a planned filmstrip: one solid layer per strip, then one
/// resampled photo layer per placement.
pub fn build_layers(
    canvas: &Canvas,
    strips: &[Strip],
    sources: &[SourceImage],
    placements: &[Placement],
    params: &LayoutParameters,
) -> LayerStack {
    let mut stack = LayerStack::new(canvas.width, canvas.height, PAPER);

    for strip in strips {
        let bounds = strip.rect.pixel_bounds(canvas);
        stack.push(Layer::solid(
            format!("Filmstrip_{}", strip.index + 1),
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            params.background,
        ));
    }

    // Strips are equally sized, so a duplicated photo resamples to the same size each time.
    let mut resampled: HashMap<(usize, u32, u32), RgbImage> = HashMap::new();
    for placement in placements {
        let (width, height) = placement.fit.pixel_size();
        let pixels = resampled
            .entry((placement.source, width, height))
            .or_insert_with(|| {
                sources[placement.source]
                    .image()
                    .resize_exact(width, height, FilterType::CatmullRom)
                    .to_rgb8()
            })
            .clone();

        let (x, y) = placement.fit.pixel_offset();
        stack.push(Layer::photo(
            format!("Photo_{}_{}", placement.strip + 1, placement.slot + 1),
            x,
            y,
            pixels,
        ));
    }

    stack
}

/// Paints strips and photos into one opaque raster the size of the canvas.
pub fn render(
    canvas: &Canvas,
    strips: &[Strip],
    sources: &[SourceImage],
    params: &LayoutParameters,
) -> Result<(RgbImage, Vec<Placement>), FilmstripError> {
    let dimensions: Vec<(u32, u32)> = sources.iter().map(SourceImage::dimensions).collect();
    let labels: Vec<&str> = sources.iter().map(SourceImage::label).collect();
    let placements = place(strips, &dimensions, &labels, params)?;

    let mut stack = build_layers(canvas, strips, sources, &placements, params);
    stack.move_backgrounds_to_bottom();

    Ok((stack.flatten(), placements))
}
