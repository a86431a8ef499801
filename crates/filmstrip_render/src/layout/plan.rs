use image::Rgb;
use log::debug;

use super::canvas::{Canvas, Rect};
use crate::FilmstripError;

/// How frame height is chosen inside a strip.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum FrameSpacing {
    /// Frames split the strip height evenly and touch each other; the gap is zero.
    #[default]
    Flush,
    /// Each frame takes this fraction of the strip height. The remainder is
    /// divided into equal gaps above, between and below the frames.
    FrameHeightFraction(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParameters {
    pub strip_count: usize,
    pub frames_per_strip: usize,
    /// Width of one strip as a fraction of the canvas width.
    pub strip_width_fraction: f64,
    /// Height of every strip as a fraction of the canvas height.
    pub strip_height_fraction: f64,
    /// Gap between neighbouring strips as a fraction of the canvas width.
    pub spacing_fraction: f64,
    pub frame_spacing: FrameSpacing,
    pub background: Rgb<u8>,
    /// Every strip shows the same photo sequence instead of consuming new photos.
    pub duplicate_across_strips: bool,
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self {
            strip_count: 2,
            frames_per_strip: 3,
            strip_width_fraction: 0.45,
            strip_height_fraction: 0.90,
            spacing_fraction: 0.05,
            frame_spacing: FrameSpacing::Flush,
            background: Rgb([0, 0, 0]),
            duplicate_across_strips: true,
        }
    }
}

impl LayoutParameters {
    /// Number of distinct photos a render with these parameters consumes.
    pub fn required_sources(&self) -> usize {
        if self.duplicate_across_strips {
            self.frames_per_strip
        } else {
            self.strip_count * self.frames_per_strip
        }
    }

    /// Index into the photo list for a given strip and frame slot.
    pub fn source_index(&self, strip: usize, slot: usize) -> usize {
        if self.duplicate_across_strips {
            slot
        } else {
            strip * self.frames_per_strip + slot
        }
    }

    /// Fraction of the canvas width covered by all strips and the gaps between them.
    pub fn occupied_width_fraction(&self) -> f64 {
        let gaps = self.strip_count.saturating_sub(1) as f64;
        self.strip_width_fraction * self.strip_count as f64 + self.spacing_fraction * gaps
    }

    /// Rejects configurations that would produce empty, negative or overlapping geometry.
    /// [`plan`] assumes this has passed.
    pub fn validate(&self, canvas: &Canvas) -> Result<(), FilmstripError> {
        if canvas.is_empty() {
            return Err(config_error(format!(
                "canvas must have a positive size, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        if self.strip_count == 0 {
            return Err(config_error("strip count must be at least 1"));
        }
        if self.frames_per_strip == 0 {
            return Err(config_error("frames per strip must be at least 1"));
        }

        check_open_fraction("strip width", self.strip_width_fraction)?;
        check_open_fraction("strip height", self.strip_height_fraction)?;
        if !self.spacing_fraction.is_finite() || !(0.0..1.0).contains(&self.spacing_fraction) {
            return Err(config_error(format!(
                "strip spacing must be in [0, 1), got {}",
                self.spacing_fraction
            )));
        }

        let occupied = self.occupied_width_fraction();
        if occupied > 1.0 + 1e-9 {
            return Err(config_error(format!(
                "{} strips of {} plus spacing {} need {:.3} of the canvas width",
                self.strip_count, self.strip_width_fraction, self.spacing_fraction, occupied
            )));
        }

        if let FrameSpacing::FrameHeightFraction(fraction) = self.frame_spacing {
            check_open_fraction("frame height", fraction)?;
            if fraction * self.frames_per_strip as f64 > 1.0 + 1e-9 {
                return Err(config_error(format!(
                    "{} frames of {} do not fit in one strip",
                    self.frames_per_strip, fraction
                )));
            }
        }

        let strip_width = canvas.width_f64() * self.strip_width_fraction;
        let frame_height = self.frame_height(canvas.height_f64() * self.strip_height_fraction);
        if strip_width < 1.0 || frame_height < 1.0 {
            return Err(config_error(format!(
                "frames would be {strip_width:.2}x{frame_height:.2} px on a {}x{} canvas",
                canvas.width, canvas.height
            )));
        }

        Ok(())
    }

    fn frame_height(&self, strip_height: f64) -> f64 {
        match self.frame_spacing {
            FrameSpacing::Flush => strip_height / self.frames_per_strip as f64,
            FrameSpacing::FrameHeightFraction(fraction) => strip_height * fraction,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub strip: usize,
    pub slot: usize,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Strip {
    pub index: usize,
    pub rect: Rect,
    pub frames: Vec<Frame>,
}

impl Strip {
    /// Vertical gap above the first frame; equal to every other gap in the strip.
    pub fn frame_gap(&self) -> f64 {
        self.frames.first().map_or(0.0, |frame| frame.rect.y - self.rect.y)
    }
}

/// Lays out strips centered on the canvas, each holding evenly spaced frames.
pub fn plan(canvas: &Canvas, params: &LayoutParameters) -> Vec<Strip> {
    let canvas_width = canvas.width_f64();
    let canvas_height = canvas.height_f64();

    let strip_width = canvas_width * params.strip_width_fraction;
    let strip_height = canvas_height * params.strip_height_fraction;
    let spacing = canvas_width * params.spacing_fraction;

    let gaps = params.strip_count.saturating_sub(1) as f64;
    let total_width = strip_width * params.strip_count as f64 + spacing * gaps;
    let start_x = (canvas_width - total_width) / 2.0;
    let strip_y = (canvas_height - strip_height) / 2.0;

    let frame_height = params.frame_height(strip_height);
    let frames = params.frames_per_strip as f64;
    let spacing_unit = (strip_height - frames * frame_height) / (frames + 1.0);

    let strips: Vec<Strip> = (0..params.strip_count)
        .map(|index| {
            let x = start_x + index as f64 * (strip_width + spacing);
            let rect = Rect::new(x, strip_y, strip_width, strip_height);
            let frames = (0..params.frames_per_strip)
                .map(|slot| {
                    let y = rect.y + slot as f64 * (frame_height + spacing_unit) + spacing_unit;
                    let frame_rect = Rect::new(rect.x, y, rect.width, frame_height);
                    Frame { strip: index, slot, rect: frame_rect }
                })
                .collect();
            Strip { index, rect, frames }
        })
        .collect();

    debug!(
        "planned {} strips of {:.1}x{:.1} px starting at x={:.1}, frame height {:.1}, gap {:.1}",
        strips.len(),
        strip_width,
        strip_height,
        start_x,
        frame_height,
        spacing_unit
    );

    strips
}

fn check_open_fraction(name: &str, value: f64) -> Result<(), FilmstripError> {
    if value.is_finite() && value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(config_error(format!("{name} must be in (0, 1), got {value}")))
    }
}

fn config_error(message: impl Into<String>) -> FilmstripError {
    FilmstripError::Configuration(message.into())
}
