//! User-facing configuration, usually read from a TOML file.
//!
//! Every key is optional; missing keys fall back to the classic 2 x 3 black
//! filmstrip printed on a 3.879in x 5.819in page shrunk to 95% at 309 ppi.

use serde::{Deserialize, Serialize};

use crate::layout::canvas::{Canvas, PhysicalSize};
use crate::layout::plan::{FrameSpacing, LayoutParameters};
use crate::raster::color;
use crate::{FilmstripError, FilmstripOptions};

pub const DEFAULT_FILE_NAME: &str = "Filmstrip.jpg";
pub const DEFAULT_JPEG_QUALITY: u8 = 85;
pub const DEFAULT_PRINT_COMMAND: &str = "lp";

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FilmstripConfig {
    pub canvas: CanvasConfig,
    pub layout: LayoutConfig,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CanvasConfig {
    pub width_inches: f64,
    pub height_inches: f64,
    pub scale: f64,
    /// Pixels per inch.
    pub resolution: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        let size = PhysicalSize::default();
        Self {
            width_inches: size.width_inches,
            height_inches: size.height_inches,
            scale: size.scale,
            resolution: size.resolution,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LayoutConfig {
    pub strip_count: usize,
    pub frames_per_strip: usize,
    pub strip_width: f64,
    pub strip_height: f64,
    pub strip_spacing: f64,
    pub frame_height: FrameHeight,
    pub background: String,
    pub duplicate_across_strips: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let params = LayoutParameters::default();
        Self {
            strip_count: params.strip_count,
            frames_per_strip: params.frames_per_strip,
            strip_width: params.strip_width_fraction,
            strip_height: params.strip_height_fraction,
            strip_spacing: params.spacing_fraction,
            frame_height: FrameHeight::default(),
            background: color::to_hex(params.background),
            duplicate_across_strips: params.duplicate_across_strips,
        }
    }
}

/// `frame-height = "flush"` splits the strip evenly with no gaps; a number is the
/// frame height as a fraction of the strip height.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FrameHeight {
    Keyword(FrameHeightKeyword),
    Fraction(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameHeightKeyword {
    Flush,
}

impl Default for FrameHeight {
    fn default() -> Self {
        Self::Keyword(FrameHeightKeyword::Flush)
    }
}

impl From<FrameHeight> for FrameSpacing {
    fn from(height: FrameHeight) -> Self {
        match height {
            FrameHeight::Keyword(FrameHeightKeyword::Flush) => FrameSpacing::Flush,
            FrameHeight::Fraction(fraction) => FrameSpacing::FrameHeightFraction(fraction),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Written next to the first input image.
    pub file_name: String,
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
    pub print_command: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_owned(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            print_command: DEFAULT_PRINT_COMMAND.to_owned(),
        }
    }
}

impl CanvasConfig {
    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width_inches: self.width_inches,
            height_inches: self.height_inches,
            scale: self.scale,
            resolution: self.resolution,
        }
    }
}

impl LayoutConfig {
    pub fn parameters(&self) -> Result<LayoutParameters, FilmstripError> {
        let background = color::parse_hex(&self.background).ok_or_else(|| {
            FilmstripError::Configuration(format!(
                "background {:?} is not a #rrggbb color",
                self.background
            ))
        })?;

        Ok(LayoutParameters {
            strip_count: self.strip_count,
            frames_per_strip: self.frames_per_strip,
            strip_width_fraction: self.strip_width,
            strip_height_fraction: self.strip_height,
            spacing_fraction: self.strip_spacing,
            frame_spacing: self.frame_height.into(),
            background,
            duplicate_across_strips: self.duplicate_across_strips,
        })
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<(), FilmstripError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(FilmstripError::Configuration(format!(
                "jpeg quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if self.file_name.trim().is_empty() {
            return Err(FilmstripError::Configuration("output file name is empty".to_owned()));
        }
        Ok(())
    }
}

impl FilmstripConfig {
    /// Converts to render options and checks the layout against the resulting canvas.
    pub fn options(&self) -> Result<FilmstripOptions, FilmstripError> {
        self.output.validate()?;
        let canvas = Canvas::from_physical(self.canvas.physical_size());
        let layout = self.layout.parameters()?;
        layout.validate(&canvas)?;
        Ok(FilmstripOptions { canvas, layout })
    }
}
