use super::canvas::Rect;

/// Uniform scale and top-left draw position of an image fitted inside a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    pub scale: f64,
    pub scaled_width: f64,
    pub scaled_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Fit {
    pub fn rect(&self) -> Rect {
        Rect::new(self.offset_x, self.offset_y, self.scaled_width, self.scaled_height)
    }

    /// Scaled size rounded to whole pixels, never smaller than 1x1.
    pub fn pixel_size(&self) -> (u32, u32) {
        let round = |v: f64| v.round().clamp(1.0, u32::MAX as f64) as u32;
        (round(self.scaled_width), round(self.scaled_height))
    }

    pub fn pixel_offset(&self) -> (i64, i64) {
        (self.offset_x.round() as i64, self.offset_y.round() as i64)
    }
}

/// Contain-fit: scales `width`x`height` uniformly until the limiting axis meets the
/// frame, then centers it. Returns `None` for an empty image.
pub fn fit(frame: &Rect, width: u32, height: u32) -> Option<Fit> {
    if width == 0 || height == 0 {
        return None;
    }

    let width = f64::from(width);
    let height = f64::from(height);
    let scale = (frame.width / width).min(frame.height / height);

    let scaled_width = width * scale;
    let scaled_height = height * scale;

    Some(Fit {
        scale,
        scaled_width,
        scaled_height,
        offset_x: frame.x + (frame.width - scaled_width) / 2.0,
        offset_y: frame.y + (frame.height - scaled_height) / 2.0,
    })
}
