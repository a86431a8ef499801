/// Printed page size before conversion to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalSize {
    pub width_inches: f64,
    pub height_inches: f64,
    /// Uniform shrink applied to both axes (0.95 leaves a 5% border).
    pub scale: f64,
    /// Pixels per inch.
    pub resolution: f64,
}

impl Default for PhysicalSize {
    fn default() -> Self {
        Self { width_inches: 3.879, height_inches: 5.819, scale: 0.95, resolution: 309.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub resolution: f64,
}

impl Canvas {
    pub fn new(width: u32, height: u32, resolution: f64) -> Self {
        Self { width, height, resolution }
    }

    pub fn from_physical(size: PhysicalSize) -> Self {
        let to_pixels = |inches: f64| {
            let pixels = (inches * size.scale * size.resolution).round();
            if pixels.is_finite() && pixels > 0.0 {
                pixels.min(u32::MAX as f64) as u32
            } else {
                0
            }
        };

        Self {
            width: to_pixels(size.width_inches),
            height: to_pixels(size.height_inches),
            resolution: size.resolution,
        }
    }

    pub fn width_f64(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::from_physical(PhysicalSize::default())
    }
}

/// Axis-aligned rectangle in canvas pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Whole-pixel span of a [`Rect`], clamped to a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Containment with a small tolerance for accumulated float error.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-6;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    /// Rounds each edge to the nearest pixel, so adjacent rectangles share an edge
    /// instead of overlapping or leaving a seam.
    pub fn pixel_bounds(&self, canvas: &Canvas) -> PixelBounds {
        let clamp_x = |v: f64| v.round().clamp(0.0, canvas.width_f64()) as u32;
        let clamp_y = |v: f64| v.round().clamp(0.0, canvas.height_f64()) as u32;

        let left = clamp_x(self.x);
        let top = clamp_y(self.y);
        let right = clamp_x(self.right()).max(left);
        let bottom = clamp_y(self.bottom()).max(top);

        PixelBounds { x: left, y: top, width: right - left, height: bottom - top }
    }
}
