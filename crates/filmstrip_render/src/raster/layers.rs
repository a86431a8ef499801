use image::{imageops, Rgb, RgbImage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Solid strip fill.
    Background,
    /// A resampled photograph.
    Photo,
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub name: String,
    pub kind: LayerKind,
    pub x: i64,
    pub y: i64,
    pub pixels: RgbImage,
}

impl Layer {
    pub fn solid(
        name: impl Into<String>,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Rgb<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Background,
            x: i64::from(x),
            y: i64::from(y),
            pixels: RgbImage::from_pixel(width, height, color),
        }
    }

    pub fn photo(name: impl Into<String>, x: i64, y: i64, pixels: RgbImage) -> Self {
        Self { name: name.into(), kind: LayerKind::Photo, x, y, pixels }
    }
}

/// Ordered layers over an opaque base fill. Index 0 is the bottom of the stack.
#[derive(Clone, Debug)]
pub struct LayerStack {
    width: u32,
    height: u32,
    base: Rgb<u8>,
    layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new(width: u32, height: u32, base: Rgb<u8>) -> Self {
        Self { width, height, base, layers: Vec::new() }
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Moves every background layer beneath all other layers. Relative order within
    /// each group is kept.
    pub fn move_backgrounds_to_bottom(&mut self) {
        let (mut backgrounds, others): (Vec<Layer>, Vec<Layer>) =
            self.layers.drain(..).partition(|layer| layer.kind == LayerKind::Background);
        backgrounds.extend(others);
        self.layers = backgrounds;
    }

    /// Paints the layers bottom to top onto the base fill. Later layers overwrite
    /// earlier ones; anything outside the canvas is clipped.
    pub fn flatten(self) -> RgbImage {
        let mut raster = RgbImage::from_pixel(self.width, self.height, self.base);
        for layer in &self.layers {
            imageops::replace(&mut raster, &layer.pixels, layer.x, layer.y);
        }
        raster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn later_layers_overwrite_earlier_ones() {
        let mut stack = LayerStack::new(10, 10, WHITE);
        stack.push(Layer::solid("bg", 0, 0, 10, 10, BLACK));
        stack.push(Layer::photo("photo", 2, 2, RgbImage::from_pixel(3, 3, RED)));

        let raster = stack.flatten();
        assert_eq!(*raster.get_pixel(3, 3), RED);
        assert_eq!(*raster.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn backgrounds_move_beneath_photos() {
        let mut stack = LayerStack::new(10, 10, WHITE);
        stack.push(Layer::photo("photo_a", 0, 0, RgbImage::from_pixel(5, 5, RED)));
        stack.push(Layer::solid("bg_1", 0, 0, 10, 10, BLACK));
        stack.push(Layer::photo("photo_b", 5, 5, RgbImage::from_pixel(5, 5, RED)));
        stack.push(Layer::solid("bg_2", 0, 0, 10, 10, BLACK));

        stack.move_backgrounds_to_bottom();
        let names: Vec<&str> = stack.layers().iter().map(|layer| layer.name.as_str()).collect();
        assert_eq!(names, ["bg_1", "bg_2", "photo_a", "photo_b"]);

        let raster = stack.flatten();
        assert_eq!(*raster.get_pixel(1, 1), RED);
        assert_eq!(*raster.get_pixel(9, 9), RED);
        assert_eq!(*raster.get_pixel(7, 1), BLACK);
    }

    #[test]
    fn out_of_bounds_layers_are_clipped() {
        let mut stack = LayerStack::new(4, 4, WHITE);
        stack.push(Layer::photo("edge", -2, 2, RgbImage::from_pixel(4, 4, RED)));

        let raster = stack.flatten();
        assert_eq!(raster.dimensions(), (4, 4));
        assert_eq!(*raster.get_pixel(0, 3), RED);
        assert_eq!(*raster.get_pixel(2, 3), WHITE);
        assert_eq!(*raster.get_pixel(0, 0), WHITE);
    }
}
