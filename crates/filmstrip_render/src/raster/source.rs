use image::{DynamicImage, GenericImageView};

/// A decoded photograph and the name it is reported under.
#[derive(Clone, Debug)]
pub struct SourceImage {
    label: String,
    image: DynamicImage,
}

impl SourceImage {
    pub fn new(label: impl Into<String>, image: DynamicImage) -> Self {
        Self { label: label.into(), image }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}
