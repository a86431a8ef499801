//! Runs a full filmstrip job around the renderer: pick photos, compose, print, save.
//!
//! File dialogs, print spooling and JPEG writing live outside this crate. They are
//! passed in as [`ImagePicker`], [`Printer`] and [`Encoder`] implementations.

use std::path::{Path, PathBuf};

use image::RgbImage;
use log::info;

use crate::raster::source::SourceImage;
use crate::{FilmstripError, FilmstripOptions, FilmstripRenderer};

/// A decoded photo together with the file it came from.
#[derive(Clone, Debug)]
pub struct PickedImage {
    pub path: PathBuf,
    pub source: SourceImage,
}

pub trait ImagePicker {
    /// Returns exactly `count` images or fails with [`FilmstripError::Selection`].
    fn pick(&mut self, count: usize) -> Result<Vec<PickedImage>, FilmstripError>;
}

pub trait Encoder {
    fn encode(&mut self, raster: &RgbImage, destination: &Path) -> Result<(), FilmstripError>;
}

pub trait Printer {
    fn print(&mut self, raster: &RgbImage) -> Result<(), FilmstripError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub printed: bool,
    pub placements: usize,
}

/// `file_name` in the directory holding `first_input`.
pub fn output_path(first_input: &Path, file_name: &str) -> PathBuf {
    match first_input.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

pub struct Session {
    options: FilmstripOptions,
    file_name: String,
    output_override: Option<PathBuf>,
    renderer: FilmstripRenderer,
}

impl Session {
    pub fn new(options: FilmstripOptions, file_name: impl Into<String>) -> Self {
        Self {
            options,
            file_name: file_name.into(),
            output_override: None,
            renderer: FilmstripRenderer,
        }
    }

    /// Saves to `path` instead of next to the first input.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_override = Some(path.into());
        self
    }

    pub fn options(&self) -> &FilmstripOptions {
        &self.options
    }

    /// The composite only lives for the duration of this call; nothing is kept
    /// once it has been printed and encoded.
    pub fn run(
        &self,
        picker: &mut dyn ImagePicker,
        printer: Option<&mut dyn Printer>,
        encoder: &mut dyn Encoder,
    ) -> Result<SessionReport, FilmstripError> {
        self.options.layout.validate(&self.options.canvas)?;
        let expected = self.options.layout.required_sources();
        let picked = picker.pick(expected)?;
        if picked.len() != expected {
            return Err(FilmstripError::Selection { expected, found: picked.len() });
        }

        let inputs: Vec<PathBuf> = picked.iter().map(|image| image.path.clone()).collect();
        let output = match &self.output_override {
            Some(path) => path.clone(),
            None => output_path(&inputs[0], &self.file_name),
        };
        let sources: Vec<SourceImage> = picked.into_iter().map(|image| image.source).collect();

        let rendered = self.renderer.render(&sources, &self.options)?;
        info!(
            "composed {} photos into a {}x{} filmstrip",
            sources.len(),
            rendered.raster.width(),
            rendered.raster.height()
        );

        let printed = match printer {
            Some(printer) => {
                printer.print(&rendered.raster)?;
                info!("sent filmstrip to the printer");
                true
            },
            None => false,
        };

        encoder.encode(&rendered.raster, &output)?;
        info!("saved filmstrip to {}", output.display());

        Ok(SessionReport { inputs, output, printed, placements: rendered.placements.len() })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use image::{DynamicImage, Rgb};
    use pretty_assertions::assert_eq;

    use super::*;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct FixedPicker {
        images: Vec<PickedImage>,
        journal: Journal,
    }

    impl ImagePicker for FixedPicker {
        fn pick(&mut self, _count: usize) -> Result<Vec<PickedImage>, FilmstripError> {
            self.journal.borrow_mut().push("pick".to_owned());
            Ok(std::mem::take(&mut self.images))
        }
    }

    struct RecordingPrinter(Journal);

    impl Printer for RecordingPrinter {
        fn print(&mut self, raster: &RgbImage) -> Result<(), FilmstripError> {
            self.0.borrow_mut().push(format!("print {}x{}", raster.width(), raster.height()));
            Ok(())
        }
    }

    struct RecordingEncoder(Journal);

    impl Encoder for RecordingEncoder {
        fn encode(&mut self, _raster: &RgbImage, destination: &Path) -> Result<(), FilmstripError> {
            self.0.borrow_mut().push(format!("encode {}", destination.display()));
            Ok(())
        }
    }

    fn picked(path: &str) -> PickedImage {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([90, 90, 90])));
        PickedImage { path: PathBuf::from(path), source: SourceImage::new(path, image) }
    }

    fn small_options() -> FilmstripOptions {
        FilmstripOptions {
            canvas: crate::Canvas::new(120, 180, 72.0),
            ..FilmstripOptions::default()
        }
    }

    #[test]
    fn output_lands_next_to_first_input() {
        assert_eq!(
            output_path(Path::new("/photos/trip/a.jpg"), "Filmstrip.jpg"),
            PathBuf::from("/photos/trip/Filmstrip.jpg")
        );
        assert_eq!(
            output_path(Path::new("a.jpg"), "Filmstrip.jpg"),
            PathBuf::from("Filmstrip.jpg")
        );
    }

    #[test]
    fn prints_before_saving() {
        let journal = Journal::default();
        let mut picker = FixedPicker {
            images: vec![picked("/p/a.jpg"), picked("/q/b.jpg"), picked("/q/c.jpg")],
            journal: journal.clone(),
        };
        let mut printer = RecordingPrinter(journal.clone());
        let mut encoder = RecordingEncoder(journal.clone());

        let session = Session::new(small_options(), "Filmstrip.jpg");
        let report = session.run(&mut picker, Some(&mut printer), &mut encoder).unwrap();

        assert_eq!(*journal.borrow(), ["pick", "print 120x180", "encode /p/Filmstrip.jpg"]);
        assert_eq!(report.output, PathBuf::from("/p/Filmstrip.jpg"));
        assert_eq!(report.placements, 6);
        assert!(report.printed);
    }

    #[test]
    fn printing_is_optional() {
        let journal = Journal::default();
        let mut picker = FixedPicker {
            images: vec![picked("a.jpg"), picked("b.jpg"), picked("c.jpg")],
            journal: journal.clone(),
        };
        let mut encoder = RecordingEncoder(journal.clone());

        let report =
            Session::new(small_options(), "out.jpg").run(&mut picker, None, &mut encoder).unwrap();

        assert!(!report.printed);
        assert_eq!(*journal.borrow(), ["pick", "encode out.jpg"]);
    }

    #[test]
    fn explicit_output_path_wins() {
        let journal = Journal::default();
        let mut picker = FixedPicker {
            images: vec![picked("/p/a.jpg"), picked("/p/b.jpg"), picked("/p/c.jpg")],
            journal: journal.clone(),
        };
        let mut encoder = RecordingEncoder(journal.clone());

        let report = Session::new(small_options(), "Filmstrip.jpg")
            .with_output_path("/prints/today.jpg")
            .run(&mut picker, None, &mut encoder)
            .unwrap();

        assert_eq!(report.output, PathBuf::from("/prints/today.jpg"));
        assert_eq!(*journal.borrow(), ["pick", "encode /prints/today.jpg"]);
    }

    #[test]
    fn wrong_selection_count_stops_before_output() {
        let journal = Journal::default();
        let mut picker = FixedPicker {
            images: vec![picked("a.jpg"), picked("b.jpg")],
            journal: journal.clone(),
        };
        let mut printer = RecordingPrinter(journal.clone());
        let mut encoder = RecordingEncoder(journal.clone());

        let err = Session::new(small_options(), "Filmstrip.jpg")
            .run(&mut picker, Some(&mut printer), &mut encoder)
            .unwrap_err();

        assert!(matches!(err, FilmstripError::Selection { expected: 3, found: 2 }));
        assert_eq!(*journal.borrow(), ["pick"]);
    }
}
