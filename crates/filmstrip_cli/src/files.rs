use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use filmstrip_render::session::{Encoder, ImagePicker, PickedImage, Printer};
use filmstrip_render::{FilmstripError, SourceImage};
use image::codecs::jpeg::JpegEncoder;
use image::{GenericImageView, RgbImage};
use log::debug;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by path. A previously written composite
/// named `output_name` is left out.
pub fn images_in_directory(dir: &Path, output_name: &str) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name() != output_name)
        .map(|entry| entry.into_path())
        .filter(|path| is_image_file(path))
        .collect();
    entries.sort();
    entries
}

/// Picks the photos named on the command line, or every image in a single directory.
pub struct FilePicker {
    paths: Vec<PathBuf>,
}

impl FilePicker {
    pub fn new(inputs: &[PathBuf], output_name: &str) -> Self {
        let paths = match inputs {
            [dir] if dir.is_dir() => images_in_directory(dir, output_name),
            _ => inputs.to_vec(),
        };
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl ImagePicker for FilePicker {
    fn pick(&mut self, count: usize) -> Result<Vec<PickedImage>, FilmstripError> {
        if self.paths.len() != count {
            return Err(FilmstripError::Selection { expected: count, found: self.paths.len() });
        }

        let mut picked = Vec::with_capacity(count);
        for path in &self.paths {
            let image = image::open(path)?;
            let (width, height) = image.dimensions();
            debug!("loaded {} ({}x{})", path.display(), width, height);
            let label = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            picked.push(PickedImage { path: path.clone(), source: SourceImage::new(label, image) });
        }
        Ok(picked)
    }
}

pub fn encode_jpeg<W: Write>(
    raster: &RgbImage,
    quality: u8,
    writer: W,
) -> Result<(), FilmstripError> {
    let mut encoder = JpegEncoder::new_with_quality(writer, quality);
    encoder.encode_image(raster)?;
    Ok(())
}

pub struct JpegFileEncoder {
    quality: u8,
}

impl JpegFileEncoder {
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }
}

impl Encoder for JpegFileEncoder {
    fn encode(&mut self, raster: &RgbImage, destination: &Path) -> Result<(), FilmstripError> {
        let mut writer = BufWriter::new(File::create(destination)?);
        encode_jpeg(raster, self.quality, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Pipes the composite as a JPEG into a print spooler command such as `lp`.
pub struct CommandPrinter {
    program: String,
    args: Vec<String>,
    quality: u8,
}

impl CommandPrinter {
    pub fn new(command: &str, quality: u8) -> Result<Self, FilmstripError> {
        let mut parts = command.split_whitespace().map(str::to_owned);
        let program = parts
            .next()
            .ok_or_else(|| FilmstripError::Print("print command is empty".to_owned()))?;
        Ok(Self { program, args: parts.collect(), quality })
    }
}

impl Printer for CommandPrinter {
    fn print(&mut self, raster: &RgbImage) -> Result<(), FilmstripError> {
        let mut job = Vec::new();
        encode_jpeg(raster, self.quality, &mut job)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|err| {
                FilmstripError::Print(format!("failed to start {}: {err}", self.program))
            })?;

        // stdin is dropped before waiting so the spooler sees end of input
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&job),
            None => Ok(()),
        };

        let status = child.wait()?;
        written?;
        if status.success() {
            Ok(())
        } else {
            Err(FilmstripError::Print(format!("{} exited with {status}", self.program)))
        }
    }
}
