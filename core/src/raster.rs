use crate::metadata::METADATA_KEYWORD;
use crate::prelude::PolarResult;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// RGB8 pixel buffer produced by the renderer.
///
/// Carries an optional serialized-header payload that outlives the decode
/// session; `write_png` emits it as a text chunk next to the pixel data.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    metadata: Option<String>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
            metadata: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Writes one pixel. Coordinates must lie inside the raster.
    pub fn put(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} raster",
            x,
            y,
            self.width,
            self.height
        );
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[offset..offset + 3].copy_from_slice(&rgb);
    }

    /// Reads one pixel. Coordinates must lie inside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} raster",
            x,
            y,
            self.width,
            self.height
        );
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    pub fn set_metadata(&mut self, payload: String) {
        self.metadata = Some(payload);
    }

    /// Writes the raster as a PNG, emitting any attached metadata as a
    /// `json_data` text chunk ahead of the pixel data.
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> PolarResult<()> {
        let file = File::create(path)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width, self.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        if let Some(payload) = &self.metadata {
            encoder.add_text_chunk(METADATA_KEYWORD.to_string(), payload.clone())?;
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        Ok(())
    }
}
