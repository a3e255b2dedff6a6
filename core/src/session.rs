use crate::decode::{ImageDecoder, InterpolationMethod, Interpolator};
use crate::header::{Header, HeaderParser, HeaderValue};
use crate::metadata::MetadataCodec;
use crate::prelude::PolarResult;
use crate::raster::Raster;
use crate::render::{PolarRenderer, RenderOptions};
use crate::telemetry::log::LogManager;
use ndarray::{Array2, ArrayView2};
use std::fs;
use std::path::{Path, PathBuf};

/// One decoded capture: owns its header and sample matrix exclusively.
///
/// Construction runs the parse and decode stages in order and short-circuits
/// on the first failure, so a session that exists is always valid. Sessions
/// are independent of one another; the only shared state is the process-wide
/// log sink.
pub struct PolarSession {
    path: PathBuf,
    header: Header,
    matrix: Array2<u16>,
    logger: LogManager,
}

impl PolarSession {
    /// Reads a capture from disk and runs the parse and decode stages.
    pub fn open<P: AsRef<Path>>(path: P) -> PolarResult<Self> {
        let path = path.as_ref();
        let raw = fs::read(path)?;
        let mut session = Self::from_bytes(&raw)?;
        session.path = path.to_path_buf();
        session.logger.record(&format!("processed {}", path.display()));
        Ok(session)
    }

    /// Runs the pipeline over an already-resident capture buffer.
    pub fn from_bytes(raw: &[u8]) -> PolarResult<Self> {
        let (header, image_region) = HeaderParser::new().parse(raw)?;
        let matrix = ImageDecoder::new().decode(&header, image_region)?;
        Ok(Self {
            path: PathBuf::new(),
            header,
            matrix,
            logger: LogManager::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn matrix(&self) -> ArrayView2<'_, u16> {
        self.matrix.view()
    }

    /// Header value lookup, case-insensitive like the instrument tooling.
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.header.get(key)
    }

    pub fn describe(&self, key: &str) -> Option<&str> {
        self.header.describe(key)
    }

    /// Upsamples the matrix in place for smoother display. Degenerate grids
    /// are left untouched; this never invalidates the session.
    pub fn interpolate(&mut self, method: InterpolationMethod) {
        let matrix = std::mem::replace(&mut self.matrix, Array2::zeros((0, 0)));
        self.matrix = Interpolator::new(method).upsample(matrix);
    }

    pub fn render(&self, options: &RenderOptions) -> PolarResult<Raster> {
        PolarRenderer::new().render(self.matrix.view(), &self.header, options)
    }

    /// Renders and writes the raster without embedded metadata.
    pub fn save_to<P: AsRef<Path>>(&self, output: P, options: &RenderOptions) -> PolarResult<()> {
        let raster = self.render(options)?;
        raster.write_png(output)
    }

    /// Renders, embeds the serialized header, and writes the raster.
    pub fn save_with_metadata<P: AsRef<Path>>(
        &self,
        output: P,
        options: &RenderOptions,
    ) -> PolarResult<()> {
        let mut raster = self.render(options)?;
        MetadataCodec::new().embed(&self.header, &mut raster)?;
        raster.write_png(output)
    }
}
