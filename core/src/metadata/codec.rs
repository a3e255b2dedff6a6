use crate::header::Header;
use crate::prelude::{PolarError, PolarResult};
use crate::raster::Raster;
use crate::telemetry::log::LogManager;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// PNG text-chunk keyword carrying the serialized header.
pub const METADATA_KEYWORD: &str = "json_data";

/// Serializes the capture header into rasters and recovers it from them.
///
/// Extraction is the supported path for loading display-ready output files:
/// the header comes straight from the raster, without re-running the parse
/// and decode stages.
pub struct MetadataCodec {
    logger: LogManager,
}

impl MetadataCodec {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }

    /// Attaches the serialized header to the raster.
    ///
    /// The header is copied into the payload, so the raster outlives the
    /// decode session that produced it.
    pub fn embed(&self, header: &Header, raster: &mut Raster) -> PolarResult<()> {
        let payload = serde_json::to_string_pretty(header)
            .map_err(|err| PolarError::Raster(err.to_string()))?;
        raster.set_metadata(payload);
        Ok(())
    }

    /// Recovers the header embedded in a previously written PNG.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> PolarResult<Header> {
        let file = File::open(path)?;
        let decoder = png::Decoder::new(BufReader::new(file));
        let reader = decoder.read_info()?;
        let info = reader.info();

        let payload = info
            .uncompressed_latin1_text
            .iter()
            .find(|chunk| chunk.keyword == METADATA_KEYWORD)
            .map(|chunk| chunk.text.clone())
            .or_else(|| {
                info.utf8_text
                    .iter()
                    .find(|chunk| chunk.keyword == METADATA_KEYWORD)
                    .and_then(|chunk| chunk.get_text().ok())
            })
            .ok_or(PolarError::MetadataMissing)?;

        let header: Header = serde_json::from_str(&payload)
            .map_err(|err| PolarError::Raster(err.to_string()))?;
        self.logger.record(&format!(
            "recovered {} header entries from raster",
            header.len()
        ));
        Ok(header)
    }
}

impl Default for MetadataCodec {
    fn default() -> Self {
        Self::new()
    }
}
