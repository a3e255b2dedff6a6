use thiserror::Error;

/// Structural violations in the capture byte stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("no EOH marker in capture")]
    MissingEohMarker,
    #[error("image size prefix is not numeric: {0:?}")]
    BadSizePrefix(String),
    #[error("size prefix declares {declared} payload bytes but only {actual} are present")]
    TruncatedPayload { declared: usize, actual: usize },
    #[error("{count} payload bytes do not divide into rays of {ray_bytes} bytes")]
    RaggedPayload { count: usize, ray_bytes: usize },
}

/// Common error type for the decode/render pipeline.
#[derive(Debug, Error)]
pub enum PolarError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("unsupported DABIT value {0}")]
    UnsupportedFormat(i64),
    #[error("header field {0} is missing or non-numeric")]
    MissingField(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("raster codec failure: {0}")]
    Raster(String),
    #[error("render failure: {0}")]
    Render(String),
    #[error("raster carries no embedded metadata payload")]
    MetadataMissing,
}

pub type PolarResult<T> = Result<T, PolarError>;

impl From<png::EncodingError> for PolarError {
    fn from(err: png::EncodingError) -> Self {
        match err {
            png::EncodingError::IoError(io) => PolarError::Io(io),
            other => PolarError::Raster(other.to_string()),
        }
    }
}

impl From<png::DecodingError> for PolarError {
    fn from(err: png::DecodingError) -> Self {
        match err {
            png::DecodingError::IoError(io) => PolarError::Io(io),
            other => PolarError::Raster(other.to_string()),
        }
    }
}
