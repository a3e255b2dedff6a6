use crate::header::Header;
use crate::prelude::{FormatError, PolarError, PolarResult};
use crate::telemetry::log::LogManager;
use ndarray::Array2;

/// Payload values above 12 bits are digitizer noise and must be masked off.
const TWELVE_BIT_MASK: u16 = 0x0FFF;

/// Decodes the post-header byte region into a ray/range sample matrix.
pub struct ImageDecoder {
    logger: LogManager,
}

impl ImageDecoder {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }

    /// Produces a `(rays, samples_per_ray)` matrix from the image region.
    ///
    /// The region starts with a fixed-width ASCII byte count (10 digits for
    /// 12-bit captures, 6 otherwise) followed by the row-major payload.
    pub fn decode(&self, header: &Header, image_region: &[u8]) -> PolarResult<Array2<u16>> {
        let dabit = header.require_i64("DABIT")?;
        let fifo = header.require_i64("FIFO")?;
        if fifo <= 0 {
            return Err(PolarError::MissingField("FIFO".to_string()));
        }
        let samples_per_ray = fifo as usize;

        let size_digits = if dabit == 12 { 10 } else { 6 };
        let (byte_count, payload) = read_size_prefix(image_region, size_digits)?;
        if payload.len() < byte_count {
            return Err(FormatError::TruncatedPayload {
                declared: byte_count,
                actual: payload.len(),
            }
            .into());
        }
        let payload = &payload[..byte_count];

        let matrix = match dabit {
            12 => {
                let rays = exact_ray_count(byte_count, samples_per_ray, 2)?;
                let samples: Vec<u16> = payload
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]) & TWELVE_BIT_MASK)
                    .collect();
                Array2::from_shape_vec((rays, samples_per_ray), samples).map_err(|_| {
                    FormatError::RaggedPayload {
                        count: byte_count,
                        ray_bytes: 2 * samples_per_ray,
                    }
                })?
            }
            8 => {
                let rays = exact_ray_count(byte_count, samples_per_ray, 1)?;
                let samples: Vec<u16> = payload.iter().map(|&byte| u16::from(byte)).collect();
                let mut matrix = Array2::from_shape_vec((rays, samples_per_ray), samples)
                    .map_err(|_| FormatError::RaggedPayload {
                        count: byte_count,
                        ray_bytes: samples_per_ray,
                    })?;
                // The first sample of every 8-bit ray is an instrument
                // artifact byte, not a measurement.
                matrix.column_mut(0).fill(0);
                matrix
            }
            other => return Err(PolarError::UnsupportedFormat(other)),
        };

        self.logger.record(&format!(
            "decoded {} rays of {} samples",
            matrix.nrows(),
            samples_per_ray
        ));
        Ok(matrix)
    }
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn read_size_prefix(image_region: &[u8], size_digits: usize) -> PolarResult<(usize, &[u8])> {
    if image_region.len() < size_digits {
        let prefix: String = image_region.iter().map(|&byte| byte as char).collect();
        return Err(FormatError::BadSizePrefix(prefix).into());
    }
    let prefix: String = image_region[..size_digits]
        .iter()
        .map(|&byte| byte as char)
        .collect();
    let byte_count = prefix
        .trim()
        .parse::<usize>()
        .map_err(|_| FormatError::BadSizePrefix(prefix))?;
    Ok((byte_count, &image_region[size_digits..]))
}

fn exact_ray_count(
    byte_count: usize,
    samples_per_ray: usize,
    element_bytes: usize,
) -> PolarResult<usize> {
    // Saturating multiply keeps a hostile FIFO from overflowing the ray
    // width; a ray wider than the whole declared payload cannot divide it.
    let ray_bytes = samples_per_ray.saturating_mul(element_bytes);
    if (byte_count > 0 && ray_bytes > byte_count) || byte_count % ray_bytes != 0 {
        return Err(FormatError::RaggedPayload {
            count: byte_count,
            ray_bytes,
        }
        .into());
    }
    Ok(byte_count / ray_bytes)
}
