use crate::header::Header;
use crate::prelude::{PolarError, PolarResult};
use crate::raster::Raster;
use crate::render::colormap::Colormap;
use crate::telemetry::log::LogManager;
use ndarray::ArrayView2;
use std::f64::consts::PI;

const SPEED_OF_LIGHT: f64 = 3e8;
/// Range resolution, metres per sample, of the standard 40 MHz digitizer.
const STANDARD_METERS_PER_PIXEL: f64 = 3.75;

/// Rendering controls mirroring the instrument display conventions.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Rotate the sweep by the bow-to-radar offset (`BO2RA`) instead of the
    /// fixed quarter-turn used for unoriented display.
    pub orient: bool,
    /// Sweep clockwise instead of counter-clockwise.
    pub toggle_direction: bool,
    pub colormap: Colormap,
    /// Side length of the square output raster, in pixels.
    pub size: u32,
    /// Fill for pixels outside the scan disc.
    pub background: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            orient: true,
            toggle_direction: true,
            colormap: Colormap::default(),
            size: 800,
            background: [0, 0, 0],
        }
    }
}

/// Scan-converts the ray/range matrix into a Cartesian raster.
///
/// Headless replacement for the toolkit polar plot: every output pixel is
/// mapped back to an (angle, radius) pair and sampled from the matrix, so
/// renders are testable pixel for pixel.
pub struct PolarRenderer {
    logger: LogManager,
}

impl PolarRenderer {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }

    /// Number of leading range samples blanked by the sampling delay.
    pub fn pixels_to_omit(header: &Header) -> PolarResult<usize> {
        let sampling_frequency = header.require_f64("SFREQ")?;
        let sampling_delay_range = header.require_f64("SDRNG")?;

        let meters_per_pixel = if sampling_frequency == 40.0 {
            STANDARD_METERS_PER_PIXEL
        } else {
            SPEED_OF_LIGHT / (2.0 * sampling_frequency * 1e6)
        };
        Ok((sampling_delay_range / meters_per_pixel).ceil() as usize * 2)
    }

    pub fn render(
        &self,
        matrix: ArrayView2<'_, u16>,
        header: &Header,
        options: &RenderOptions,
    ) -> PolarResult<Raster> {
        let (rays, samples_per_ray) = matrix.dim();
        if rays < 2 || samples_per_ray == 0 {
            return Err(PolarError::Render(format!(
                "matrix of {} rays x {} samples cannot be scan-converted",
                rays, samples_per_ray
            )));
        }

        let pixels_to_omit = Self::pixels_to_omit(header)?;
        let dabit = header.require_i64("DABIT")?;
        let blank_level: u16 = if dabit == 12 { 4095 } else { 255 };

        // Rays are spaced over [0, 2pi] inclusive of the endpoint, so ray 0
        // and the last ray share the same bearing.
        let angle_step = 2.0 * PI / (rays - 1) as f64;
        let offset = if options.orient {
            let bow_to_radar = header.require_f64("BO2RA")?;
            -(2.0 * bow_to_radar).to_radians()
        } else {
            PI / 2.0
        };
        let direction = if options.toggle_direction { -1.0 } else { 1.0 };

        let total_samples = samples_per_ray + pixels_to_omit;
        let size = options.size.max(2);
        let mut raster = Raster::new(size, size);
        let center = (f64::from(size) - 1.0) / 2.0;
        let screen_radius = center;

        for y in 0..size {
            for x in 0..size {
                let dx = f64::from(x) - center;
                let dy = center - f64::from(y); // screen y grows downward
                let radius = (dx * dx + dy * dy).sqrt();
                if radius > screen_radius {
                    raster.put(x, y, options.background);
                    continue;
                }

                let screen_angle = dy.atan2(dx);
                let theta = (direction * (screen_angle - offset)).rem_euclid(2.0 * PI);
                let ray = ((theta / angle_step).round() as usize).min(rays - 1);

                let range_index = ((radius / screen_radius) * (total_samples - 1) as f64)
                    .round() as usize;
                let sample = if range_index < pixels_to_omit {
                    // Blanked near-range ring rendered at full brightness.
                    blank_level
                } else {
                    matrix[[ray, (range_index - pixels_to_omit).min(samples_per_ray - 1)]]
                };

                raster.put(x, y, options.colormap.shade(sample));
            }
        }

        self.logger.record(&format!(
            "rendered {} rays into {}x{} raster ({} blanked range samples)",
            rays, size, size, pixels_to_omit
        ));
        Ok(raster)
    }
}

impl Default for PolarRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{HeaderEntry, HeaderValue};
    use ndarray::Array2;

    fn render_header(sfreq: i64, sdrng: i64, dabit: i64) -> Header {
        let mut header = Header::new();
        header.insert(
            "SFREQ",
            HeaderEntry::new(HeaderValue::Int(sfreq), "Sampling frequency"),
        );
        header.insert(
            "SDRNG",
            HeaderEntry::new(HeaderValue::Int(sdrng), "Sampling delay range"),
        );
        header.insert(
            "DABIT",
            HeaderEntry::new(HeaderValue::Int(dabit), "Bits per sample"),
        );
        header.insert(
            "BO2RA",
            HeaderEntry::new(HeaderValue::Float(0.0), "Bow to radar offset"),
        );
        header
    }

    #[test]
    fn standard_digitizer_blanking_width() {
        let header = render_header(40, 15, 8);
        assert_eq!(PolarRenderer::pixels_to_omit(&header).unwrap(), 8);
    }

    #[test]
    fn non_standard_frequency_uses_range_resolution() {
        // 20 MHz -> 7.5 m per sample; ceil(30 / 7.5) * 2 = 8.
        let header = render_header(20, 30, 8);
        assert_eq!(PolarRenderer::pixels_to_omit(&header).unwrap(), 8);
    }

    #[test]
    fn missing_sfreq_fails_the_render_call() {
        let mut header = Header::new();
        header.insert(
            "SDRNG",
            HeaderEntry::new(HeaderValue::Int(0), "Sampling delay range"),
        );
        let matrix = Array2::<u16>::zeros((4, 4));
        let result = PolarRenderer::new().render(matrix.view(), &header, &RenderOptions::default());
        assert!(matches!(result, Err(PolarError::MissingField(key)) if key == "SFREQ"));
    }

    #[test]
    fn raster_is_square_and_corners_are_background() {
        let header = render_header(40, 0, 8);
        let matrix = Array2::<u16>::from_elem((8, 4), 100);
        let options = RenderOptions {
            size: 64,
            ..RenderOptions::default()
        };
        let raster = PolarRenderer::new()
            .render(matrix.view(), &header, &options)
            .unwrap();

        assert_eq!((raster.width(), raster.height()), (64, 64));
        assert_eq!(raster.pixel(0, 0), options.background);
        assert_eq!(raster.pixel(63, 63), options.background);
    }

    #[test]
    fn center_pixel_samples_the_innermost_range_bin() {
        let header = render_header(40, 0, 8);
        let mut matrix = Array2::<u16>::zeros((8, 4));
        matrix.column_mut(0).fill(4095);
        let options = RenderOptions {
            size: 65,
            ..RenderOptions::default()
        };
        let raster = PolarRenderer::new()
            .render(matrix.view(), &header, &options)
            .unwrap();

        assert_eq!(raster.pixel(32, 32), options.colormap.shade(4095));
    }

    #[test]
    fn blanked_ring_renders_at_full_brightness() {
        // SDRNG 15 at 40 MHz blanks 8 range samples around the center.
        let header = render_header(40, 15, 8);
        let matrix = Array2::<u16>::zeros((8, 4));
        let options = RenderOptions {
            size: 65,
            ..RenderOptions::default()
        };
        let raster = PolarRenderer::new()
            .render(matrix.view(), &header, &options)
            .unwrap();

        // 255, not 4095: the capture is 8-bit.
        assert_eq!(raster.pixel(32, 32), options.colormap.shade(255));
    }

    #[test]
    fn twelve_bit_captures_blank_at_4095() {
        let header = render_header(40, 15, 12);
        let matrix = Array2::<u16>::zeros((8, 4));
        let options = RenderOptions {
            size: 65,
            ..RenderOptions::default()
        };
        let raster = PolarRenderer::new()
            .render(matrix.view(), &header, &options)
            .unwrap();

        assert_eq!(raster.pixel(32, 32), options.colormap.shade(4095));
    }

    #[test]
    fn orientation_requires_bo2ra() {
        let mut header = Header::new();
        header.insert(
            "SFREQ",
            HeaderEntry::new(HeaderValue::Int(40), "Sampling frequency"),
        );
        header.insert(
            "SDRNG",
            HeaderEntry::new(HeaderValue::Int(0), "Sampling delay range"),
        );
        header.insert(
            "DABIT",
            HeaderEntry::new(HeaderValue::Int(8), "Bits per sample"),
        );
        let matrix = Array2::<u16>::zeros((4, 4));
        let result = PolarRenderer::new().render(matrix.view(), &header, &RenderOptions::default());
        assert!(matches!(result, Err(PolarError::MissingField(key)) if key == "BO2RA"));

        let unoriented = RenderOptions {
            orient: false,
            ..RenderOptions::default()
        };
        assert!(PolarRenderer::new()
            .render(matrix.view(), &header, &unoriented)
            .is_ok());
    }
}
