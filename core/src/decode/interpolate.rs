use crate::telemetry::log::LogManager;
use ndarray::Array2;

/// Resampling kernel used when upsampling the matrix for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMethod {
    #[default]
    Cubic,
    Linear,
    Nearest,
}

/// Doubles matrix resolution along both axes for smoother rendering.
///
/// Both grids are treated as samplings of the normalized `[0,1] x [0,1]`
/// square, so the fine grid resamples the coarse one rather than merely
/// repeating rows.
pub struct Interpolator {
    method: InterpolationMethod,
    logger: LogManager,
}

impl Interpolator {
    pub fn new(method: InterpolationMethod) -> Self {
        Self {
            method,
            logger: LogManager::new(),
        }
    }

    /// Returns the upsampled matrix, or the original when the grid is
    /// degenerate. This step never fails the pipeline.
    pub fn upsample(&self, matrix: Array2<u16>) -> Array2<u16> {
        let (rows, cols) = matrix.dim();
        if rows < 2 || cols < 2 {
            self.logger
                .warn("interpolation skipped: grid has a degenerate axis");
            return matrix;
        }

        let out_rows = rows * 2;
        let out_cols = cols * 2;
        let mut out = Array2::<u16>::zeros((out_rows, out_cols));

        for oy in 0..out_rows {
            let sy = oy as f64 / (out_rows - 1) as f64 * (rows - 1) as f64;
            for ox in 0..out_cols {
                let sx = ox as f64 / (out_cols - 1) as f64 * (cols - 1) as f64;
                let value = match self.method {
                    InterpolationMethod::Nearest => {
                        f64::from(matrix[[sy.round() as usize, sx.round() as usize]])
                    }
                    InterpolationMethod::Linear => bilinear(&matrix, sy, sx),
                    InterpolationMethod::Cubic => bicubic(&matrix, sy, sx),
                };
                out[[oy, ox]] = value.round().clamp(0.0, f64::from(u16::MAX)) as u16;
            }
        }
        out
    }
}

fn bilinear(matrix: &Array2<u16>, y: f64, x: f64) -> f64 {
    let (rows, cols) = matrix.dim();
    let y0 = y.floor() as usize;
    let x0 = x.floor() as usize;
    let y1 = (y0 + 1).min(rows - 1);
    let x1 = (x0 + 1).min(cols - 1);
    let dy = y - y0 as f64;
    let dx = x - x0 as f64;

    let v00 = f64::from(matrix[[y0, x0]]);
    let v01 = f64::from(matrix[[y0, x1]]);
    let v10 = f64::from(matrix[[y1, x0]]);
    let v11 = f64::from(matrix[[y1, x1]]);

    let top = v00 * (1.0 - dx) + v01 * dx;
    let bottom = v10 * (1.0 - dx) + v11 * dx;
    top * (1.0 - dy) + bottom * dy
}

/// Catmull-Rom spline through four collinear samples.
fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t * t
        + (3.0 * (p1 - p2) + p3 - p0) * t * t * t)
}

fn bicubic(matrix: &Array2<u16>, y: f64, x: f64) -> f64 {
    let (rows, cols) = matrix.dim();
    let base_y = y.floor() as isize;
    let base_x = x.floor() as isize;
    let ty = y - base_y as f64;
    let tx = x - base_x as f64;

    let sample = |row: isize, col: isize| -> f64 {
        let row = row.clamp(0, rows as isize - 1) as usize;
        let col = col.clamp(0, cols as isize - 1) as usize;
        f64::from(matrix[[row, col]])
    };

    let mut row_values = [0.0; 4];
    for (slot, offset) in (-1isize..=2).enumerate() {
        let row = base_y + offset;
        row_values[slot] = catmull_rom(
            sample(row, base_x - 1),
            sample(row, base_x),
            sample(row, base_x + 1),
            sample(row, base_x + 2),
            tx,
        );
    }
    catmull_rom(row_values[0], row_values[1], row_values[2], row_values[3], ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn upsample_doubles_both_axes() {
        let matrix = array![[0u16, 10], [20, 30]];
        for method in [
            InterpolationMethod::Cubic,
            InterpolationMethod::Linear,
            InterpolationMethod::Nearest,
        ] {
            let fine = Interpolator::new(method).upsample(matrix.clone());
            assert_eq!(fine.dim(), (4, 4));
        }
    }

    #[test]
    fn corners_survive_every_method() {
        let matrix = array![[0u16, 100], [200, 300]];
        for method in [
            InterpolationMethod::Cubic,
            InterpolationMethod::Linear,
            InterpolationMethod::Nearest,
        ] {
            let fine = Interpolator::new(method).upsample(matrix.clone());
            assert_eq!(fine[[0, 0]], 0);
            assert_eq!(fine[[0, 3]], 100);
            assert_eq!(fine[[3, 0]], 200);
            assert_eq!(fine[[3, 3]], 300);
        }
    }

    #[test]
    fn linear_midpoint_is_the_average() {
        let matrix = array![[0u16, 90], [0, 90]];
        let fine = Interpolator::new(InterpolationMethod::Linear).upsample(matrix);
        // Fine column 1 sits a third of the way across the unit square.
        assert_eq!(fine[[0, 1]], 30);
    }

    #[test]
    fn degenerate_grid_is_returned_untouched() {
        let matrix = Array2::<u16>::from_shape_vec((1, 3), vec![1, 2, 3]).unwrap();
        let same = Interpolator::new(InterpolationMethod::Cubic).upsample(matrix.clone());
        assert_eq!(same, matrix);
    }
}
