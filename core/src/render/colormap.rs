/// Normalization ceiling shared by both capture depths.
///
/// 8-bit matrices are shaded on the same scale as 12-bit ones, so renders of
/// mixed-depth captures stay visually comparable. Deliberate instrument
/// convention; do not rescale to the data's native range.
pub const NORMALIZATION_MAX: f64 = 4095.0;

/// Colormap identifiers understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Grey ramp, low samples bright.
    Greys,
    /// Reversed grey ramp, the instrument's customary display palette.
    #[default]
    GreysReversed,
}

impl Colormap {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "greys" => Some(Self::Greys),
            "greys_r" | "greys_reversed" => Some(Self::GreysReversed),
            _ => None,
        }
    }

    /// Maps one sample to RGB under the fixed `[0, 4095]` scale.
    pub fn shade(&self, sample: u16) -> [u8; 3] {
        let normalized = (f64::from(sample) / NORMALIZATION_MAX).clamp(0.0, 1.0);
        let level = match self {
            Self::Greys => 1.0 - normalized,
            Self::GreysReversed => normalized,
        };
        let grey = (level * 255.0).round() as u8;
        [grey, grey, grey]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_endpoints_span_the_grey_ramp() {
        assert_eq!(Colormap::GreysReversed.shade(0), [0, 0, 0]);
        assert_eq!(Colormap::GreysReversed.shade(4095), [255, 255, 255]);
        assert_eq!(Colormap::Greys.shade(0), [255, 255, 255]);
        assert_eq!(Colormap::Greys.shade(4095), [0, 0, 0]);
    }

    #[test]
    fn eight_bit_maximum_stays_dim_under_the_fixed_scale() {
        // 255 of 4095, not 255 of 255.
        let [grey, _, _] = Colormap::GreysReversed.shade(255);
        assert_eq!(grey, 16);
    }

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(Colormap::from_name("Greys_r"), Some(Colormap::GreysReversed));
        assert_eq!(Colormap::from_name("greys"), Some(Colormap::Greys));
        assert_eq!(Colormap::from_name("viridis"), None);
    }
}
