//! Run-wide defaults.

/// Meters per foot.
pub const FEET_TO_METERS: f64 = 0.3048;

/// Band width used when no unit definitions are supplied: two 27 ft unit
/// depths plus a 5 ft corridor.
pub const DEFAULT_BAR_WIDTH: f64 = 59.0 * FEET_TO_METERS;

/// Height cap used when neither the levels nor the site constraints give one
/// (200 ft).
pub const DEFAULT_MAX_HEIGHT: f64 = 200.0 * FEET_TO_METERS;

/// Side length of the square footprint given to masses with no geometry.
pub const DEFAULT_PLACEHOLDER_SIZE: f64 = 30.0;

/// Corridor width added between the two unit depths of a derived band (5 ft).
pub const DEFAULT_CORRIDOR_WIDTH: f64 = 5.0 * FEET_TO_METERS;

/// Defaults for a massing run.
#[derive(Debug, Clone, PartialEq)]
pub struct MassingConfig {
    /// Band width for bar-shaped strategies when it cannot be derived from
    /// unit definitions.
    pub band_width: f64,
    /// Height cap for default mass generation.
    pub max_height: f64,
    /// Side length of the placeholder footprint.
    pub placeholder_size: f64,
    /// Corridor width used when deriving a band width from unit depths.
    pub corridor_width: f64,
}

impl Default for MassingConfig {
    fn default() -> Self {
        Self {
            band_width: DEFAULT_BAR_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            placeholder_size: DEFAULT_PLACEHOLDER_SIZE,
            corridor_width: DEFAULT_CORRIDOR_WIDTH,
        }
    }
}

impl MassingConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_band_width(mut self, band_width: f64) -> Self {
        self.band_width = band_width;
        self
    }

    #[must_use]
    pub fn with_max_height(mut self, max_height: f64) -> Self {
        self.max_height = max_height;
        self
    }

    #[must_use]
    pub fn with_placeholder_size(mut self, size: f64) -> Self {
        self.placeholder_size = size;
        self
    }

    #[must_use]
    pub fn with_corridor_width(mut self, width: f64) -> Self {
        self.corridor_width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_metric() {
        let config = MassingConfig::default();
        assert_relative_eq!(config.band_width, 17.9832, epsilon = 1e-9);
        assert_relative_eq!(config.max_height, 60.96, epsilon = 1e-9);
        assert_relative_eq!(config.placeholder_size, 30.0);
    }

    #[test]
    fn builders_override() {
        let config = MassingConfig::new().with_band_width(10.0).with_max_height(20.0);
        assert_relative_eq!(config.band_width, 10.0);
        assert_relative_eq!(config.max_height, 20.0);
    }
}
