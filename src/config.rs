//! Refresh policy configuration and builder

pub use crate::error::BuilderError;

/// Default share of each panel dimension a change must exceed to trigger a full refresh
pub const DEFAULT_REFRESH_RATIO: f32 = 0.7;

/// Default number of consecutive partial refreshes before a full one is forced
pub const DEFAULT_FULL_REFRESH_INTERVAL: u8 = 10;

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl Rotation {
    /// Whether logical width and height are swapped relative to the panel
    pub fn is_transposed(self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }
}

/// Refresh policy configuration
///
/// Fixed for the lifetime of an [`AdaptiveDisplay`](crate::AdaptiveDisplay).
/// Use [`Builder`] to create a Config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Share of each panel dimension (0, 1] the dirty box must exceed for a full refresh
    pub refresh_ratio: f32,
    /// Partial refreshes allowed before a full refresh is forced
    pub full_refresh_interval: u8,
    /// Drawing rotation
    pub rotation: Rotation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_ratio: DEFAULT_REFRESH_RATIO,
            full_refresh_interval: DEFAULT_FULL_REFRESH_INTERVAL,
            rotation: Rotation::Rotate0,
        }
    }
}

impl Config {
    /// Threshold for one panel dimension
    ///
    /// `dimension * refresh_ratio`, truncated to whole pixels.
    pub fn threshold(&self, dimension: u16) -> u16 {
        (f32::from(dimension) * self.refresh_ratio) as u16
    }
}

/// Builder for constructing refresh policy configuration
///
/// # Example
///
/// ```rust
/// use epd1in54::{Builder, Rotation};
///
/// let config = match Builder::new()
///     .refresh_ratio(0.7)
///     .full_refresh_interval(5)
///     .rotation(Rotation::Rotate90)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.threshold(200), 140);
/// ```
#[must_use]
pub struct Builder {
    /// Refresh area ratio
    refresh_ratio: f32,
    /// Forced full refresh interval
    full_refresh_interval: u8,
    /// Drawing rotation
    rotation: Rotation,
}

impl Default for Builder {
    fn default() -> Self {
        let defaults = Config::default();
        Self {
            refresh_ratio: defaults.refresh_ratio,
            full_refresh_interval: defaults.full_refresh_interval,
            rotation: defaults.rotation,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the refresh area ratio (0, 1]
    pub fn refresh_ratio(mut self, ratio: f32) -> Self {
        self.refresh_ratio = ratio;
        self
    }

    /// Set how many partial refreshes may run before a full one is forced
    pub fn full_refresh_interval(mut self, interval: u8) -> Self {
        self.full_refresh_interval = interval;
        self
    }

    /// Set drawing rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidRefreshRatio` if the ratio is not in (0, 1]
    /// (NaN included), and `BuilderError::InvalidRefreshInterval` if the interval is 0.
    pub fn build(self) -> Result<Config, BuilderError> {
        if !(self.refresh_ratio > 0.0 && self.refresh_ratio <= 1.0) {
            return Err(BuilderError::InvalidRefreshRatio);
        }
        if self.full_refresh_interval == 0 {
            return Err(BuilderError::InvalidRefreshInterval);
        }
        Ok(Config {
            refresh_ratio: self.refresh_ratio,
            full_refresh_interval: self.full_refresh_interval,
            rotation: self.rotation,
        })
    }
}
