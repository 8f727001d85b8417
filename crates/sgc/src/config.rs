//! Configuration Module - GC Tuning Parameters
//!
//! Manages the configuration parameters for SGC. The defaults reproduce the
//! tuning the interpreter ships with; embedders that host very large or very
//! small programs can override them at context creation.

use crate::object::GC_ALIGNMENT;

/// Initial size of the young semispace in bytes (1 MiB).
pub const GC_INITIAL_SIZE: usize = 1 << 20;

/// Old generation capacity as a multiple of the young capacity.
pub const GC_OLD_TO_YOUNG_RATIO: usize = 2;

/// Factor by which both regions grow when the heap is exhausted.
pub const GC_GROW_RATIO: usize = 2;

/// Number of minor collections an object must survive before it is
/// tenured into the old generation.
pub const GC_THRESHOLD_AGE: u8 = 8;

/// Main configuration for the Silt garbage collector
///
/// # Examples
///
/// ```rust
/// use sgc::GcConfig;
///
/// // Use default configuration
/// let config = GcConfig::default();
/// assert!(config.validate().is_ok());
///
/// // Small heap for tests
/// let config = GcConfig {
///     young_size: 64 * 1024,
///     old_size: 128 * 1024,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GcConfig {
    /// Capacity of the young semispace in bytes
    ///
    /// New objects are bump-allocated here. Both semispaces have this
    /// capacity; only one is live outside of a minor collection.
    ///
    /// Default: 1 MiB
    pub young_size: usize,

    /// Capacity of the old generation in bytes
    ///
    /// Holds tenured objects; compacted in place by major collections.
    ///
    /// Default: 2 x young_size
    pub old_size: usize,

    /// Growth factor applied to both regions when the heap is exhausted
    ///
    /// Default: 2
    pub grow_ratio: usize,

    /// Minor collections an object must survive before tenuring
    ///
    /// Default: 8
    pub tenure_threshold: u8,

    /// Initial capacity of the shadow stack, in root cells
    ///
    /// The shadow stack grows by doubling beyond this.
    ///
    /// Default: 1024
    pub root_capacity: usize,
}

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            young_size: GC_INITIAL_SIZE,
            old_size: GC_INITIAL_SIZE * GC_OLD_TO_YOUNG_RATIO,
            grow_ratio: GC_GROW_RATIO,
            tenure_threshold: GC_THRESHOLD_AGE,
            root_capacity: 1024,
        }
    }
}

impl GcConfig {
    /// Validate configuration
    ///
    /// Checks that all values are in valid ranges. Returns an error
    /// describing the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.young_size < 4096 {
            return Err(ConfigError::InvalidYoungSize(
                "young_size must be at least 4096 bytes".to_string(),
            ));
        }

        if self.young_size % GC_ALIGNMENT != 0 {
            return Err(ConfigError::InvalidYoungSize(format!(
                "young_size must be a multiple of {GC_ALIGNMENT}"
            )));
        }

        if self.old_size < self.young_size {
            return Err(ConfigError::InvalidOldSize(
                "old_size must be at least young_size".to_string(),
            ));
        }

        if self.old_size % GC_ALIGNMENT != 0 {
            return Err(ConfigError::InvalidOldSize(format!(
                "old_size must be a multiple of {GC_ALIGNMENT}"
            )));
        }

        if self.grow_ratio < 2 {
            return Err(ConfigError::InvalidGrowRatio(
                "grow_ratio must be >= 2".to_string(),
            ));
        }

        if self.tenure_threshold == 0 {
            return Err(ConfigError::InvalidTenureThreshold(
                "tenure_threshold must be >= 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Build configuration from environment variables
    ///
    /// Overrides defaults with:
    /// - `SGC_YOUNG_SIZE`
    /// - `SGC_OLD_SIZE`
    /// - `SGC_GROW_RATIO`
    /// - `SGC_TENURE_THRESHOLD`
    ///
    /// Unset or unparsable variables leave the default in place.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SGC_YOUNG_SIZE") {
            if let Ok(size) = val.parse::<usize>() {
                config.young_size = size;
                config.old_size = size * GC_OLD_TO_YOUNG_RATIO;
            }
        }

        if let Ok(val) = std::env::var("SGC_OLD_SIZE") {
            if let Ok(size) = val.parse::<usize>() {
                config.old_size = size;
            }
        }

        if let Ok(val) = std::env::var("SGC_GROW_RATIO") {
            if let Ok(ratio) = val.parse::<usize>() {
                config.grow_ratio = ratio;
            }
        }

        if let Ok(val) = std::env::var("SGC_TENURE_THRESHOLD") {
            if let Ok(age) = val.parse::<u8>() {
                config.tenure_threshold = age;
            }
        }

        config
    }
}

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid young size: {0}")]
    InvalidYoungSize(String),

    #[error("Invalid old size: {0}")]
    InvalidOldSize(String),

    #[error("Invalid grow ratio: {0}")]
    InvalidGrowRatio(String),

    #[error("Invalid tenure threshold: {0}")]
    InvalidTenureThreshold(String),
}
