//! Failure cache configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use vitrine_error::{BuilderError, BuilderErrorKind, VitrineResult};

/// Configuration for a failure cache.
///
/// # Example
///
/// ```
/// use vitrine_cache::{FailureCacheConfig, FailureCacheConfigBuilder};
///
/// let config = FailureCacheConfigBuilder::default()
///     .capacity(20usize)
///     .finish()
///     .unwrap();
/// assert_eq!(*config.capacity(), 20);
/// assert_eq!(*config.ttl_seconds(), 86_400);
///
/// // A zero TTL would forget failures as soon as they are recorded.
/// assert!(FailureCacheConfigBuilder::default().ttl_seconds(0u64).finish().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct FailureCacheConfig {
    /// How long a failure is remembered (seconds)
    #[serde(default = "default_ttl")]
    ttl_seconds: u64,

    /// Maximum number of remembered URLs per category
    #[serde(default = "default_capacity")]
    capacity: usize,

    /// Whether failures are remembered at all
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    24 * 60 * 60
}

fn default_capacity() -> usize {
    100
}

fn default_enabled() -> bool {
    true
}

impl Default for FailureCacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            capacity: default_capacity(),
            enabled: default_enabled(),
        }
    }
}

impl FailureCacheConfig {
    /// TTL in milliseconds, saturating.
    pub fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl_seconds.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

impl FailureCacheConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == Some(0) {
            return Err("ttl_seconds must be positive".to_string());
        }
        Ok(())
    }

    /// Build the configuration, reporting failures as [`BuilderError`].
    pub fn finish(&self) -> VitrineResult<FailureCacheConfig> {
        self.build().map_err(|e| {
            let kind = match e {
                FailureCacheConfigBuilderError::UninitializedField(field) => {
                    BuilderErrorKind::MissingField(field.to_string())
                }
                FailureCacheConfigBuilderError::ValidationError(message) => {
                    BuilderErrorKind::ValidationFailed(message)
                }
            };
            BuilderError::new(kind).into()
        })
    }
}
