//! Configuration for image resolution.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from vitrine.toml)
//! - User overrides (~/.config/vitrine/vitrine.toml or ./vitrine.toml)
//! - `VITRINE_*` environment variables, nested keys separated by `__`, and
//!   `VITRINE_STORAGE_HOSTS` as a comma-separated list

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use vitrine_cache::FailureCacheConfig;
use vitrine_core::{MediaCategory, ResolvedUrl};
use vitrine_error::{ConfigError, VitrineError, VitrineResult};

/// Default route serving storage objects by key.
pub const DEFAULT_PROXY_PREFIX: &str = "/api/images/s3-proxy";

/// Default directory of category placeholders.
pub const DEFAULT_PLACEHOLDER_DIR: &str = "/images/placeholders";

/// Top-level resolver configuration.
///
/// # Example
///
/// ```toml
/// proxy_prefix = "/api/images/s3-proxy"
/// placeholder_dir = "/images/placeholders"
/// storage_hosts = ["amazonaws.com"]
///
/// [failure_cache]
/// ttl_seconds = 86400
/// capacity = 100
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Route prefix of the storage proxy, without trailing slash
    #[serde(default = "default_proxy_prefix")]
    pub proxy_prefix: String,

    /// Directory holding `{category}.jpg` placeholders, without trailing slash
    #[serde(default = "default_placeholder_dir")]
    pub placeholder_dir: String,

    /// Host fragments marking direct storage-bucket URLs
    #[serde(default = "default_storage_hosts")]
    pub storage_hosts: Vec<String>,

    /// Settings shared by every category's failure cache
    #[serde(default)]
    pub failure_cache: FailureCacheConfig,
}

fn default_proxy_prefix() -> String {
    DEFAULT_PROXY_PREFIX.to_string()
}

fn default_placeholder_dir() -> String {
    DEFAULT_PLACEHOLDER_DIR.to_string()
}

fn default_storage_hosts() -> Vec<String> {
    vec!["amazonaws.com".to_string()]
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            proxy_prefix: default_proxy_prefix(),
            placeholder_dir: default_placeholder_dir(),
            storage_hosts: default_storage_hosts(),
            failure_cache: FailureCacheConfig::default(),
        }
    }
}

impl ResolverConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// [`validate`](Self::validate).
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> VitrineResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                VitrineError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VitrineError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: environment > current dir > home
    /// dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vitrine_resolve::ResolverConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ResolverConfig::load()?;
    /// println!("proxy: {}", config.proxy_prefix);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> VitrineResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../vitrine.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/vitrine/vitrine.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("vitrine").required(false))
            .add_source(
                Environment::with_prefix("VITRINE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("storage_hosts"),
            );

        let config: Self = builder
            .build()
            .map_err(|e| {
                VitrineError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VitrineError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the paths are usable as display sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a prefix is not an absolute path, the failure TTL is
    /// zero, or a storage host marker is blank.
    pub fn validate(&self) -> VitrineResult<()> {
        for (name, value) in [
            ("proxy_prefix", &self.proxy_prefix),
            ("placeholder_dir", &self.placeholder_dir),
        ] {
            if !value.starts_with('/') || value.len() < 2 || value.ends_with('/') {
                return Err(ConfigError::new(format!(
                    "{} must start with '/' and not end with '/', got {:?}",
                    name, value
                ))
                .into());
            }
        }
        if *self.failure_cache.ttl_seconds() == 0 {
            return Err(ConfigError::new("failure_cache.ttl_seconds must be positive").into());
        }
        if self.storage_hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(ConfigError::new("storage_hosts must not contain blank entries").into());
        }
        Ok(())
    }

    /// Placeholder image for a category.
    pub fn placeholder_for(&self, category: MediaCategory) -> ResolvedUrl {
        ResolvedUrl::new(format!("{}/{}.jpg", self.placeholder_dir, category.as_str()))
    }

    /// Whether `url` points into the placeholder directory.
    pub fn is_placeholder(&self, url: &str) -> bool {
        let path = crate::normalize::path_of(url.trim());
        path.len() > self.placeholder_dir.len()
            && path.starts_with(self.placeholder_dir.as_str())
            && path.as_bytes()[self.placeholder_dir.len()] == b'/'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_match_builtin_defaults() {
        let bundled: ResolverConfig = Config::builder()
            .add_source(File::from_str(
                include_str!("../../../vitrine.toml"),
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(bundled, ResolverConfig::default());
    }

    #[test]
    fn placeholder_detection() {
        let config = ResolverConfig::default();
        assert!(config.is_placeholder("/images/placeholders/video.jpg"));
        assert!(config.is_placeholder("https://site.example/images/placeholders/x.jpg"));
        assert!(!config.is_placeholder("/images/placeholders"));
        assert!(!config.is_placeholder("/images/placeholders-old/x.jpg"));
        assert!(!config.is_placeholder("/uploads/news/x.jpg"));
    }

    #[test]
    fn validate_rejects_relative_prefix() {
        let config = ResolverConfig {
            proxy_prefix: "api/proxy".to_string(),
            ..ResolverConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ResolverConfig {
            placeholder_dir: "/images/".to_string(),
            ..ResolverConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
