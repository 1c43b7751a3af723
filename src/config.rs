use thiserror::Error;

use crate::images::PrimaryPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub images: ImageConfig,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the listing REST API (e.g. `https://api.example.com/v1`)
    pub base_url: String,
    /// Bearer token sent with submissions
    pub token: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Maximum size of a single image in bytes
    pub max_upload_size: u64,
    pub max_images_per_draft: usize,
    pub primary_on_remove: PrimaryPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            data_dir: "./data".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            token: None,
            timeout_seconds: 30,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_upload_size: 10 * 1024 * 1024, // 10MB
            max_images_per_draft: 30,
            primary_on_remove: PrimaryPolicy::Leave,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let server_defaults = ServerConfig::default();
        let backend_defaults = BackendConfig::default();
        let image_defaults = ImageConfig::default();

        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or(server_defaults.bind_address);
        let data_dir = std::env::var("DATA_DIR").unwrap_or(server_defaults.data_dir);

        let base_url = std::env::var("BACKEND_URL").unwrap_or(backend_defaults.base_url);
        let token = std::env::var("BACKEND_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let timeout_seconds = std::env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(backend_defaults.timeout_seconds);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(image_defaults.max_upload_size);

        let max_images_per_draft = std::env::var("MAX_IMAGES_PER_DRAFT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(image_defaults.max_images_per_draft);

        let primary_on_remove = match std::env::var("PRIMARY_ON_REMOVE") {
            Ok(value) => PrimaryPolicy::parse(&value).ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "PRIMARY_ON_REMOVE must be 'leave' or 'promote_first', got '{value}'"
                ))
            })?,
            Err(_) => image_defaults.primary_on_remove,
        };

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let config = Config {
            server: ServerConfig {
                bind_address,
                data_dir,
            },
            backend: BackendConfig {
                base_url,
                token,
                timeout_seconds,
            },
            images: ImageConfig {
                max_upload_size,
                max_images_per_draft,
                primary_on_remove,
            },
            test_mode,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.backend.base_url.starts_with("http://")
            || self.backend.base_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(
                "BACKEND_URL must start with http:// or https://".to_string(),
            ));
        }

        if self.images.max_images_per_draft == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_IMAGES_PER_DRAFT must be greater than 0".to_string(),
            ));
        }

        if self.images.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.backend.token.is_none() && self.backend.base_url.starts_with("https://") {
            tracing::warn!("BACKEND_TOKEN is not set; submissions will be unauthenticated");
        }

        Ok(())
    }
}
