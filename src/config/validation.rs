use crate::config::types::{Config, ExtractorConfig, OutputConfig, PlatformBackend, PlatformConfig};
use crate::ConfigError;
use url::Url;

/// Largest accepted worker pool
pub const MAX_WORKERS: usize = 32;

/// Validates the entire configuration
///
/// Called after loading a file and again after command-line overrides are applied.
///
/// # Arguments
///
/// * `config` - The configuration to check
///
/// # Returns
///
/// * `Ok(())` - Every value is in range
/// * `Err(ConfigError::Validation)` - The first offending value, with a description
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_extractor_config(&config.extractor)?;
    validate_platform_config(&config.platform)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(
            "batch-size must be >= 1".to_string(),
        ));
    }

    if config.video_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "video-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_platform_config(config: &PlatformConfig) -> Result<(), ConfigError> {
    if config.socket_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "socket-timeout-secs must be >= 1".to_string(),
        ));
    }

    match config.backend {
        PlatformBackend::YtDlp => {
            if config.ytdlp_path.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "ytdlp-path cannot be empty".to_string(),
                ));
            }
        }
        PlatformBackend::DataApi => {
            let has_key = config
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty());
            if !has_key {
                return Err(ConfigError::Validation(
                    "api-key is required when backend = \"data-api\"".to_string(),
                ));
            }

            let base = Url::parse(&config.api_base_url).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid api-base-url '{}': {}",
                    config.api_base_url, e
                ))
            })?;
            if base.scheme() != "http" && base.scheme() != "https" {
                return Err(ConfigError::Validation(format!(
                    "api-base-url must use http or https, got '{}'",
                    config.api_base_url
                )));
            }
        }
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.link_delimiter.is_empty() {
        return Err(ConfigError::Validation(
            "link-delimiter cannot be empty".to_string(),
        ));
    }

    if config.log_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "log-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_worker_bounds() {
        let mut config = Config::default();
        config.extractor.workers = 0;
        assert!(validate(&config).is_err());

        config.extractor.workers = MAX_WORKERS + 1;
        assert!(validate(&config).is_err());

        config.extractor.workers = MAX_WORKERS;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_batch_size() {
        let mut config = Config::default();
        config.extractor.batch_size = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_data_api_requires_key() {
        let mut config = Config::default();
        config.platform.backend = PlatformBackend::DataApi;
        assert!(validate(&config).is_err());

        config.platform.api_key = Some("   ".to_string());
        assert!(validate(&config).is_err());

        config.platform.api_key = Some("key".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_data_api_base_url() {
        let mut config = Config::default();
        config.platform.backend = PlatformBackend::DataApi;
        config.platform.api_key = Some("key".to_string());

        config.platform.api_base_url = "not a url".to_string();
        assert!(validate(&config).is_err());

        config.platform.api_base_url = "ftp://example.com/v3".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_delimiter() {
        let mut config = Config::default();
        config.output.link_delimiter = String::new();
        assert!(validate(&config).is_err());
    }
}
