use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Upload cap is not 0
/// - Workspace prefix is a single non-empty path component
/// - Converter timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.server.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "server.max_upload_bytes cannot be 0".to_string(),
        ));
    }

    let prefix = &config.workspace.prefix;
    if prefix.is_empty() {
        return Err(ConfigError::ValidationError(
            "workspace.prefix cannot be empty".to_string(),
        ));
    }
    if prefix.contains(['/', '\\']) || prefix == "." || prefix == ".." {
        return Err(ConfigError::ValidationError(format!(
            "workspace.prefix must not contain path separators: {:?}",
            prefix
        )));
    }

    if config.converter.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
