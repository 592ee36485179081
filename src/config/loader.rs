//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{StorageBackend, WardroomConfig};
use crate::domain::errors::WardroomError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into WardroomConfig
/// 4. Applies environment variable overrides (WARDROOM_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns `WardroomError::Configuration` if the file is missing or unreadable, a
/// referenced environment variable is unset, the TOML is malformed, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use wardroom::config::loader::load_config;
///
/// let config = load_config("wardroom.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<WardroomConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(WardroomError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        WardroomError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text, with substitution, overrides and validation
///
/// # Errors
///
/// Same as [`load_config`], minus the file access errors.
pub fn parse_config(contents: &str) -> Result<WardroomConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: WardroomConfig = toml::from_str(&contents)
        .map_err(|e| WardroomError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        WardroomError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied verbatim.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| WardroomError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(WardroomError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the WARDROOM_* prefix
///
/// Environment variables follow the pattern: WARDROOM_<SECTION>_<KEY>
/// For example: WARDROOM_API_LATENCY_MAX_MS, WARDROOM_STORAGE_BACKEND
fn apply_env_overrides(config: &mut WardroomConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("WARDROOM_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // API overrides
    if let Ok(val) = std::env::var("WARDROOM_API_BASE_PATH") {
        config.api.base_path = val;
    }
    if let Ok(val) = std::env::var("WARDROOM_API_LATENCY_MIN_MS") {
        config.api.latency_min_ms = parse_override("WARDROOM_API_LATENCY_MIN_MS", &val)?;
    }
    if let Ok(val) = std::env::var("WARDROOM_API_LATENCY_MAX_MS") {
        config.api.latency_max_ms = parse_override("WARDROOM_API_LATENCY_MAX_MS", &val)?;
    }
    if let Ok(val) = std::env::var("WARDROOM_API_SEED_DEMO_DATA") {
        config.api.seed_demo_data = val.parse().unwrap_or(true);
    }

    // Storage overrides
    if let Ok(val) = std::env::var("WARDROOM_STORAGE_BACKEND") {
        config.storage.backend = match val.to_lowercase().as_str() {
            "file" => StorageBackend::File,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(WardroomError::Configuration(format!(
                    "Invalid WARDROOM_STORAGE_BACKEND '{other}'. Must be one of: file, memory"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("WARDROOM_STORAGE_PATH") {
        config.storage.path = val;
    }
    if let Ok(val) = std::env::var("WARDROOM_STORAGE_NAMESPACE") {
        config.storage.namespace = val;
    }

    // Notification overrides
    if let Ok(val) = std::env::var("WARDROOM_NOTIFICATIONS_MAX_ENTRIES") {
        config.notifications.max_entries =
            parse_override("WARDROOM_NOTIFICATIONS_MAX_ENTRIES", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("WARDROOM_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("WARDROOM_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        WardroomError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("WARDROOM_TEST_STATE_DIR", "/tmp/wardroom");
        let input = "path = \"${WARDROOM_TEST_STATE_DIR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "path = \"/tmp/wardroom\"\n");
        std::env::remove_var("WARDROOM_TEST_STATE_DIR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("WARDROOM_TEST_MISSING_VAR");
        let input = "path = \"${WARDROOM_TEST_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("WARDROOM_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# path = \"${WARDROOM_TEST_COMMENTED_OUT}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-wardroom.toml");
        assert!(matches!(result, Err(WardroomError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[api]
latency_min_ms = 0
latency_max_ms = 0
seed_demo_data = false

[storage]
backend = "memory"
namespace = "test"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(!config.api.seed_demo_data);
    }

    #[test]
    fn test_parse_config_rejects_invalid_latency() {
        let result = parse_config(
            r#"
[api]
latency_min_ms = 500
latency_max_ms = 100
"#,
        );
        assert!(result.is_err());
    }
}
