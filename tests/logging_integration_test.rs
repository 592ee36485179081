//! Integration tests for logging functionality

use tempfile::TempDir;
use wardroom::config::{parse_config, LoggingConfig};
use wardroom::domain::WardroomError;
use wardroom::logging::{init_logging, LOG_FILE_PREFIX};

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_console_only_disables_file_output() {
    let config = LoggingConfig::console_only();
    assert!(!config.local_enabled);
}

#[test]
fn test_rotation_is_validated_on_load() {
    for rotation in ["daily", "hourly"] {
        let contents = format!("[logging]\nlocal_rotation = \"{rotation}\"\n");
        let config = parse_config(&contents).unwrap();
        assert_eq!(config.logging.local_rotation, rotation);
    }
    assert!(parse_config("[logging]\nlocal_rotation = \"size\"\n").is_err());
}

// A process can install only one global subscriber, so every init_logging check lives
// in this one test.
#[test]
fn test_init_logging_with_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "hourly".to_string(),
    };

    let err = init_logging("chatty", &config).unwrap_err();
    assert!(matches!(err, WardroomError::Configuration(_)));

    let guard = init_logging("debug", &config).unwrap();
    assert!(guard.writes_to_file());
    assert!(log_path.exists());

    wardroom::log_api_request!("GET", "/collection/roles", "list_roles");
    let unrouted = WardroomError::UnroutedRequest {
        method: "GET".to_string(),
        path: "/collection/nowhere".to_string(),
    };
    wardroom::log_unrouted_request!(&unrouted);
    drop(guard);

    let written: Vec<_> = std::fs::read_dir(&log_path)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
        .collect();
    assert_eq!(written.len(), 1);

    // A second subscriber cannot be installed
    assert!(init_logging("info", &LoggingConfig::console_only()).is_err());
}
