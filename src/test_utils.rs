//! Test utilities for Corechat
//!
//! This module provides common test utilities including temporary directory
//! management, test file creation, and assertion helpers.

use crate::config::Config;
use crate::error::CorechatError;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Arguments
///
/// * `dir` - Directory to create the file in
/// * `name` - Name of the file
/// * `content` - Content to write to the file
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected
/// message
pub fn assert_error_contains<T>(result: Result<T, CorechatError>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration with default values
pub fn test_config() -> Config {
    Config::default()
}

/// Create a test configuration YAML string
pub fn test_config_yaml() -> String {
    r#"
provider:
  type: local
  local:
    host: http://localhost:9000
    timeout_seconds: 30

chat:
  default_mode: pro
  default_depth: deep
  share_base_url: http://localhost:5173/

telemetry:
  poll_interval_ms: 500
  seed: 42
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "content");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<(), CorechatError> =
            Err(CorechatError::Config("test error message".to_string()));
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        let result: Result<(), CorechatError> = Ok(());
        assert_error_contains(result, "error");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let result: Result<(), CorechatError> =
            Err(CorechatError::Config("different error".to_string()));
        assert_error_contains(result, "not present");
    }

    #[test]
    fn test_test_config() {
        let config = test_config();
        assert_eq!(config.provider.provider_type, "local");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_test_config_yaml() {
        let yaml = test_config_yaml();
        assert!(yaml.contains("provider:"));
        assert!(yaml.contains("telemetry:"));
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert!(config.validate().is_ok());
    }
}
