//! Configuration persistence
//!
//! Tries TOML first, then the binary postcard format. Without a path the
//! embedded default is used.

use std::fs;
use std::path::Path;
use std::str;

use tracing::{debug, info, warn};

use stride_core::config::MotionConfig;
use stride_core::traits::JointKind;

use crate::error::LoadError;

/// Embedded default configuration, validated by the build script
pub const DEFAULT_CONFIG: &str = include_str!("../../motion.toml");

/// Load the embedded default configuration
pub fn default_config() -> Result<MotionConfig, LoadError> {
    from_toml_str(DEFAULT_CONFIG)
}

/// Parse and validate a TOML configuration
pub fn from_toml_str(text: &str) -> Result<MotionConfig, LoadError> {
    let config: MotionConfig = toml::from_str(text)?;
    config.validate()?;
    log_config_summary(&config);
    Ok(config)
}

/// Decode and validate a postcard configuration
pub fn from_binary(bytes: &[u8]) -> Result<MotionConfig, LoadError> {
    let config: MotionConfig = postcard::from_bytes(bytes)?;
    config.validate()?;
    log_config_summary(&config);
    Ok(config)
}

/// Encode a configuration as postcard
pub fn to_binary(config: &MotionConfig) -> Result<Vec<u8>, LoadError> {
    Ok(postcard::to_allocvec(config)?)
}

/// Load configuration from raw bytes in either format
///
/// UTF-8 input is parsed as TOML first. If that fails, the bytes are tried
/// as postcard; when both fail the TOML error is reported for text input.
pub fn load_bytes(bytes: &[u8]) -> Result<MotionConfig, LoadError> {
    let toml_error = match str::from_utf8(bytes) {
        Ok(text) => match from_toml_str(text) {
            Ok(config) => {
                info!("loaded TOML configuration");
                return Ok(config);
            }
            Err(e) => {
                debug!("TOML load failed ({}), trying binary format", e);
                Some(e)
            }
        },
        Err(_) => None,
    };

    match from_binary(bytes) {
        Ok(config) => {
            info!("loaded binary configuration");
            Ok(config)
        }
        Err(e) => {
            warn!("failed to load configuration: {}", e);
            Err(toml_error.unwrap_or(e))
        }
    }
}

/// Load configuration from a file, or the embedded default
pub fn load(path: Option<&Path>) -> Result<MotionConfig, LoadError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            let bytes = fs::read(path)?;
            load_bytes(&bytes)
        }
        None => {
            debug!("no configuration file given, using embedded default");
            default_config()
        }
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &MotionConfig) {
    debug!(
        "  tick {} s, budget {} ticks, mode {:?}",
        config.tick_duration, config.max_ticks, config.tick_mode
    );
    debug!(
        "  agent: {} kg, walk {} m/s, turn {} deg/s",
        config.agent.mass, config.agent.move_speed, config.agent.turn_speed
    );
    for kind in JointKind::ALL {
        let joint = config.joints.get(kind);
        debug!("  {} joint: {}..{} at {}", kind.label(), joint.min, joint.max, joint.speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::config::ConfigError;
    use stride_core::motion::MotionError;
    use stride_core::scheduler::TickMode;

    #[test]
    fn test_embedded_default_matches_builtin() {
        let config = default_config().unwrap();
        assert_eq!(config, MotionConfig::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = from_toml_str(
            r#"
            tick_mode = "batch"

            [agent]
            move_speed = 2.0

            [joints.rotate]
            speed = 30.0
            min = -45.0
            max = 45.0
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_mode, TickMode::Batch);
        assert_eq!(config.agent.move_speed, 2.0);
        assert_eq!(config.agent.mass, 1.0);
        assert_eq!(config.joints.rotate.speed, 30.0);
        assert_eq!(config.joints.rotate.cache_size, 10);
        assert_eq!(config.joints.lift, MotionConfig::default().joints.lift);
    }

    #[test]
    fn test_partial_joint_section_keeps_axis_defaults() {
        let config = from_toml_str("[joints.rotate]\nspeed = 30.0\n").unwrap();
        let rotate = config.joints.rotate;
        let defaults = MotionConfig::default().joints.rotate;

        assert_eq!(rotate.speed, 30.0);
        assert_eq!(rotate.min, -90.0);
        assert_eq!(rotate.max, 90.0);
        assert_eq!(rotate.tolerance, defaults.tolerance);
        assert_eq!(rotate.max_velocity, 120.0);
        assert_eq!(config.joints.extend, MotionConfig::default().joints.extend);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = from_toml_str("[agent]\nmass = -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Invalid(ConfigError::Motion(MotionError::InvalidMass))
        ));
    }

    #[test]
    fn test_binary_fallback() {
        let mut config = MotionConfig::default();
        config.max_ticks = 1234;
        config.tick_mode = TickMode::Batch;

        let bytes = to_binary(&config).unwrap();
        assert_eq!(load_bytes(&bytes).unwrap(), config);
    }

    #[test]
    fn test_text_errors_report_toml() {
        let err = load_bytes(b"tick_duration = \"fast\"").unwrap_err();
        assert!(matches!(err, LoadError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load(Some(Path::new("/nonexistent/motion.toml"))).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
