//! Host error types

use std::fmt;
use std::io;

use stride_core::config::ConfigError;
use stride_core::motion::MotionError;

/// Configuration loading errors
#[derive(Debug)]
pub enum LoadError {
    /// Reading the file failed
    Io(io::Error),
    /// TOML parsing failed
    Toml(toml::de::Error),
    /// Postcard decoding or encoding failed
    Binary(postcard::Error),
    /// Parsed configuration failed validation
    Invalid(ConfigError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read configuration: {}", e),
            LoadError::Toml(e) => write!(f, "invalid TOML configuration: {}", e),
            LoadError::Binary(e) => write!(f, "invalid binary configuration: {}", e),
            LoadError::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Toml(e) => Some(e),
            LoadError::Binary(_) | LoadError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<toml::de::Error> for LoadError {
    fn from(e: toml::de::Error) -> Self {
        LoadError::Toml(e)
    }
}

impl From<postcard::Error> for LoadError {
    fn from(e: postcard::Error) -> Self {
        LoadError::Binary(e)
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Session errors
#[derive(Debug)]
pub enum SimError {
    /// Configuration could not be loaded
    Load(LoadError),
    /// Configuration failed validation
    Config(ConfigError),
    /// A motion request was rejected or ran out of ticks
    Motion(MotionError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Load(e) => write!(f, "{}", e),
            SimError::Config(e) => write!(f, "{}", e),
            SimError::Motion(e) => write!(f, "motion rejected: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Load(e) => Some(e),
            SimError::Config(_) | SimError::Motion(_) => None,
        }
    }
}

impl From<LoadError> for SimError {
    fn from(e: LoadError) -> Self {
        SimError::Load(e)
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

impl From<MotionError> for SimError {
    fn from(e: MotionError) -> Self {
        SimError::Motion(e)
    }
}
