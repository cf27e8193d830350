use crate::error::GenevoError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), GenevoError>;
}

/// Build a configuration error tagged with the offending section.
pub fn section_error<S: ConfigSection>(message: impl AsRef<str>) -> GenevoError {
    GenevoError::Configuration(format!("[{}] {}", S::section_name(), message.as_ref()))
}
