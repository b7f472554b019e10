//! Configuration for `Mapper` instances.

use crate::error::{MapperError, Result};
use crate::mapping::format::is_valid_strftime;

/// Settings used by the format registry when rendering values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Format used by `localize` for dates
    pub date_format: String,
    /// Format used by `localize` for date-times
    pub datetime_format: String,
    /// Record field used by `enum` when no argument names one
    pub enum_label: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            enum_label: "name".to_string(),
        }
    }
}

impl FormatConfig {
    /// Check that chrono understands both display formats
    pub fn validate(&self) -> Result<()> {
        for format in [&self.date_format, &self.datetime_format] {
            if !is_valid_strftime(format) {
                return Err(MapperError::InvalidFormat(format.clone()));
            }
        }
        Ok(())
    }
}

/// Configuration for a `Mapper`
///
/// Passed in when the mapper is constructed and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapperConfig {
    /// Suffix appended to every external field name (`name` becomes `name_suffix`)
    pub suffix: Option<String>,
    /// Format registry settings
    pub formats: FormatConfig,
}

impl MapperConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the suffix for external field names
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Replace the format registry settings
    #[must_use]
    pub fn with_formats(mut self, formats: FormatConfig) -> Self {
        self.formats = formats;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.formats.validate()
    }

    /// The external field name for a mapping called `name`
    #[must_use]
    pub fn full_name(&self, name: &str) -> String {
        match &self.suffix {
            Some(suffix) => format!("{name}_{suffix}"),
            None => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_with_suffix() {
        let config = MapperConfig::default();
        assert_eq!(config.full_name("email"), "email");

        let config = MapperConfig::new().with_suffix("billing");
        assert_eq!(config.full_name("email"), "email_billing");
    }

    #[test]
    fn test_validate_formats() {
        assert!(MapperConfig::default().validate().is_ok());

        let config = MapperConfig::new().with_formats(FormatConfig {
            datetime_format: "%Y-%m-%d %Q".to_string(),
            ..FormatConfig::default()
        });
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MapperError::InvalidFormat(ref format) if format == "%Y-%m-%d %Q"));
    }
}
