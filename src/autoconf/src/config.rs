//! Configuration knobs for the autoconfiguration pipeline

use crate::error::{AutoconfError, Result};
use crate::scope::ResolutionMode;

/// Default mount point of the export endpoint
pub const DEFAULT_EXPORT_PATH: &str = "/mac/configuration/export";

/// Default scope protecting the export endpoint
pub const DEFAULT_EXPORT_PATH_ACCESS_SCOPE: &str = "configuration:export";

/// Recognized configuration options
#[derive(Debug, Clone)]
pub struct AutoconfOptions {
    /// Where the export endpoint is mounted
    pub export_path: String,

    /// Whether the export endpoint itself requires a scope
    pub protect_export_path: bool,

    /// Scope name required on the export endpoint when protected
    pub export_path_access_scope: String,

    /// How scopes are resolved across providers
    pub resolution_mode: ResolutionMode,
}

impl Default for AutoconfOptions {
    fn default() -> Self {
        Self {
            export_path: DEFAULT_EXPORT_PATH.to_string(),
            protect_export_path: true,
            export_path_access_scope: DEFAULT_EXPORT_PATH_ACCESS_SCOPE.to_string(),
            resolution_mode: ResolutionMode::default(),
        }
    }
}

impl AutoconfOptions {
    /// Read options from the environment, falling back to defaults
    ///
    /// Recognized variables: `EXPORT_PATH`, `PROTECT_EXPORT_PATH`,
    /// `EXPORT_PATH_ACCESS_SCOPE`, `RESOLUTION_MODE`.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(path) = std::env::var("EXPORT_PATH") {
            options.export_path = path;
        }
        if let Ok(protect) = std::env::var("PROTECT_EXPORT_PATH") {
            options.protect_export_path = parse_bool("PROTECT_EXPORT_PATH", &protect)?;
        }
        if let Ok(scope) = std::env::var("EXPORT_PATH_ACCESS_SCOPE") {
            options.export_path_access_scope = scope;
        }
        if let Ok(mode) = std::env::var("RESOLUTION_MODE") {
            options.resolution_mode =
                mode.parse()
                    .map_err(|reason: String| AutoconfError::InvalidOption {
                        option: "RESOLUTION_MODE".to_string(),
                        reason,
                    })?;
        }

        Ok(options)
    }

    /// Set the export endpoint mount point
    pub fn with_export_path(mut self, path: impl Into<String>) -> Self {
        self.export_path = path.into();
        self
    }

    /// Set whether the export endpoint requires a scope
    pub fn with_protect_export_path(mut self, protect: bool) -> Self {
        self.protect_export_path = protect;
        self
    }

    /// Set the scope protecting the export endpoint
    pub fn with_export_path_access_scope(mut self, scope: impl Into<String>) -> Self {
        self.export_path_access_scope = scope.into();
        self
    }

    /// Set the scope resolution mode
    pub fn with_resolution_mode(mut self, mode: ResolutionMode) -> Self {
        self.resolution_mode = mode;
        self
    }
}

fn parse_bool(option: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(AutoconfError::InvalidOption {
            option: option.to_string(),
            reason: format!("expected 'true' or 'false', got '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AutoconfOptions::default();
        assert_eq!(options.export_path, "/mac/configuration/export");
        assert!(options.protect_export_path);
        assert_eq!(options.export_path_access_scope, "configuration:export");
        assert_eq!(options.resolution_mode, ResolutionMode::Aggregate);
    }

    #[test]
    fn test_builder_overrides() {
        let options = AutoconfOptions::default()
            .with_export_path("/admin/export")
            .with_protect_export_path(false)
            .with_export_path_access_scope("admin:export")
            .with_resolution_mode(ResolutionMode::FirstMatch);

        assert_eq!(options.export_path, "/admin/export");
        assert!(!options.protect_export_path);
        assert_eq!(options.export_path_access_scope, "admin:export");
        assert_eq!(options.resolution_mode, ResolutionMode::FirstMatch);
    }

    #[test]
    fn test_bool_parsing() {
        assert!(parse_bool("PROTECT_EXPORT_PATH", "TRUE").unwrap());
        assert!(!parse_bool("PROTECT_EXPORT_PATH", "false").unwrap());
        assert!(parse_bool("PROTECT_EXPORT_PATH", "yes").is_err());
    }
}
