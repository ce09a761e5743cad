//! The single-pass startup transform: expand, merge, register, freeze

use tracing::{debug, info};

use crate::config::AutoconfOptions;
use crate::error::Result;
use crate::expand::EndpointExpander;
use crate::path::build_path;
use crate::scope::ScopeResolver;
use crate::store::{PathConfigStore, PolicyConfiguration};
use crate::types::{EndpointDescriptor, EnforcementMode, HttpVerb, MethodConfig, PathConfig};

/// Display name given to the export endpoint's own path config
const EXPORT_PATH_NAME: &str = "configurationExport";

/// Runs the autoconfiguration pass over discovered endpoint descriptors
///
/// The pass executes once during startup: seed the base configuration,
/// expand and merge every descriptor, register the export path, freeze.
/// The frozen result is immutable; exports read it concurrently without
/// synchronization.
pub struct AutoconfEngine {
    options: AutoconfOptions,
    expander: EndpointExpander,
    base: Vec<PathConfig>,
}

impl AutoconfEngine {
    /// Create an engine with default options and the standard providers
    pub fn new() -> Self {
        Self::with_options(AutoconfOptions::default())
    }

    /// Create an engine from options, using the standard providers
    pub fn with_options(options: AutoconfOptions) -> Self {
        let resolver = ScopeResolver::standard(options.resolution_mode);
        Self::with_resolver(options, resolver)
    }

    /// Create an engine with an explicitly registered resolver
    pub fn with_resolver(options: AutoconfOptions, resolver: ScopeResolver) -> Self {
        Self {
            options,
            expander: EndpointExpander::new(resolver),
            base: Vec::new(),
        }
    }

    /// Seed an externally supplied base configuration
    ///
    /// Merging is additive: base entries keep their `id`, `name` and
    /// enforcement mode, and are never deleted.
    pub fn with_base_configuration(mut self, base: Vec<PathConfig>) -> Self {
        self.base = base;
        self
    }

    /// The configured options
    pub fn options(&self) -> &AutoconfOptions {
        &self.options
    }

    /// Run the startup pass over the discovered descriptors
    pub fn configure(
        &self,
        descriptors: &[EndpointDescriptor],
    ) -> Result<PolicyConfiguration> {
        info!("Automatic resources and scopes configuration process started.");

        let mut store = PathConfigStore::with_base(self.base.clone());
        for descriptor in descriptors {
            debug!("Parsing handler {}", descriptor.handler);
            for config in self.expander.expand(descriptor)? {
                store.merge(config);
            }
        }

        self.register_export_path(&mut store);

        info!(
            "Autoconfiguration finished: {} path configurations",
            store.len()
        );
        Ok(store.freeze())
    }

    /// Register the export endpoint's own path config (merge rules apply)
    fn register_export_path(&self, store: &mut PathConfigStore) {
        let path = build_path([self.options.export_path.as_str()]);
        let config = if self.options.protect_export_path {
            debug!("ENFORCING protection over export path");
            PathConfig::new(path.clone(), EXPORT_PATH_NAME).with_method(MethodConfig::new(
                HttpVerb::Get,
                vec![self.options.export_path_access_scope.clone()],
            ))
        } else {
            PathConfig::new(path.clone(), EXPORT_PATH_NAME)
                .with_enforcement_mode(EnforcementMode::Disabled)
        };

        store.merge(config);
        info!("Configuration export enabled and available @ {}", path);
    }
}

impl Default for AutoconfEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(path: &str, verb: HttpVerb) -> EndpointDescriptor {
        EndpointDescriptor::new(format!("com.acme.Controller#{}", path))
            .with_class_path(path)
            .with_verb(verb)
    }

    #[test]
    fn test_configure_merges_descriptors_and_registers_export_path() {
        let engine = AutoconfEngine::new();
        let configuration = engine
            .configure(&[
                descriptor("pets", HttpVerb::Get),
                descriptor("pets", HttpVerb::Post),
            ])
            .unwrap();

        // /pets plus the export path
        assert_eq!(configuration.len(), 2);
        let pets = configuration
            .iter()
            .find(|c| c.path == "/pets")
            .unwrap();
        assert_eq!(pets.methods.len(), 2);
    }

    #[test]
    fn test_protected_export_path_registration() {
        let engine = AutoconfEngine::with_options(
            AutoconfOptions::default()
                .with_export_path("/mac/configuration/export")
                .with_export_path_access_scope("configuration:export"),
        );
        let configuration = engine.configure(&[]).unwrap();

        let export = configuration
            .iter()
            .find(|c| c.path == "/mac/configuration/export")
            .unwrap();
        assert_eq!(export.enforcement_mode, EnforcementMode::Enforcing);
        assert_eq!(export.methods.len(), 1);
        assert_eq!(export.methods[0].verb, HttpVerb::Get);
        assert_eq!(export.methods[0].scopes, vec!["configuration:export"]);
    }

    #[test]
    fn test_unprotected_export_path_is_disabled() {
        let engine = AutoconfEngine::with_options(
            AutoconfOptions::default().with_protect_export_path(false),
        );
        let configuration = engine.configure(&[]).unwrap();

        let export = configuration
            .iter()
            .find(|c| c.path == "/mac/configuration/export")
            .unwrap();
        assert_eq!(export.enforcement_mode, EnforcementMode::Disabled);
        assert!(export.methods.is_empty());
    }

    #[test]
    fn test_export_path_collision_accumulates_methods() {
        let engine = AutoconfEngine::with_options(
            AutoconfOptions::default().with_export_path("/pets"),
        );
        let configuration = engine
            .configure(&[descriptor("pets", HttpVerb::Post)])
            .unwrap();

        let pets = configuration.iter().find(|c| c.path == "/pets").unwrap();
        // Discovered POST first, then the export registration's GET
        assert_eq!(pets.methods.len(), 2);
        assert_eq!(pets.methods[0].verb, HttpVerb::Post);
        assert_eq!(pets.methods[1].verb, HttpVerb::Get);
    }

    #[test]
    fn test_base_configuration_is_kept_additively() {
        let base = vec![PathConfig::new("/existing", "existing").with_id("id-1")];
        let engine = AutoconfEngine::new().with_base_configuration(base);
        let configuration = engine
            .configure(&[descriptor("pets", HttpVerb::Get)])
            .unwrap();

        let existing = configuration
            .iter()
            .find(|c| c.path == "/existing")
            .unwrap();
        assert_eq!(existing.id.as_deref(), Some("id-1"));
        assert_eq!(configuration.paths()[0].path, "/existing");
    }

    #[test]
    fn test_malformed_descriptor_aborts_configuration() {
        let engine = AutoconfEngine::new();
        let result = engine.configure(&[EndpointDescriptor::new("com.acme.Controller#broken")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_path_is_normalized_before_registration() {
        let engine = AutoconfEngine::with_options(
            AutoconfOptions::default().with_export_path("admin/export/"),
        );
        let configuration = engine.configure(&[]).unwrap();
        assert!(configuration.iter().any(|c| c.path == "/admin/export"));
    }
}
