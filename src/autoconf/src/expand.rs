//! Cross-product expansion of endpoint descriptors into path configs

use tracing::debug;

use crate::error::{AutoconfError, Result};
use crate::path::build_path;
use crate::scope::ScopeResolver;
use crate::types::{EndpointDescriptor, MethodConfig, PathConfig};

/// Expands endpoint descriptors into unmerged path configurations
///
/// One `PathConfig` is produced per (class path, verb, method path) triple,
/// each carrying exactly one `MethodConfig`. Emission order follows the
/// declaration order of class paths, then verbs, then method paths; the
/// store's merge step depends on that order being deterministic.
pub struct EndpointExpander {
    resolver: ScopeResolver,
}

impl EndpointExpander {
    /// Create an expander using the given scope resolver
    pub fn new(resolver: ScopeResolver) -> Self {
        Self { resolver }
    }

    /// The resolver used for scope and name extraction
    pub fn resolver(&self) -> &ScopeResolver {
        &self.resolver
    }

    /// Expand one descriptor into path configs, one per path-verb pair
    ///
    /// A descriptor with no class paths expands against the root prefix and
    /// one with no method paths against an empty suffix. A descriptor with
    /// no verbs is malformed and is reported, never silently dropped.
    pub fn expand(&self, descriptor: &EndpointDescriptor) -> Result<Vec<PathConfig>> {
        if descriptor.verbs.is_empty() {
            return Err(AutoconfError::InvalidDescriptor {
                handler: descriptor.handler.clone(),
                reason: "descriptor declares no HTTP verbs".to_string(),
            });
        }

        let class_paths: Vec<&str> = if descriptor.class_paths.is_empty() {
            vec![""]
        } else {
            descriptor.class_paths.iter().map(String::as_str).collect()
        };
        let method_paths: Vec<&str> = if descriptor.method_paths.is_empty() {
            vec![""]
        } else {
            descriptor.method_paths.iter().map(String::as_str).collect()
        };

        let scopes = self.resolver.scopes(descriptor);
        let name = self.resolver.display_name(descriptor);

        let mut configs =
            Vec::with_capacity(class_paths.len() * descriptor.verbs.len() * method_paths.len());
        for class_path in &class_paths {
            for verb in &descriptor.verbs {
                for method_path in &method_paths {
                    let path = build_path([class_path, method_path]);
                    debug!("Configuring {} request for path: {}", verb, path);

                    configs.push(
                        PathConfig::new(path, name.clone())
                            .with_method(MethodConfig::new(*verb, scopes.clone())),
                    );
                }
            }
        }
        Ok(configs)
    }
}
