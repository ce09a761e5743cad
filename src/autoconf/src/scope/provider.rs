//! Scope providers, one per supported annotation dialect

use crate::types::EndpointDescriptor;

/// Extracts authorization scope names from one endpoint's metadata
///
/// One implementation exists per supported annotation dialect. Providers are
/// registered explicitly on the resolver; `detect` is a capability flag set
/// at construction time, not a runtime probe.
pub trait ScopeProvider: Send + Sync {
    /// Dialect name, used for logging
    fn dialect(&self) -> &'static str;

    /// Whether this provider's dialect is configured for this deployment
    fn detect(&self) -> bool;

    /// Raw scope names declared on the endpoint, unfiltered
    fn scopes(&self, descriptor: &EndpointDescriptor) -> Vec<String>;

    /// Dialect-declared operation name, if a non-empty one exists
    fn name(&self, descriptor: &EndpointDescriptor) -> Option<String>;
}

/// Provider for OpenAPI v3-style operation annotations
#[derive(Debug, Clone)]
pub struct OpenApiScopeProvider {
    enabled: bool,
}

impl OpenApiScopeProvider {
    /// Create an enabled provider
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Set whether this dialect is configured
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for OpenApiScopeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeProvider for OpenApiScopeProvider {
    fn dialect(&self) -> &'static str {
        "openapi"
    }

    fn detect(&self) -> bool {
        self.enabled
    }

    fn scopes(&self, descriptor: &EndpointDescriptor) -> Vec<String> {
        descriptor
            .metadata
            .openapi
            .iter()
            .flat_map(|operation| &operation.security)
            .flat_map(|requirement| requirement.scopes.iter().cloned())
            .collect()
    }

    fn name(&self, descriptor: &EndpointDescriptor) -> Option<String> {
        descriptor
            .metadata
            .openapi
            .as_ref()
            .and_then(|operation| operation.operation_id.clone())
            .filter(|name| !name.is_empty())
    }
}

/// Provider for Swagger v2-style operation annotations
#[derive(Debug, Clone)]
pub struct SwaggerScopeProvider {
    enabled: bool,
}

impl SwaggerScopeProvider {
    /// Create an enabled provider
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Set whether this dialect is configured
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for SwaggerScopeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeProvider for SwaggerScopeProvider {
    fn dialect(&self) -> &'static str {
        "swagger"
    }

    fn detect(&self) -> bool {
        self.enabled
    }

    fn scopes(&self, descriptor: &EndpointDescriptor) -> Vec<String> {
        descriptor
            .metadata
            .swagger
            .iter()
            .flat_map(|operation| &operation.authorizations)
            .flat_map(|authorization| authorization.scopes.iter().cloned())
            .collect()
    }

    fn name(&self, descriptor: &EndpointDescriptor) -> Option<String> {
        descriptor
            .metadata
            .swagger
            .as_ref()
            .and_then(|operation| operation.nickname.clone())
            .filter(|name| !name.is_empty())
    }
}
