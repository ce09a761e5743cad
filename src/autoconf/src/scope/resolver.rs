//! Scope resolution across configured providers

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::provider::ScopeProvider;
use crate::types::EndpointDescriptor;

/// How scopes are resolved when several dialects are configured
///
/// `FirstMatch` treats dialects as mutually exclusive and uses the first
/// detected provider only; `Aggregate` runs every detected provider and
/// concatenates their scope lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Use the first provider whose `detect` succeeds
    FirstMatch,
    /// Run all detected providers and flatten their results
    #[default]
    Aggregate,
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstMatch => write!(f, "first-match"),
            Self::Aggregate => write!(f, "aggregate"),
        }
    }
}

impl FromStr for ResolutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "first-match" => Ok(Self::FirstMatch),
            "aggregate" => Ok(Self::Aggregate),
            other => Err(format!("unknown resolution mode: {}", other)),
        }
    }
}

/// Delegates scope extraction to an ordered list of providers
///
/// Provider priority is registration order. Blank scope strings are
/// filtered out and duplicates dropped (first occurrence wins) in both
/// resolution modes. An endpoint no detected provider understands simply
/// yields no scopes; that is not an error.
pub struct ScopeResolver {
    providers: Vec<Box<dyn ScopeProvider>>,
    mode: ResolutionMode,
}

impl ScopeResolver {
    /// Create a resolver with no providers
    pub fn new(mode: ResolutionMode) -> Self {
        Self {
            providers: Vec::new(),
            mode,
        }
    }

    /// Create a resolver with the standard provider registration
    ///
    /// OpenAPI takes priority over Swagger.
    pub fn standard(mode: ResolutionMode) -> Self {
        use super::provider::{OpenApiScopeProvider, SwaggerScopeProvider};

        Self::new(mode)
            .with_provider(Box::new(OpenApiScopeProvider::new()))
            .with_provider(Box::new(SwaggerScopeProvider::new()))
    }

    /// Register a provider; priority follows registration order
    pub fn with_provider(mut self, provider: Box<dyn ScopeProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// The configured resolution mode
    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Number of registered providers
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Resolve the scope names declared on an endpoint
    pub fn scopes(&self, descriptor: &EndpointDescriptor) -> Vec<String> {
        let raw: Vec<String> = match self.mode {
            ResolutionMode::FirstMatch => self
                .first_detected()
                .map(|provider| provider.scopes(descriptor))
                .unwrap_or_default(),
            ResolutionMode::Aggregate => self
                .detected()
                .flat_map(|provider| provider.scopes(descriptor))
                .collect(),
        };

        let mut scopes: Vec<String> = Vec::new();
        for scope in raw {
            if scope.trim().is_empty() || scopes.contains(&scope) {
                continue;
            }
            debug!("Found authorization scope: {}", scope);
            scopes.push(scope);
        }
        scopes
    }

    /// Operation display name for an endpoint
    ///
    /// The first non-empty dialect-declared name wins, following the same
    /// provider-selection rule as `scopes`; endpoints without one fall back
    /// to the handler short name.
    pub fn display_name(&self, descriptor: &EndpointDescriptor) -> String {
        let declared = match self.mode {
            ResolutionMode::FirstMatch => self
                .first_detected()
                .and_then(|provider| provider.name(descriptor)),
            ResolutionMode::Aggregate => self
                .detected()
                .find_map(|provider| provider.name(descriptor)),
        };

        declared.unwrap_or_else(|| descriptor.short_name().to_string())
    }

    fn detected(&self) -> impl Iterator<Item = &dyn ScopeProvider> {
        self.providers
            .iter()
            .map(|provider| provider.as_ref())
            .filter(|provider| provider.detect())
    }

    fn first_detected(&self) -> Option<&dyn ScopeProvider> {
        self.detected().next()
    }
}

impl Default for ScopeResolver {
    fn default() -> Self {
        Self::standard(ResolutionMode::default())
    }
}
