//! Export of the compiled configuration as an authorization settings document

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::types::{EnforcementMode, PathConfig};

/// Decision strategy stamped on every exported document
pub const DECISION_STRATEGY: &str = "AFFIRMATIVE";

/// Enforcement mode stamped on every exported document
pub const POLICY_ENFORCEMENT_MODE: &str = "ENFORCING";

/// One named authorization scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationScope {
    /// Scope name
    pub name: String,
}

/// Scope-based permission entry, reserved for future extension
///
/// The exporter never populates policies; the shape exists so externally
/// authored documents deserialize losslessly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRepresentation {
    /// Policy name
    pub name: String,

    /// Policy type (e.g. "scope")
    #[serde(rename = "type")]
    pub policy_type: String,

    /// Policy logic (e.g. "POSITIVE")
    pub logic: String,

    /// Decision strategy of this policy
    pub decision_strategy: String,

    /// Free-form policy configuration
    #[serde(default)]
    pub config: HashMap<String, String>,
}

/// One exported resource: a single path and its scope requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedResource {
    /// Resource name
    pub name: String,

    /// Display name, always equal to `name`
    pub display_name: String,

    /// Whether resource owners manage access themselves
    pub owner_managed_access: bool,

    /// URIs covered by this resource; a single path per resource
    pub uris: Vec<String>,

    /// Scopes required on this resource, in first-seen order
    pub scopes: Vec<AuthorizationScope>,
}

/// The externally consumable, deduplicated authorization settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationSettings {
    /// Whether the authorization server may manage resources remotely
    pub allow_remote_resource_management: bool,

    /// Always "ENFORCING"
    pub policy_enforcement_mode: String,

    /// Always "AFFIRMATIVE"
    pub decision_strategy: String,

    /// Reserved; always empty in exported documents
    #[serde(default)]
    pub policies: Vec<PolicyRepresentation>,

    /// One resource per exported path, in store iteration order
    #[serde(default)]
    pub resources: Vec<AuthorizedResource>,

    /// All scope names across the document, deduplicated by name
    #[serde(default)]
    pub scopes: Vec<AuthorizationScope>,
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self {
            allow_remote_resource_management: false,
            policy_enforcement_mode: POLICY_ENFORCEMENT_MODE.to_string(),
            decision_strategy: DECISION_STRATEGY.to_string(),
            policies: Vec::new(),
            resources: Vec::new(),
            scopes: Vec::new(),
        }
    }
}

/// Transforms compiled path configs into an authorization settings document
///
/// The transform is pure and side-effect-free; it may be invoked repeatedly
/// and concurrently against a frozen configuration.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationExporter;

impl AuthorizationExporter {
    /// Create an exporter
    pub fn new() -> Self {
        Self
    }

    /// Build the settings document from path configs in iteration order
    ///
    /// Disabled paths and externally managed entries (non-null `id`) are
    /// excluded. Per-resource scopes are the union of the path's method
    /// scopes; every scope name is registered once in the global list.
    pub fn export(&self, paths: &[PathConfig]) -> AuthorizationSettings {
        let mut settings = AuthorizationSettings::default();

        for config in paths {
            if config.enforcement_mode == EnforcementMode::Disabled {
                continue;
            }
            if config.id.is_some() {
                continue;
            }

            let mut resource_scopes: Vec<String> = Vec::new();
            for method in &config.methods {
                for scope in &method.scopes {
                    if scope.trim().is_empty() || resource_scopes.contains(scope) {
                        continue;
                    }
                    resource_scopes.push(scope.clone());
                }
            }

            for scope in &resource_scopes {
                if !settings.scopes.iter().any(|s| &s.name == scope) {
                    settings.scopes.push(AuthorizationScope {
                        name: scope.clone(),
                    });
                }
            }

            settings.resources.push(AuthorizedResource {
                name: config.name.clone(),
                display_name: config.name.clone(),
                owner_managed_access: false,
                uris: vec![config.path.clone()],
                scopes: resource_scopes
                    .into_iter()
                    .map(|name| AuthorizationScope { name })
                    .collect(),
            });
        }

        settings
    }
}

/// Serialize a settings document as pretty-printed JSON
///
/// `serde_json` emits special characters verbatim; nothing is HTML-escaped.
pub fn to_pretty_json(settings: &AuthorizationSettings) -> Result<String> {
    Ok(serde_json::to_string_pretty(settings)?)
}
