//! Core endpoint and policy configuration types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP verb of a request mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
}

impl HttpVerb {
    /// Returns the verb as its uppercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            other => Err(format!("unknown HTTP verb: {}", other)),
        }
    }
}

/// Whether a path configuration is actively checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnforcementMode {
    /// Requests on this path are checked against the declared scopes
    #[default]
    Enforcing,
    /// Requests on this path are never checked
    Disabled,
    /// Requests on this path are checked leniently
    Permissive,
}

/// One OpenAPI-style security requirement on an operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRequirementDoc {
    /// Authorization scope names required by this requirement
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// OpenAPI v3-style operation annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDoc {
    /// Operation display identifier, overrides the handler short name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// Declared security requirements
    #[serde(default)]
    pub security: Vec<SecurityRequirementDoc>,
}

/// One Swagger v2-style authorization block on an operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationDoc {
    /// Authorization scope names declared by this block
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Swagger v2-style operation annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyOperationDoc {
    /// Operation nickname, overrides the handler short name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    /// Declared authorization blocks
    #[serde(default)]
    pub authorizations: Vec<AuthorizationDoc>,
}

/// Opaque per-endpoint annotation bundle, consumed only by scope providers
///
/// Each field carries the operation document of one supported metadata
/// dialect; an endpoint may declare none, one, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointMetadata {
    /// OpenAPI v3-style annotation, if present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi: Option<OperationDoc>,

    /// Swagger v2-style annotation, if present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swagger: Option<LegacyOperationDoc>,
}

impl EndpointMetadata {
    /// Returns true if no dialect declared anything for this endpoint
    pub fn is_empty(&self) -> bool {
        self.openapi.is_none() && self.swagger.is_none()
    }
}

/// Metadata describing one discovered request-handling method
///
/// Produced by an external discovery collaborator, immutable afterwards.
/// `class_paths` and `method_paths` are *alternative* prefixes and suffixes
/// (multi-value mappings branch, they do not concatenate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Stable handler identifier (e.g. a fully-qualified method name)
    pub handler: String,

    /// Class-level path alternatives; empty means root
    #[serde(default)]
    pub class_paths: Vec<String>,

    /// Method-level path alternatives; empty means no extra segment
    #[serde(default)]
    pub method_paths: Vec<String>,

    /// HTTP verbs handled; must be non-empty
    #[serde(default)]
    pub verbs: Vec<HttpVerb>,

    /// Annotation bundle for scope providers
    #[serde(default)]
    pub metadata: EndpointMetadata,
}

impl EndpointDescriptor {
    /// Create a descriptor for a handler with no mappings yet
    pub fn new(handler: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            class_paths: Vec::new(),
            method_paths: Vec::new(),
            verbs: Vec::new(),
            metadata: EndpointMetadata::default(),
        }
    }

    /// Add a class-level path alternative
    pub fn with_class_path(mut self, path: impl Into<String>) -> Self {
        self.class_paths.push(path.into());
        self
    }

    /// Add a method-level path alternative
    pub fn with_method_path(mut self, path: impl Into<String>) -> Self {
        self.method_paths.push(path.into());
        self
    }

    /// Add a handled verb
    pub fn with_verb(mut self, verb: HttpVerb) -> Self {
        self.verbs.push(verb);
        self
    }

    /// Attach the annotation bundle
    pub fn with_metadata(mut self, metadata: EndpointMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Short handler name: the segment after the last `#`, `::` or `.`
    pub fn short_name(&self) -> &str {
        let after_hash = self
            .handler
            .rsplit_once('#')
            .map(|(_, m)| m)
            .unwrap_or(&self.handler);
        let after_colons = after_hash
            .rsplit_once("::")
            .map(|(_, m)| m)
            .unwrap_or(after_hash);
        after_colons
            .rsplit_once('.')
            .map(|(_, m)| m)
            .unwrap_or(after_colons)
    }
}

/// Per-verb scope requirements of a path configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodConfig {
    /// HTTP verb this entry applies to
    #[serde(rename = "method")]
    pub verb: HttpVerb,

    /// Required scope names, blank-filtered and deduplicated
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl MethodConfig {
    /// Create a method config, dropping blank scopes and duplicates
    ///
    /// Order of first occurrence is preserved.
    pub fn new(verb: HttpVerb, scopes: Vec<String>) -> Self {
        let mut seen = Vec::new();
        for scope in scopes {
            if !scope.trim().is_empty() && !seen.contains(&scope) {
                seen.push(scope);
            }
        }
        Self { verb, scopes: seen }
    }
}

/// The per-path policy unit: one canonical path and its verb requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathConfig {
    /// Canonical slash-delimited path
    pub path: String,

    /// Present only on pre-existing, externally managed entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Operation display name
    pub name: String,

    /// Whether this path is actively checked
    #[serde(default)]
    pub enforcement_mode: EnforcementMode,

    /// Per-verb scope requirements, in merge order
    #[serde(default)]
    pub methods: Vec<MethodConfig>,
}

impl PathConfig {
    /// Create an enforcing path config with no methods yet
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id: None,
            name: name.into(),
            enforcement_mode: EnforcementMode::default(),
            methods: Vec::new(),
        }
    }

    /// Mark this entry as externally managed
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the enforcement mode
    pub fn with_enforcement_mode(mut self, mode: EnforcementMode) -> Self {
        self.enforcement_mode = mode;
        self
    }

    /// Append a method config
    pub fn with_method(mut self, method: MethodConfig) -> Self {
        self.methods.push(method);
        self
    }
}
