//! # Pathguard Autoconf
//!
//! Compiles discovered HTTP endpoint descriptors into a normalized
//! authorization policy document: per-path enforcement configurations plus
//! an exportable settings document describing resources and scopes.
//!
//! The pipeline runs once at startup (expansion, merge-by-path, export-path
//! registration) and freezes its result; exporting the settings document is
//! a pure read that can run concurrently thereafter. Endpoint discovery
//! itself is an external collaborator: anything able to produce
//! [`EndpointDescriptor`] values can feed the engine.
//!
//! ## Example
//!
//! ```rust
//! use pathguard_autoconf::{
//!     AuthorizationExporter, AutoconfEngine, EndpointDescriptor, HttpVerb,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let descriptor = EndpointDescriptor::new("com.acme.PetController#listPets")
//!         .with_class_path("pets")
//!         .with_verb(HttpVerb::Get);
//!
//!     let configuration = AutoconfEngine::new().configure(&[descriptor])?;
//!
//!     let settings = AuthorizationExporter::new().export(configuration.paths());
//!     println!("{}", pathguard_autoconf::export::to_pretty_json(&settings)?);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod expand;
pub mod export;
pub mod path;
pub mod scope;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::AutoconfOptions;
pub use engine::AutoconfEngine;
pub use error::{AutoconfError, Result};
pub use expand::EndpointExpander;
pub use export::{AuthorizationExporter, AuthorizationSettings, AuthorizedResource};
pub use scope::{ResolutionMode, ScopeProvider, ScopeResolver};
pub use store::{PathConfigStore, PolicyConfiguration};
pub use types::{
    EndpointDescriptor, EndpointMetadata, EnforcementMode, HttpVerb, MethodConfig, PathConfig,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
