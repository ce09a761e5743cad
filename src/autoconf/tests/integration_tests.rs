//! End-to-end tests for the autoconfiguration pipeline:
//! descriptor expansion → merge → export-path registration → settings export

use pathguard_autoconf::{
    export::to_pretty_json, AuthorizationExporter, AutoconfEngine, AutoconfOptions,
    EndpointDescriptor, EndpointMetadata, EnforcementMode, HttpVerb, PathConfig, ResolutionMode,
};
use pathguard_autoconf::types::{MethodConfig, OperationDoc, SecurityRequirementDoc};

fn secured_metadata(scopes: &[&str]) -> EndpointMetadata {
    EndpointMetadata {
        openapi: Some(OperationDoc {
            operation_id: None,
            security: vec![SecurityRequirementDoc {
                scopes: scopes.iter().map(|s| s.to_string()).collect(),
            }],
        }),
        swagger: None,
    }
}

#[test]
fn test_single_secured_endpoint_exports_one_resource() {
    // One endpoint, class path "authorized", GET, scope "entity:read"
    let descriptor = EndpointDescriptor::new("com.acme.AuthorizedController#get")
        .with_class_path("authorized")
        .with_verb(HttpVerb::Get)
        .with_metadata(secured_metadata(&["entity:read"]));

    let configuration = AutoconfEngine::new().configure(&[descriptor]).unwrap();

    let authorized = configuration
        .iter()
        .find(|c| c.path == "/authorized")
        .expect("path config for /authorized");
    assert_eq!(authorized.methods.len(), 1);
    assert_eq!(authorized.methods[0].verb, HttpVerb::Get);
    assert_eq!(authorized.methods[0].scopes, vec!["entity:read"]);

    let settings = AuthorizationExporter::new().export(configuration.paths());
    let resource = settings
        .resources
        .iter()
        .find(|r| r.uris == vec!["/authorized".to_string()])
        .expect("resource for /authorized");
    assert_eq!(resource.name, "get");
    assert!(resource.scopes.iter().any(|s| s.name == "entity:read"));
    assert!(settings.scopes.iter().any(|s| s.name == "entity:read"));
}

#[test]
fn test_five_handlers_on_one_mapping_merge_into_one_path() {
    // Five handler methods sharing the class path, no extra method paths
    let descriptors: Vec<EndpointDescriptor> = (0..5)
        .map(|i| {
            EndpointDescriptor::new(format!("com.acme.AwesomeController#handler{}", i))
                .with_class_path("myAwesomeMapping")
                .with_verb(HttpVerb::Get)
        })
        .collect();

    let configuration = AutoconfEngine::new().configure(&descriptors).unwrap();

    let merged = configuration
        .iter()
        .find(|c| c.path == "/myAwesomeMapping")
        .expect("merged path config");
    assert_eq!(merged.methods.len(), 5);
    // First handler wins the display name
    assert_eq!(merged.name, "handler0");
}

#[test]
fn test_method_level_paths_branch_into_distinct_entries() {
    let base = EndpointDescriptor::new("com.acme.AwesomeController#index")
        .with_class_path("myAwesomeMapping")
        .with_verb(HttpVerb::Get);
    let foo = EndpointDescriptor::new("com.acme.AwesomeController#foo")
        .with_class_path("myAwesomeMapping")
        .with_method_path("foo")
        .with_verb(HttpVerb::Get);
    let bar = EndpointDescriptor::new("com.acme.AwesomeController#bar")
        .with_class_path("myAwesomeMapping")
        .with_method_path("/bar")
        .with_verb(HttpVerb::Get);

    let configuration = AutoconfEngine::new().configure(&[base, foo, bar]).unwrap();

    let paths: Vec<&str> = configuration
        .iter()
        .map(|c| c.path.as_str())
        .filter(|p| p.starts_with("/myAwesomeMapping"))
        .collect();
    // Method-level fragments append to the class prefix, absolute or not
    assert_eq!(
        paths,
        vec!["/myAwesomeMapping", "/myAwesomeMapping/foo", "/myAwesomeMapping/bar"]
    );
}

#[test]
fn test_protected_export_path_self_registration() {
    let options = AutoconfOptions::default()
        .with_export_path("/mac/configuration/export")
        .with_protect_export_path(true)
        .with_export_path_access_scope("configuration:export");

    let configuration = AutoconfEngine::with_options(options).configure(&[]).unwrap();

    let export = configuration
        .iter()
        .find(|c| c.path == "/mac/configuration/export")
        .expect("export path config");
    assert_eq!(export.enforcement_mode, EnforcementMode::Enforcing);
    assert_eq!(export.methods.len(), 1);
    assert_eq!(export.methods[0].scopes, vec!["configuration:export"]);

    // The protected export path shows up in its own export
    let settings = AuthorizationExporter::new().export(configuration.paths());
    assert!(settings
        .scopes
        .iter()
        .any(|s| s.name == "configuration:export"));
}

#[test]
fn test_unprotected_export_path_never_exports() {
    let options = AutoconfOptions::default().with_protect_export_path(false);
    let configuration = AutoconfEngine::with_options(options).configure(&[]).unwrap();

    let settings = AuthorizationExporter::new().export(configuration.paths());
    assert!(settings.resources.is_empty());
    assert!(settings.scopes.is_empty());
}

#[test]
fn test_blank_scopes_never_reach_the_export() {
    let descriptor = EndpointDescriptor::new("com.acme.EntityController#read")
        .with_class_path("entities")
        .with_verb(HttpVerb::Get)
        .with_metadata(secured_metadata(&["entity:read", "", "  "]));

    let configuration = AutoconfEngine::new().configure(&[descriptor]).unwrap();

    let entities = configuration
        .iter()
        .find(|c| c.path == "/entities")
        .unwrap();
    assert_eq!(entities.methods[0].scopes, vec!["entity:read"]);

    let settings = AuthorizationExporter::new().export(configuration.paths());
    let resource = settings
        .resources
        .iter()
        .find(|r| r.uris == vec!["/entities".to_string()])
        .unwrap();
    assert_eq!(resource.scopes.len(), 1);
    assert_eq!(resource.scopes[0].name, "entity:read");
}

#[test]
fn test_externally_managed_base_entries_are_kept_but_not_exported() {
    let base = vec![PathConfig::new("/legacy", "legacy")
        .with_id("external-1")
        .with_method(MethodConfig::new(
            HttpVerb::Get,
            vec!["legacy:read".to_string()],
        ))];

    let descriptor = EndpointDescriptor::new("com.acme.PetController#list")
        .with_class_path("pets")
        .with_verb(HttpVerb::Get)
        .with_metadata(secured_metadata(&["pets:read"]));

    let configuration = AutoconfEngine::new()
        .with_base_configuration(base)
        .configure(&[descriptor])
        .unwrap();

    // Still present in the merged configuration
    assert!(configuration.iter().any(|c| c.path == "/legacy"));

    // But excluded from the export document, scopes included
    let settings = AuthorizationExporter::new().export(configuration.paths());
    assert!(!settings
        .resources
        .iter()
        .any(|r| r.uris.contains(&"/legacy".to_string())));
    assert!(!settings.scopes.iter().any(|s| s.name == "legacy:read"));
}

#[test]
fn test_multi_value_mappings_expand_and_merge_across_descriptors() {
    let descriptor = EndpointDescriptor::new("com.acme.PetController#manage")
        .with_class_path("pets")
        .with_class_path("animals")
        .with_verb(HttpVerb::Get)
        .with_verb(HttpVerb::Post)
        .with_method_path("manage")
        .with_metadata(secured_metadata(&["pets:manage"]));

    let configuration = AutoconfEngine::new().configure(&[descriptor]).unwrap();

    for path in ["/pets/manage", "/animals/manage"] {
        let config = configuration.iter().find(|c| c.path == path).unwrap();
        assert_eq!(config.methods.len(), 2, "two verbs merged under {}", path);
    }
}

#[test]
fn test_resolution_mode_changes_harvested_scopes() {
    use pathguard_autoconf::types::{AuthorizationDoc, LegacyOperationDoc};

    let metadata = EndpointMetadata {
        openapi: Some(OperationDoc {
            operation_id: None,
            security: vec![SecurityRequirementDoc {
                scopes: vec!["v3:scope".to_string()],
            }],
        }),
        swagger: Some(LegacyOperationDoc {
            nickname: None,
            authorizations: vec![AuthorizationDoc {
                scopes: vec!["v2:scope".to_string()],
            }],
        }),
    };

    let descriptor = |handler: &str| {
        EndpointDescriptor::new(handler)
            .with_class_path("dual")
            .with_verb(HttpVerb::Get)
            .with_metadata(metadata.clone())
    };

    let aggregated = AutoconfEngine::with_options(
        AutoconfOptions::default().with_resolution_mode(ResolutionMode::Aggregate),
    )
    .configure(&[descriptor("com.acme.DualController#get")])
    .unwrap();
    let merged = aggregated.iter().find(|c| c.path == "/dual").unwrap();
    assert_eq!(merged.methods[0].scopes, vec!["v3:scope", "v2:scope"]);

    let first_match = AutoconfEngine::with_options(
        AutoconfOptions::default().with_resolution_mode(ResolutionMode::FirstMatch),
    )
    .configure(&[descriptor("com.acme.DualController#get")])
    .unwrap();
    let merged = first_match.iter().find(|c| c.path == "/dual").unwrap();
    assert_eq!(merged.methods[0].scopes, vec!["v3:scope"]);
}

#[test]
fn test_export_is_repeatable_and_read_only() {
    let descriptor = EndpointDescriptor::new("com.acme.PetController#list")
        .with_class_path("pets")
        .with_verb(HttpVerb::Get)
        .with_metadata(secured_metadata(&["pets:read"]));

    let configuration = AutoconfEngine::new().configure(&[descriptor]).unwrap();
    let exporter = AuthorizationExporter::new();

    let first = exporter.export(configuration.paths());
    let second = exporter.export(configuration.paths());
    assert_eq!(first, second);
    assert_eq!(
        to_pretty_json(&first).unwrap(),
        to_pretty_json(&second).unwrap()
    );
}

#[test]
fn test_frozen_configuration_is_shareable_across_threads() {
    use std::sync::Arc;

    let descriptor = EndpointDescriptor::new("com.acme.PetController#list")
        .with_class_path("pets")
        .with_verb(HttpVerb::Get)
        .with_metadata(secured_metadata(&["pets:read"]));

    let configuration = Arc::new(AutoconfEngine::new().configure(&[descriptor]).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let configuration = Arc::clone(&configuration);
            std::thread::spawn(move || {
                AuthorizationExporter::new()
                    .export(configuration.paths())
                    .resources
                    .len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2); // /pets + protected export path
    }
}
