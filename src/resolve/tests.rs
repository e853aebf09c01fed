#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::project::SourcePackage;
use crate::symbols::extract_sources;

fn pkg(path: &str, text: &str) -> PackageSymbols {
    let package = Arc::new(SourcePackage::from_path(path));
    extract_sources(package, &[(PathBuf::from("models.go"), text.to_string())]).unwrap()
}

fn display_names(resolution: &Resolution, packages: &[PackageSymbols]) -> Vec<(String, String)> {
    resolution
        .symbols
        .iter()
        .map(|r| (r.get(packages).name.to_string(), r.display_name.to_string()))
        .collect()
}

#[test]
fn test_disjoint_packages_keep_names() {
    let packages = vec![
        pkg("a/mgmt/2017-01-01/a", "package a\n\ntype Disk struct{}\n"),
        pkg("b/mgmt/2017-01-01/b", "package b\n\ntype Vault struct{}\n"),
    ];
    let resolution = resolve(&packages).unwrap();
    assert_eq!(
        display_names(&resolution, &packages),
        vec![
            ("Disk".to_string(), "Disk".to_string()),
            ("Vault".to_string(), "Vault".to_string())
        ]
    );
    assert_eq!(resolution.deduplicated, 0);
}

#[test]
fn test_identical_reexport_is_dropped() {
    let text = "package a\n\nconst DefaultBaseURI = \"https://management.azure.com\"\n\nfunc Version() string { return \"1\" }\n";
    let packages = vec![pkg("x/mgmt/2017-01-01/a", text), pkg("y/mgmt/2018-01-01/b", text)];
    let resolution = resolve(&packages).unwrap();
    assert_eq!(resolution.symbols.len(), 2);
    assert!(resolution.symbols.iter().all(|r| r.package == 0));
    assert_eq!(resolution.deduplicated, 2);
}

#[test]
fn test_differing_types_are_renamed_with_smallest_free_suffix() {
    let packages = vec![
        pkg("a/mgmt/2017-01-01/a", "package a\n\ntype Disk struct{ A int }\n\ntype Disk1 struct{}\n"),
        pkg("b/mgmt/2018-01-01/b", "package b\n\ntype Disk struct{ B int }\n"),
        pkg("c/mgmt/2019-01-01/c", "package c\n\ntype Disk struct{ C int }\n"),
    ];
    let resolution = resolve(&packages).unwrap();
    assert_eq!(
        display_names(&resolution, &packages),
        vec![
            ("Disk".to_string(), "Disk".to_string()),
            ("Disk1".to_string(), "Disk1".to_string()),
            ("Disk".to_string(), "Disk2".to_string()),
            ("Disk".to_string(), "Disk3".to_string()),
        ]
    );
    let disk = SmolStr::new("Disk");
    assert_eq!(resolution.type_name(1, &disk), "Disk2");
    assert_eq!(resolution.type_name(0, &disk), "Disk");
}

// ============================================================================
// TYPE IDENTITY
// ============================================================================

#[test]
fn test_identical_defined_types_are_renamed() {
    let text = "package a\n\ntype Foo struct{}\n";
    let packages = vec![pkg("x/mgmt/2017-01-01/a", text), pkg("y/mgmt/2018-01-01/a", text)];
    let resolution = resolve(&packages).unwrap();
    assert_eq!(
        display_names(&resolution, &packages),
        vec![
            ("Foo".to_string(), "Foo".to_string()),
            ("Foo".to_string(), "Foo1".to_string()),
        ]
    );
    assert_eq!(resolution.type_name(1, &SmolStr::new("Foo")), "Foo1");
    assert_eq!(resolution.deduplicated, 0);
}

#[test]
fn test_aliases_of_one_target_are_shared() {
    let packages = vec![
        pkg(
            "x/mgmt/2017-01-01/a",
            "package a\n\nimport \"github.com/Azure/go-autorest/autorest\"\n\ntype Client = autorest.Client\n",
        ),
        pkg(
            "y/mgmt/2018-01-01/a",
            "package a\n\nimport ar \"github.com/Azure/go-autorest/autorest\"\n\ntype Client = ar.Client\n",
        ),
    ];
    let resolution = resolve(&packages).unwrap();
    assert_eq!(resolution.symbols.len(), 1);
    assert_eq!(resolution.deduplicated, 1);
}

#[test]
fn test_aliases_of_different_packages_are_renamed() {
    let packages = vec![
        pkg(
            "x/mgmt/2017-01-01/a",
            "package a\n\nimport \"github.com/a/date\"\n\ntype Date = date.Date\n",
        ),
        pkg(
            "y/mgmt/2018-01-01/a",
            "package a\n\nimport \"github.com/b/date\"\n\ntype Date = date.Date\n",
        ),
    ];
    let resolution = resolve(&packages).unwrap();
    assert_eq!(resolution.symbols[1].display_name, "Date1");
}

#[test]
fn test_enum_constants_of_defined_types_collide() {
    let text = "package a\n\ntype State string\n\nconst On State = \"On\"\n";
    let packages = vec![pkg("x/mgmt/2017-01-01/a", text), pkg("y/mgmt/2018-01-01/a", text)];
    let err = resolve(&packages).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("`On`"), "{message}");
    assert!(message.contains("defines itself"), "{message}");
}

#[test]
fn test_enum_constants_of_shared_alias_are_deduplicated() {
    let text = "package a\n\nimport \"github.com/x/common\"\n\ntype State = common.State\n\nconst On State = common.On\n";
    let packages = vec![pkg("x/mgmt/2017-01-01/a", text), pkg("y/mgmt/2018-01-01/a", text)];
    let resolution = resolve(&packages).unwrap();
    assert_eq!(resolution.symbols.len(), 2);
    assert_eq!(resolution.deduplicated, 2);
}

// ============================================================================
// RENAMES AND COLLISIONS
// ============================================================================

#[test]
fn test_untyped_const_and_var_are_renamed() {
    let packages = vec![
        pkg("a/mgmt/2017-01-01/a", "package a\n\nconst APIVersion = \"2017-01-01\"\n\nvar Default = 1\n"),
        pkg("b/mgmt/2018-01-01/b", "package b\n\nconst APIVersion = \"2018-01-01\"\n\nvar Default = 2\n"),
    ];
    let resolution = resolve(&packages).unwrap();
    let renamed: Vec<_> = display_names(&resolution, &packages)
        .into_iter()
        .filter(|(original, display)| original != display)
        .collect();
    assert_eq!(
        renamed,
        vec![
            ("APIVersion".to_string(), "APIVersion1".to_string()),
            ("Default".to_string(), "Default1".to_string()),
        ]
    );
}

#[test]
fn test_function_signature_mismatch_is_collision() {
    let packages = vec![
        pkg("a/mgmt/2017-01-01/a", "package a\n\nfunc New(id string) int { return 0 }\n"),
        pkg("b/mgmt/2018-01-01/b", "package b\n\nfunc New(id string, uri string) int { return 0 }\n"),
    ];
    let err = resolve(&packages).unwrap_err();
    match err {
        ProfileError::Collision { symbol, first, second, .. } => {
            assert_eq!(symbol, "New");
            assert_eq!(first, PathBuf::from("a/mgmt/2017-01-01/a"));
            assert_eq!(second, PathBuf::from("b/mgmt/2018-01-01/b"));
        }
        other => panic!("expected collision, got {other:?}"),
    }
}

#[test]
fn test_enum_const_with_incompatible_type_is_collision() {
    let packages = vec![
        pkg("a/mgmt/2017-01-01/a", "package a\n\ntype MyEnum string\n\nconst Foo MyEnum = \"x\"\n"),
        pkg("b/mgmt/2018-01-01/b", "package b\n\ntype MyEnum int\n\nconst Foo MyEnum = \"x\"\n"),
    ];
    let err = resolve(&packages).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("`Foo`"), "{message}");
    assert!(message.contains("a/mgmt/2017-01-01/a"), "{message}");
    assert!(message.contains("b/mgmt/2018-01-01/b"), "{message}");
}

#[test]
fn test_kind_mismatch_is_collision() {
    let packages = vec![
        pkg("a/mgmt/2017-01-01/a", "package a\n\ntype Client struct{}\n"),
        pkg("b/mgmt/2018-01-01/b", "package b\n\nfunc Client() {}\n"),
    ];
    let err = resolve(&packages).unwrap_err();
    assert!(err.to_string().contains("type and func"), "{err}");
}

#[test]
fn test_duplicate_in_one_package_is_collision() {
    let packages = vec![pkg(
        "a/mgmt/2017-01-01/a",
        "package a\n\nconst Foo = 1\n\nvar Foo = 2\n",
    )];
    assert!(matches!(resolve(&packages), Err(ProfileError::Collision { .. })));
}

#[test]
fn test_resolution_is_deterministic() {
    let build = || {
        vec![
            pkg("a/mgmt/2017-01-01/a", "package a\n\ntype T struct{}\ntype U int\nvar V = 1\n"),
            pkg("b/mgmt/2018-01-01/b", "package b\n\ntype T struct{ X int }\ntype U string\nvar V = 2\n"),
            pkg("c/mgmt/2019-01-01/c", "package c\n\ntype T struct{ Y int }\nvar V = 1\n"),
        ]
    };
    let first = build();
    let second = build();
    assert_eq!(
        display_names(&resolve(&first).unwrap(), &first),
        display_names(&resolve(&second).unwrap(), &second)
    );
}
