//! Collisions abort the build before anything is written

use std::io::Cursor;

use profile_builder::driver::{BuildOptions, build_profile, write_output};
use profile_builder::error::ProfileError;
use profile_builder::project::{ListStrategy, SelectionStrategy};
use tokio_util::sync::CancellationToken;

use crate::helpers::go_tree::{GoTree, enum_source};

const FIRST: &str = "compute/mgmt/2017-12-01/compute";
const SECOND: &str = "compute/mgmt/2018-06-01/compute";

#[test]
fn test_incompatible_enum_constant_is_collision() {
    let tree = GoTree::new();
    tree.package(FIRST, &enum_source("compute", "string", "\"x\""));
    tree.package(SECOND, &enum_source("compute", "int32", "\"x\""));
    let target = tree.root().join("out/profile.go");

    let cancel = CancellationToken::new();
    let list = GoTree::list(&[FIRST, SECOND]);
    let packages = ListStrategy::new(Cursor::new(list), "<list>")
        .with_root(tree.root())
        .packages(cancel.clone());
    let result = build_profile(packages, &BuildOptions::new("latest"), &cancel)
        .and_then(|output| write_output(&output, Some(&target), &mut std::io::sink()));

    let err = result.unwrap_err();
    let ProfileError::Collision {
        symbol,
        first,
        second,
        ..
    } = &err
    else {
        panic!("expected collision, got {err}");
    };
    assert_eq!(symbol, "Foo");
    assert!(first.ends_with(FIRST), "{}", first.display());
    assert!(second.ends_with(SECOND), "{}", second.display());

    let message = err.to_string();
    assert!(message.contains("Foo"));
    assert!(message.contains(FIRST) && message.contains(SECOND), "{message}");
    assert!(!target.exists());
    assert!(!target.parent().unwrap().exists());
}

#[test]
fn test_enum_constants_of_separately_defined_types_collide() {
    let tree = GoTree::new();
    tree.package(FIRST, &enum_source("compute", "string", "\"x\""));
    tree.package(SECOND, &enum_source("compute", "string", "\"x\""));

    let cancel = CancellationToken::new();
    let packages = ListStrategy::new(Cursor::new(GoTree::list(&[FIRST, SECOND])), "<list>")
        .with_root(tree.root())
        .packages(cancel.clone());
    let err = build_profile(packages, &BuildOptions::new("latest"), &cancel).unwrap_err();
    assert!(matches!(err, ProfileError::Collision { ref symbol, .. } if symbol == "Foo"));
}

#[test]
fn test_same_defined_type_keeps_wrappers_on_their_own_package() {
    let tree = GoTree::new();
    tree.package(FIRST, "package compute\n\ntype Foo struct{}\n\nfunc NewA() Foo { return Foo{} }\n");
    tree.package(SECOND, "package compute\n\ntype Foo struct{}\n\nfunc NewB(f Foo) int { return 0 }\n");

    let cancel = CancellationToken::new();
    let packages = ListStrategy::new(Cursor::new(GoTree::list(&[FIRST, SECOND])), "<list>")
        .with_root(tree.root())
        .packages(cancel.clone());
    let output = build_profile(packages, &BuildOptions::new("latest"), &cancel).unwrap();

    let text = &output.files[0].contents;
    assert!(text.contains("type Foo = compute20171201.Foo\n"), "{text}");
    assert!(text.contains("type Foo1 = compute20180601.Foo\n"), "{text}");
    assert!(text.contains("func NewA() Foo {\n\treturn compute20171201.NewA()\n}\n"), "{text}");
    assert!(
        text.contains("func NewB(f Foo1) int {\n\treturn compute20180601.NewB(f)\n}\n"),
        "{text}"
    );
}

#[test]
fn test_differing_function_signatures_are_collision() {
    let tree = GoTree::new();
    tree.package(FIRST, "package compute\n\nfunc New(id string) int { return 0 }\n");
    tree.package(SECOND, "package compute\n\nfunc New(id string, base string) int { return 0 }\n");

    let cancel = CancellationToken::new();
    let packages = ListStrategy::new(Cursor::new(GoTree::list(&[FIRST, SECOND])), "<list>")
        .with_root(tree.root())
        .packages(cancel.clone());
    let err = build_profile(packages, &BuildOptions::new("latest"), &cancel).unwrap_err();
    assert!(matches!(err, ProfileError::Collision { ref symbol, .. } if symbol == "New"));
}
