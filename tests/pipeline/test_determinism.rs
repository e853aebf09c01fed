//! Equal inputs always produce identical bytes

use std::sync::Arc;

use profile_builder::driver::{BuildOptions, build_profile};
use profile_builder::project::{LatestStrategy, SelectionStrategy, SourcePackage};
use profile_builder::resolve::resolve;
use profile_builder::symbols::{PackageSymbols, extract_package};
use tokio_util::sync::CancellationToken;

use crate::helpers::go_tree::GoTree;

fn tree() -> GoTree {
    let tree = GoTree::new();
    tree.package(
        "compute/mgmt/2018-06-01/compute",
        "package compute\n\ntype Disk struct{}\n\ntype Snapshot struct{}\n\nfunc New() Disk { return Disk{} }\n",
    );
    tree.package(
        "network/mgmt/2018-01-01/network",
        "package network\n\ntype Disk struct{ ID string }\n\ntype Interface struct{}\n\nconst DefaultBaseURI = \"u\"\n",
    );
    tree.package(
        "storage/mgmt/2019-04-01/storage",
        "package storage\n\ntype Disk int\n\nconst DefaultBaseURI = \"u\"\n",
    );
    tree
}

fn build(tree: &GoTree, parallel: bool) -> String {
    let cancel = CancellationToken::new();
    let packages = LatestStrategy::new(tree.root()).packages(cancel.clone());
    let options = BuildOptions::new("latest")
        .with_package_name("latest")
        .with_parallel(parallel);
    let output = build_profile(packages, &options, &cancel).unwrap();
    output.files[0].contents.clone()
}

#[test]
fn test_repeated_builds_are_identical() {
    let tree = tree();
    let first = build(&tree, false);
    for _ in 0..3 {
        assert_eq!(build(&tree, false), first);
    }
}

#[test]
fn test_parallel_extraction_matches_sequential() {
    let tree = tree();
    assert_eq!(build(&tree, true), build(&tree, false));
}

#[test]
fn test_resolution_is_deterministic() {
    let tree = tree();
    let extract = || {
        [
            "compute/mgmt/2018-06-01/compute",
            "network/mgmt/2018-01-01/network",
            "storage/mgmt/2019-04-01/storage",
        ]
        .iter()
        .map(|dir| extract_package(Arc::new(SourcePackage::from_path(tree.root().join(dir)))).unwrap())
        .collect::<Vec<_>>()
    };
    let names = |packages: &[PackageSymbols]| {
        resolve(packages)
            .unwrap()
            .symbols
            .iter()
            .map(|s| s.display_name.to_string())
            .collect::<Vec<_>>()
    };

    let first = names(&extract());
    assert_eq!(
        first,
        vec!["Disk", "Snapshot", "New", "Disk1", "Interface", "DefaultBaseURI", "Disk2"]
    );
    assert_eq!(names(&extract()), first);
}
