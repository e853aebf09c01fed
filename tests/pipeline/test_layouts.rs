//! Output layouts and what reaches the filesystem

use std::io::Cursor;

use profile_builder::driver::{BuildOptions, OutputLayout, build_profile, write_output};
use profile_builder::error::ProfileError;
use profile_builder::formatter::FormatOptions;
use profile_builder::project::{ListStrategy, SelectionStrategy};
use tokio_util::sync::CancellationToken;

use crate::helpers::go_tree::GoTree;

const COMPUTE: &str = "compute/mgmt/2018-06-01/compute";
const NETWORK: &str = "network/mgmt/2018-01-01/network";

fn tree() -> GoTree {
    let tree = GoTree::new();
    tree.package(COMPUTE, "package compute\n\ntype Disk struct{}\n");
    tree.file(COMPUTE, "client.go", "package compute\n\nfunc UserAgent() string { return \"sdk\" }\n");
    tree.file(COMPUTE, "client_test.go", "package compute\n\nfunc TestX() {}\n");
    tree.package(NETWORK, "package network\n\ntype Interface struct{}\n");
    tree
}

fn build(tree: &GoTree, entries: &[&str], options: &BuildOptions) -> Result<profile_builder::BuildOutput, ProfileError> {
    let cancel = CancellationToken::new();
    let packages = ListStrategy::new(Cursor::new(GoTree::list(entries)), "<list>")
        .with_root(tree.root())
        .packages(cancel.clone());
    build_profile(packages, options, &cancel)
}

// ============================================================================
// MERGED
// ============================================================================

#[test]
fn test_merged_profile_written_to_file() {
    let tree = tree();
    let options = BuildOptions::new("2019-03-01")
        .with_package_name("compute")
        .with_format(FormatOptions::default().with_build_tag(false).with_generator("gen"));
    let output = build(&tree, &[COMPUTE], &options).unwrap();
    assert_eq!(output.packages, 1);

    let target = tree.root().join("profiles/2019-03-01/compute/models.go");
    write_output(&output, Some(&target), &mut std::io::sink()).unwrap();

    let text = std::fs::read_to_string(&target).unwrap();
    assert!(text.starts_with("// This code was auto-generated by:\n// gen\n\npackage compute\n"));
    assert!(text.contains("type Disk = original.Disk\n"));
    assert!(text.contains("return original.UserAgent() + \" profiles/2019-03-01\"\n"));
    assert!(!text.contains("TestX"));
}

#[test]
fn test_repeated_list_entry_is_extracted_once() {
    let tree = tree();
    let output = build(&tree, &[COMPUTE, COMPUTE], &BuildOptions::new("latest")).unwrap();
    assert_eq!(output.packages, 1);
    assert!(output.files[0].contents.contains("package compute\n"));
}

#[test]
fn test_several_packages_need_a_package_name() {
    let tree = tree();
    let err = build(&tree, &[COMPUTE, NETWORK], &BuildOptions::new("")).unwrap_err();
    assert!(matches!(err, ProfileError::Config(_)));

    let output = build(&tree, &[COMPUTE, NETWORK], &BuildOptions::new("Latest")).unwrap();
    assert!(output.files[0].contents.contains("package latest\n"));
}

// ============================================================================
// PER-PACKAGE
// ============================================================================

#[test]
fn test_per_package_layout_writes_one_profile_per_group() {
    let tree = tree();
    let options = BuildOptions::new("latest").with_layout(OutputLayout::PerPackage);
    let output = build(&tree, &[COMPUTE, NETWORK], &options).unwrap();

    let out_dir = tree.root().join("profiles/latest");
    options.validate(Some(&out_dir)).unwrap();
    write_output(&output, Some(&out_dir), &mut std::io::sink()).unwrap();

    let compute = std::fs::read_to_string(out_dir.join("compute/mgmt/compute/models.go")).unwrap();
    let network = std::fs::read_to_string(out_dir.join("network/mgmt/network/models.go")).unwrap();
    assert!(compute.contains("package compute\n"));
    assert!(compute.contains("type Disk = original.Disk\n"));
    assert!(network.contains("package network\n"));
    assert!(network.contains("type Interface = original.Interface\n"));
}

#[test]
fn test_per_package_layout_rejects_shared_group() {
    let tree = tree();
    tree.package("compute/mgmt/2017-12-01/compute", "package compute\n");
    let options = BuildOptions::new("latest").with_layout(OutputLayout::PerPackage);
    let err = build(&tree, &[COMPUTE, "compute/mgmt/2017-12-01/compute"], &options).unwrap_err();
    assert!(matches!(err, ProfileError::Config(_)));
}

// ============================================================================
// FAILURES WRITE NOTHING
// ============================================================================

#[test]
fn test_parse_error_names_file_and_package() {
    let tree = tree();
    tree.file(NETWORK, "broken.go", "package network\n\ntype = int\n");
    let err = build(&tree, &[COMPUTE, NETWORK], &BuildOptions::new("latest")).unwrap_err();
    let ProfileError::Parse { file, line, .. } = &err else {
        panic!("expected parse error, got {err}");
    };
    assert!(file.ends_with("broken.go"));
    assert_eq!(*line, 3);
}

#[test]
fn test_missing_package_directory_is_io_error() {
    let tree = tree();
    let err = build(&tree, &["compute/mgmt/2099-01-01/compute"], &BuildOptions::new("latest")).unwrap_err();
    assert!(matches!(err, ProfileError::Io { .. }));
}

#[test]
fn test_cancelled_build_writes_nothing() {
    let tree = tree();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let packages = ListStrategy::new(Cursor::new(GoTree::list(&[COMPUTE])), "<list>")
        .with_root(tree.root())
        .packages(cancel.clone());
    let target = tree.root().join("out.go");
    let result = build_profile(packages, &BuildOptions::new("latest"), &cancel)
        .and_then(|output| write_output(&output, Some(&target), &mut std::io::sink()));
    assert!(matches!(result, Err(ProfileError::Cancelled)));
    assert!(!target.exists());
}
