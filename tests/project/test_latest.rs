//! Latest strategy over a real directory tree

use std::path::PathBuf;

use profile_builder::project::{LatestOptions, LatestStrategy, SelectionStrategy, SourcePackage};
use tokio_util::sync::CancellationToken;

use crate::helpers::go_tree::GoTree;

fn tree() -> GoTree {
    let tree = GoTree::new();
    for dir in [
        "compute/mgmt/2017-12-01/compute",
        "compute/mgmt/2018-06-01/compute",
        "compute/mgmt/2019-07-01-preview/compute",
        "compute/mgmt/2018-06-01/compute/computeapi",
        "network/mgmt/2018-01-01/network",
        "network/mgmt/2017-09-01/network",
        "storage/mgmt/storage",
    ] {
        tree.package(dir, "package x\n");
    }
    tree
}

fn selected(tree: &GoTree, options: LatestOptions) -> Vec<PathBuf> {
    let packages: Vec<SourcePackage> = LatestStrategy::new(tree.root())
        .with_options(options)
        .packages(CancellationToken::new())
        .collect::<Result<_, _>>()
        .unwrap();
    packages
        .into_iter()
        .map(|p| p.path.strip_prefix(tree.root()).unwrap().to_path_buf())
        .collect()
}

#[test]
fn test_one_winner_per_operation_group() {
    let tree = tree();
    assert_eq!(
        selected(&tree, LatestOptions::default()),
        vec![
            PathBuf::from("compute/mgmt/2019-07-01-preview/compute"),
            PathBuf::from("network/mgmt/2018-01-01/network"),
        ]
    );
}

#[test]
fn test_exclude_preview_falls_back_to_stable() {
    let tree = tree();
    assert_eq!(
        selected(&tree, LatestOptions::default().exclude_preview(true)),
        vec![
            PathBuf::from("compute/mgmt/2018-06-01/compute"),
            PathBuf::from("network/mgmt/2018-01-01/network"),
        ]
    );
}

#[test]
fn test_selection_is_deterministic() {
    let tree = tree();
    let first = selected(&tree, LatestOptions::default());
    for _ in 0..5 {
        assert_eq!(selected(&tree, LatestOptions::default()), first);
    }
}
