#![allow(clippy::unwrap_used)]

use std::io::{BufRead, Cursor};
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use super::*;
use crate::error::ProfileError;

fn make_dirs(root: &Path, dirs: &[&str]) {
    for dir in dirs {
        std::fs::create_dir_all(root.join(dir)).unwrap();
    }
}

// ============================================================================
// LIST
// ============================================================================

#[test]
fn test_list_skips_blank_lines_and_trims() {
    let input = "  services/compute/mgmt/2017-12-01/compute  \n\n\t\nlocal/pkg\n";
    let packages: Vec<_> = ListStrategy::new(Cursor::new(input), "<stdin>")
        .packages(CancellationToken::new())
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].group, "compute");
    assert!(packages[0].version.is_some());
    assert_eq!(packages[1].group, "pkg");
    assert!(packages[1].version.is_none());
}

#[test]
fn test_list_resolves_relative_against_root() {
    let input = "a/b/2018-01-01/c\n/abs/x/y/2018-01-01/z\n";
    let packages: Vec<_> = ListStrategy::new(Cursor::new(input), "list.txt")
        .with_root("/repo")
        .packages(CancellationToken::new())
        .map(|p| p.unwrap().path)
        .collect();
    assert_eq!(
        packages,
        vec![
            PathBuf::from("/repo/a/b/2018-01-01/c"),
            PathBuf::from("/abs/x/y/2018-01-01/z")
        ]
    );
}

struct FailingReader;

impl std::io::Read for FailingReader {
    fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("boom"))
    }
}

impl BufRead for FailingReader {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        Err(std::io::Error::other("boom"))
    }

    fn consume(&mut self, _: usize) {}
}

#[test]
fn test_list_read_error_is_io_and_stops() {
    let mut packages = ListStrategy::new(FailingReader, "list.txt").packages(CancellationToken::new());
    let err = packages.next().unwrap().unwrap_err();
    match err {
        ProfileError::Io { path, .. } => assert_eq!(path, PathBuf::from("list.txt")),
        other => panic!("expected Io, got {other:?}"),
    }
    assert!(packages.next().is_none());
}

#[test]
fn test_list_cancelled_before_yield() {
    let cancel = CancellationToken::new();
    let mut packages = ListStrategy::new(Cursor::new("a\nb\n"), "<stdin>").packages(cancel.clone());
    assert!(packages.next().unwrap().is_ok());
    cancel.cancel();
    assert!(matches!(packages.next(), Some(Err(ProfileError::Cancelled))));
    assert!(packages.next().is_none());
}

// ============================================================================
// LATEST
// ============================================================================

#[test]
fn test_latest_picks_max_version_per_group() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(
        dir.path(),
        &[
            "compute/mgmt/2017-03-30/compute",
            "compute/mgmt/2017-12-01/compute",
            "compute/mgmt/2016-04-30-preview/compute",
            "compute/mgmt/2018-06-01/containerservice",
            "storage/mgmt/2016-01-01/storage",
            "notes/not-a-version/group",
        ],
    );

    let packages: Vec<_> = LatestStrategy::new(dir.path())
        .packages(CancellationToken::new())
        .collect::<Result<_, _>>()
        .unwrap();

    let found: Vec<_> = packages
        .iter()
        .map(|p| (p.group.to_string(), p.version.as_ref().unwrap().to_string()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("compute".to_string(), "2017-12-01".to_string()),
            ("containerservice".to_string(), "2018-06-01".to_string()),
            ("storage".to_string(), "2016-01-01".to_string()),
        ]
    );
    assert!(packages[0].path.ends_with("compute/mgmt/2017-12-01/compute"));
}

#[test]
fn test_latest_tagged_beats_bare_date() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(
        dir.path(),
        &["kusto/mgmt/2019-01-21/kusto", "kusto/mgmt/2019-01-21-preview/kusto"],
    );
    let packages: Vec<_> = LatestStrategy::new(dir.path())
        .packages(CancellationToken::new())
        .map(|p| p.unwrap())
        .collect();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].version.as_ref().unwrap().tag(), Some("preview"));
}

#[test]
fn test_latest_exclude_preview() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(
        dir.path(),
        &[
            "kusto/mgmt/2019-01-21/kusto",
            "kusto/mgmt/2019-05-15-preview/kusto",
            "preview/kusto/mgmt/2020-01-01/kusto",
        ],
    );
    let packages: Vec<_> = LatestStrategy::new(dir.path())
        .with_options(LatestOptions::default().exclude_preview(true))
        .packages(CancellationToken::new())
        .map(|p| p.unwrap())
        .collect();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].version.as_ref().unwrap().to_string(), "2019-01-21");
}

#[test]
fn test_latest_missing_root_is_io_error() {
    let mut packages =
        LatestStrategy::new("/definitely/not/a/root").packages(CancellationToken::new());
    assert!(matches!(packages.next(), Some(Err(ProfileError::Io { .. }))));
    assert!(packages.next().is_none());
}

#[test]
fn test_latest_cancelled_yields_cancelled_once() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path(), &["a/mgmt/2019-01-01/a"]);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let results: Vec<_> = LatestStrategy::new(dir.path()).packages(cancel).collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(ProfileError::Cancelled)));
}

// ============================================================================
// SELECTION BY NAME
// ============================================================================

#[test]
fn test_strategy_kind_from_str() {
    assert_eq!("list".parse::<StrategyKind>().unwrap(), StrategyKind::List);
    assert_eq!("latest".parse::<StrategyKind>().unwrap(), StrategyKind::Latest);
    assert!("newest".parse::<StrategyKind>().is_err());
    assert_eq!(StrategyKind::Latest.to_string(), "latest");
}
