//! Generated profiles parse back into the aliases they declare

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use profile_builder::driver::{BuildOptions, build_profile};
use profile_builder::parser::parse_source_file;
use profile_builder::project::{ListStrategy, SelectionStrategy, SourcePackage};
use profile_builder::symbols::{SymbolDetail, SymbolKind, TypeExpr, extract_sources};
use tokio_util::sync::CancellationToken;

use crate::helpers::go_tree::{GoTree, MODULE};

const COMPUTE_2017: &str = "compute/mgmt/2017-12-01/compute";
const COMPUTE_2018: &str = "compute/mgmt/2018-06-01/compute";

const OLD: &str = r#"package compute

import "context"

type DiskState string

const (
	Attached   DiskState = "Attached"
	Unattached DiskState = "Unattached"
)

type Disk struct {
	Name *string
}

const DefaultBaseURI = "https://management.azure.com"

func NewDisksClient(subscriptionID string) DisksClient {
	return DisksClient{}
}

type DisksClient struct{}

func (c DisksClient) Get(ctx context.Context, name string) (Disk, error) {
	return Disk{}, nil
}
"#;

const NEW: &str = r#"package compute

type Disk struct {
	Name *string
	Sku  *string
}

var ErrThrottled = errors.New("throttled")

func Pointer(s string) *string { return &s }
"#;

fn profile() -> String {
    let tree = GoTree::new();
    tree.package(COMPUTE_2017, OLD);
    tree.package(COMPUTE_2018, NEW);

    let cancel = CancellationToken::new();
    let packages = ListStrategy::new(Cursor::new(GoTree::list(&[COMPUTE_2017, COMPUTE_2018])), "<list>")
        .with_root(tree.root())
        .packages(cancel.clone());
    let options = BuildOptions::new("latest").with_package_name("compute");
    let output = build_profile(packages, &options, &cancel).unwrap();
    assert_eq!(output.files.len(), 1);
    output.files.into_iter().next().unwrap().contents
}

#[test]
fn test_profile_parses_without_errors() {
    let text = profile();
    let parse = parse_source_file(&text);
    assert!(parse.ok(), "{:?}\n{}", parse.errors, text);
}

#[test]
fn test_profile_round_trips_aliases() {
    let text = profile();
    let package = Arc::new(SourcePackage::from_path("profiles/latest/compute"));
    let symbols = extract_sources(package, &[(PathBuf::from("models.go"), text.clone())]).unwrap();

    assert_eq!(symbols.package_name, "compute");
    let imports = &symbols.files[0].imports;
    assert_eq!(
        imports.get("compute20171201").map(String::as_str),
        Some(format!("{}/{}", MODULE, COMPUTE_2017).as_str())
    );
    assert_eq!(
        imports.get("compute20180601").map(String::as_str),
        Some(format!("{}/{}", MODULE, COMPUTE_2018).as_str())
    );

    let type_target = |name: &str| match &symbols.get(name).unwrap().detail {
        SymbolDetail::Type {
            definition,
            is_alias: true,
            ..
        } => definition.clone(),
        other => panic!("expected alias for {name}, got {other:?}"),
    };
    assert_eq!(type_target("Disk"), TypeExpr::qualified("compute20171201", "Disk"));
    assert_eq!(type_target("Disk1"), TypeExpr::qualified("compute20180601", "Disk"));
    assert_eq!(type_target("DiskState"), TypeExpr::qualified("compute20171201", "DiskState"));

    match &symbols.get("Attached").unwrap().detail {
        SymbolDetail::Const { value, group, .. } => {
            assert_eq!(value, "compute20171201.Attached");
            assert_eq!(group.as_deref(), Some("DiskState"));
        }
        other => panic!("expected const, got {other:?}"),
    }
    match &symbols.get("ErrThrottled").unwrap().detail {
        SymbolDetail::Var { value, .. } => {
            assert_eq!(value.as_deref(), Some("compute20180601.ErrThrottled"));
        }
        other => panic!("expected var, got {other:?}"),
    }

    let pointer = symbols.get("Pointer").unwrap();
    assert_eq!(pointer.kind, SymbolKind::Func);
    assert_eq!(pointer.signature().unwrap().to_string(), "(s string) *string");
    assert!(symbols.get("Get").is_none());
    assert!(text.contains("\treturn compute20180601.Pointer(s)\n"), "{text}");
}
