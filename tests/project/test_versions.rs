//! Version string ordering properties

use std::cmp::Ordering;

use profile_builder::project::{VersionString, compare_versions, version_le};
use rstest::rstest;

// ============================================================================
// ORDERING
// ============================================================================

#[rstest]
#[case("2017-12-01", "2018-03-04", Ordering::Less)]
#[case("2018-03-04", "2017-12-01", Ordering::Greater)]
#[case("2018-01-01", "2018-01-01", Ordering::Equal)]
#[case("2018-01-01", "2018-01-01-preview", Ordering::Less)]
#[case("2018-01-01-alpha", "2018-01-01-beta", Ordering::Less)]
#[case("2018-01-01-1.2", "2018-01-01-1.3", Ordering::Less)]
#[case("2018-01-01-1.10", "2018-01-01-1.2", Ordering::Less)]
#[case("2017-12-31-preview", "2018-01-01", Ordering::Less)]
fn test_compare_versions(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
    assert_eq!(compare_versions(a, b).unwrap(), expected);
}

#[rstest]
#[case("2018-01-01", "2018-01-01", true)]
#[case("2017-12-01", "2018-03-04", true)]
#[case("2018-03-04", "2017-12-01", false)]
fn test_version_le(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
    assert_eq!(version_le(a, b).unwrap(), expected);
}

#[test]
fn test_ordering_is_total() {
    let inputs = [
        "2019-07-01",
        "2017-12-01",
        "2018-01-01-beta",
        "2018-01-01",
        "2018-01-01-alpha",
        "2017-12-01-preview",
        "2019-07-01-1.2",
    ];
    let versions: Vec<VersionString> = inputs.iter().map(|s| s.parse().unwrap()).collect();

    for a in &versions {
        for b in &versions {
            // antisymmetric
            assert_eq!(a.cmp(b), b.cmp(a).reverse(), "{} vs {}", a, b);
            for c in &versions {
                if a <= b && b <= c {
                    assert!(a <= c, "{} <= {} <= {}", a, b, c);
                }
            }
        }
    }

    let mut sorted = versions.clone();
    sorted.sort();
    let rendered: Vec<String> = sorted.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "2017-12-01",
            "2017-12-01-preview",
            "2018-01-01",
            "2018-01-01-alpha",
            "2018-01-01-beta",
            "2019-07-01",
            "2019-07-01-1.2",
        ]
    );
}

// ============================================================================
// MALFORMED INPUT
// ============================================================================

#[rstest]
#[case("")]
#[case("2018")]
#[case("2018-1-01")]
#[case("18-01-01")]
#[case("2018-13-01")]
#[case("2018-01-01-")]
#[case("v2018-01-01")]
fn test_malformed_version_is_error(#[case] input: &str) {
    let err = compare_versions(input, "2018-01-01").unwrap_err();
    assert_eq!(err.input, input);
    assert!(compare_versions("2018-01-01", input).is_err());
}
