//! Fix-version helpers

use std::sync::LazyLock;

use regex::Regex;

static FIX_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+(\.\d+)?$").expect("valid fix version pattern"));

/// Returns true when `version` is a numeric `major.minor` or `major.minor.patch` string.
///
/// This is the shared format check. Whether an absent version counts as valid is a
/// per-tool decision, see [`crate::profile::ToolProfile::validate_fix_version`].
pub fn is_numeric_fix_version(version: &str) -> bool {
    FIX_VERSION_RE.is_match(version)
}

/// Map a numeric version to the tag Jira stores in `fixVersion`.
///
/// This is plain concatenation: `"4.19"` becomes `"ODF v4.19.0"` and `"4.19.0"`
/// becomes `"ODF v4.19.0.0"`. Empty or absent input yields `None`.
pub fn transform_fix_version(product_tag: &str, version: Option<&str>) -> Option<String> {
    match version {
        Some(v) if !v.is_empty() => Some(format!("{product_tag} v{v}.0")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_fix_version_accepts_two_and_three_parts() {
        assert!(is_numeric_fix_version("4.19"));
        assert!(is_numeric_fix_version("4.19.0"));
        assert!(is_numeric_fix_version("10.5.2"));
    }

    #[test]
    fn test_numeric_fix_version_rejects_other_shapes() {
        for bad in [
            "", "4", "4.", "4.19.", "v4.19", "4.19-beta", "invalid", "4.19.0.1", " 4.19",
        ] {
            assert!(!is_numeric_fix_version(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_transform_fix_version() {
        assert_eq!(
            transform_fix_version("ODF", Some("4.19")),
            Some("ODF v4.19.0".to_string())
        );
        assert_eq!(
            transform_fix_version("ODF", Some("10.5")),
            Some("ODF v10.5.0".to_string())
        );
    }

    #[test]
    fn test_transform_fix_version_keeps_patch_component() {
        // No semver arithmetic: a patch component produces a four-part tag.
        assert_eq!(
            transform_fix_version("ODF", Some("4.19.0")),
            Some("ODF v4.19.0.0".to_string())
        );
    }

    #[test]
    fn test_transform_fix_version_empty() {
        assert_eq!(transform_fix_version("ODF", Some("")), None);
        assert_eq!(transform_fix_version("ODF", None), None);
    }
}
