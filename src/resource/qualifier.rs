//! Resource-qualifier naming conventions.
//!
//! Variants of an asset are encoded directly in file and directory names:
//! `Logo.scale-150.png`, `Strings/en-US/Resource.resw`. A qualifier token
//! is a separator-prefixed, hyphen-joined key/value pair with no embedded
//! separators, e.g. `.scale-100` or `-en-US`. Tokens carry no ordering or
//! priority; they are opaque during search and consumed only by removal.

use regex::Regex;
use std::sync::OnceLock;

/// Token pattern: separator (`.` or `-`), key, `-`, value.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\.|-)[^.\-]+-[^.\-]+").unwrap())
}

/// Unanchored test for qualifier-named directories (`en-US`, `scale-150`).
fn qualifier_dir_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r".[^.\-]+-[^.\-]+").unwrap())
}

/// Remove every embedded qualifier token from a file name.
pub(crate) fn strip_qualifiers(name: &str) -> String {
    token_pattern().replace_all(name, "").into_owned()
}

/// Whether a directory name follows the qualifier naming convention.
pub(crate) fn is_qualifier_dir(name: &str) -> bool {
    qualifier_dir_pattern().is_match(name)
}

/// Decomposition of a requested relative path into directory part, file
/// stem, and extension. Computed once per lookup.
#[derive(Debug)]
pub(crate) struct ResourceQuery {
    dir: String,
    file_name_lower: String,
    stem_lower: String,
    extension_lower: String,
}

impl ResourceQuery {
    pub(crate) fn parse(relative_path: &str) -> Self {
        let normalized = relative_path.replace('\\', "/");
        let (dir, file_name) = match normalized.rsplit_once('/') {
            Some((dir, name)) => (dir.to_string(), name.to_string()),
            None => (String::new(), normalized),
        };
        let (stem, extension) = match file_name.rfind('.') {
            Some(idx) if idx > 0 => (&file_name[..idx], &file_name[idx..]),
            _ => (file_name.as_str(), ""),
        };
        let stem_lower = stem.to_lowercase();
        let extension_lower = extension.to_lowercase();
        let file_name_lower = file_name.to_lowercase();
        ResourceQuery {
            dir,
            file_name_lower,
            stem_lower,
            extension_lower,
        }
    }

    /// Directory part of the request, empty for a root-level resource.
    pub(crate) fn directory(&self) -> &str {
        &self.dir
    }

    /// Prefilter: qualifier-decorated variants of the request share its stem
    /// prefix and extension suffix.
    pub(crate) fn is_candidate(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        lower.starts_with(&self.stem_lower) && lower.ends_with(&self.extension_lower)
    }

    /// A candidate wins when stripping its qualifier tokens leaves exactly
    /// the requested file name. Comparison folds with Unicode lowercasing,
    /// the same fold [`is_candidate`] uses, so the prefilter and the final
    /// comparison never disagree on non-ASCII names.
    ///
    /// [`is_candidate`]: ResourceQuery::is_candidate
    pub(crate) fn matches(&self, name: &str) -> bool {
        strip_qualifiers(name).to_lowercase() == self.file_name_lower
    }
}
