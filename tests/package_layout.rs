//! Integration tests over on-disk package fixtures.
//!
//! Fixtures are built in temporary directories. Multi-candidate tie-breaks
//! depend on the filesystem's native listing order, so every lookup test
//! uses a single-candidate fixture.

use std::fs;
use std::path::Path;

use futures::TryStreamExt;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use appxfs::reader::{APPX_BUNDLE_MANIFEST_FILE, APPX_MANIFEST_FILE};
use appxfs::{DirectoryReader, ManifestReader, PackageReader, ReaderError, ResourceResolver};

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Build a loose package tree with a default manifest plus the given files.
fn package(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), APPX_MANIFEST_FILE, "<Package/>");
    for (rel, contents) in files {
        write(dir.path(), rel, contents);
    }
    dir
}

fn open_package(dir: &TempDir) -> DirectoryReader {
    DirectoryReader::open(dir.path()).unwrap()
}

async fn resource_bytes(reader: &dyn PackageReader, rel: &str) -> Option<Vec<u8>> {
    let mut file = reader
        .get_resource(rel, CancellationToken::new())
        .await
        .unwrap()?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).await.unwrap();
    Some(buf)
}

#[tokio::test]
async fn exact_match_short_circuits_qualifier_search() {
    let dir = package(&[
        ("Logo.png", "exact"),
        ("Logo.scale-100.png", "variant"),
    ]);
    let reader = open_package(&dir);

    let bytes = resource_bytes(&reader, "Logo.png").await.unwrap();
    assert_eq!(bytes, b"exact");
}

#[tokio::test]
async fn stem_qualifier_variant_is_found() {
    let dir = package(&[("Assets/Logo.scale-150.png", "scaled")]);
    let reader = open_package(&dir);

    let bytes = resource_bytes(&reader, "Assets/Logo.png").await.unwrap();
    assert_eq!(bytes, b"scaled");
}

#[tokio::test]
async fn directory_qualifier_variant_is_found() {
    let dir = package(&[("Strings/en-US/Resource.resw", "localized")]);
    let reader = open_package(&dir);

    let bytes = resource_bytes(&reader, "Strings/Resource.resw")
        .await
        .unwrap();
    assert_eq!(bytes, b"localized");
}

#[tokio::test]
async fn shallower_match_beats_deeper_match() {
    let dir = package(&[
        ("Logo.scale-100.png", "depth-0"),
        ("en-US/Logo.png", "depth-1"),
    ]);
    let reader = open_package(&dir);

    let bytes = resource_bytes(&reader, "Logo.png").await.unwrap();
    assert_eq!(bytes, b"depth-0");
}

#[tokio::test]
async fn total_miss_is_empty_not_an_error() {
    let dir = package(&[("Assets/Logo.png", "logo")]);
    let reader = open_package(&dir);

    let result = reader
        .get_resource("Assets/Banner.png", CancellationToken::new())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn exact_read_fails_loudly_where_resource_lookup_does_not() {
    let dir = package(&[]);
    let reader = open_package(&dir);

    let err = reader.get_file("missing.png").await.unwrap_err();
    assert!(matches!(err, ReaderError::FileNotFound(_)));

    let result = reader
        .get_resource("missing.png", CancellationToken::new())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn resolver_reports_relative_path_of_match() {
    let dir = package(&[("Strings/en-US/Resource.resw", "localized")]);
    let reader = open_package(&dir);

    let resolver = ResourceResolver::new(&reader);
    let found = resolver
        .resolve("Strings/Resource.resw", &CancellationToken::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, Path::new("Strings/en-US/Resource.resw"));
}

#[tokio::test]
async fn empty_paths_have_defined_meanings() {
    let dir = package(&[]);
    let reader = open_package(&dir);

    assert!(!reader.file_exists(""));
    assert!(reader.directory_exists(""));

    let err = reader.get_file("").await.unwrap_err();
    assert!(matches!(err, ReaderError::InvalidArgument));

    let result = reader
        .get_resource("", CancellationToken::new())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn directory_without_any_manifest_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "just-a-file.txt", "not a package");

    let err = DirectoryReader::open(dir.path()).unwrap_err();
    assert!(matches!(err, ReaderError::InvalidPackageLayout(_)));
}

#[tokio::test]
async fn missing_manifest_file_is_rejected() {
    let dir = TempDir::new().unwrap();

    let err = ManifestReader::open(dir.path().join("AppxManifest.xml")).unwrap_err();
    assert!(matches!(err, ReaderError::NotFound(_)));
}

#[tokio::test]
async fn readers_are_debug_printable() {
    let dir = package(&[]);

    let reader = DirectoryReader::open(dir.path()).unwrap();
    assert!(format!("{reader:?}").contains("DirectoryReader"));

    let reader = ManifestReader::open(dir.path().join(APPX_MANIFEST_FILE)).unwrap();
    assert!(format!("{reader:?}").contains("ManifestReader"));
}

#[tokio::test]
async fn bundle_manifest_anchors_the_reader() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), APPX_BUNDLE_MANIFEST_FILE, "<Bundle/>");

    let reader = DirectoryReader::open(dir.path()).unwrap();
    assert!(reader.manifest_path().ends_with("AppxBundleManifest.xml"));
    assert!(reader.root_directory().ends_with("AppxMetadata"));
}

#[tokio::test]
async fn open_picks_the_variant_from_the_root_shape() {
    let dir = package(&[("Assets/Logo.png", "logo")]);

    let from_dir = appxfs::open(dir.path()).unwrap();
    assert!(from_dir.file_exists("Assets/Logo.png"));

    let from_file = appxfs::open(dir.path().join(APPX_MANIFEST_FILE)).unwrap();
    assert!(from_file.file_exists("Assets/Logo.png"));
}

#[tokio::test]
async fn get_file_bytes_reads_exact_path() {
    let dir = package(&[("Assets/Logo.png", "logo bytes")]);
    let reader = open_package(&dir);

    let bytes = reader.get_file_bytes("Assets/Logo.png").await.unwrap();
    assert_eq!(&bytes[..], b"logo bytes");
}

#[tokio::test]
async fn enumeration_is_restartable_over_an_unchanged_tree() {
    let dir = package(&[
        ("a.txt", "a"),
        ("b.txt", "b"),
        ("sub/c.txt", "c"),
    ]);
    let reader = open_package(&dir);

    let mut first: Vec<String> = reader
        .enumerate_files(None, "*", true, CancellationToken::new())
        .map_ok(|e| e.path.to_string_lossy().into_owned())
        .try_collect()
        .await
        .unwrap();
    let mut second: Vec<String> = reader
        .enumerate_files(None, "*", true, CancellationToken::new())
        .map_ok(|e| e.path.to_string_lossy().into_owned())
        .try_collect()
        .await
        .unwrap();

    first.sort();
    second.sort();
    assert_eq!(first, second);
    assert_eq!(first.len(), 4); // manifest + three files
}

#[tokio::test]
async fn wildcard_filters_and_recursion_descends() {
    let dir = package(&[
        ("Logo.png", "l"),
        ("readme.txt", "r"),
        ("Assets/Banner.png", "b"),
    ]);
    let reader = open_package(&dir);

    let top: Vec<_> = reader
        .enumerate_files(None, "*.png", false, CancellationToken::new())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].file_name(), "Logo.png");

    let all: Vec<_> = reader
        .enumerate_files(None, "*.png", true, CancellationToken::new())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn file_entries_carry_size_and_relative_path() {
    let dir = package(&[("Assets/Logo.png", "12345")]);
    let reader = open_package(&dir);

    let entries: Vec<_> = reader
        .enumerate_files(Some("Assets"), "*", false, CancellationToken::new())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, Path::new("Assets/Logo.png"));
    assert_eq!(entries[0].size, 5);
}

#[tokio::test]
async fn enumerate_directories_lists_immediate_children_only() {
    let dir = package(&[
        ("Assets/Logo.png", "l"),
        ("Strings/en-US/Resource.resw", "r"),
    ]);
    let reader = open_package(&dir);

    let mut names: Vec<String> = reader
        .enumerate_directories(None, CancellationToken::new())
        .map_ok(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .try_collect()
        .await
        .unwrap();
    names.sort();
    assert_eq!(names, vec!["Assets", "Strings"]);
}

#[tokio::test]
async fn cancellation_terminates_enumeration_with_an_error() {
    let dir = package(&[
        ("a.txt", "a"),
        ("b.txt", "b"),
        ("c.txt", "c"),
    ]);
    let reader = open_package(&dir);

    let cancel = CancellationToken::new();
    let mut files = reader.enumerate_files(None, "*", false, cancel.clone());

    let first = files.try_next().await.unwrap();
    assert!(first.is_some());

    cancel.cancel();
    let err = files.try_next().await.unwrap_err();
    assert!(matches!(err, ReaderError::Cancelled));
}

#[tokio::test]
async fn cancelled_resolution_surfaces_cancellation() {
    let dir = package(&[("Assets/Logo.scale-150.png", "scaled")]);
    let reader = open_package(&dir);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = reader
        .get_resource("Assets/Logo.png", cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::Cancelled));
}

#[tokio::test]
async fn invalid_wildcard_surfaces_as_invalid_argument() {
    let dir = package(&[("a.txt", "a")]);
    let reader = open_package(&dir);

    let err = reader
        .enumerate_files(None, "[", false, CancellationToken::new())
        .try_next()
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::InvalidArgument));
}
