use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::fs::File;
use tokio_util::sync::CancellationToken;

use crate::error::ReaderError;

use super::entry::FileEntry;
use super::manifest::ManifestReader;
use super::{APPX_BUNDLE_MANIFEST_FILE, APPX_MANIFEST_FILE, PackageReader};

/// Directory backing store: probes a package root for the default package
/// manifest, then the bundle manifest, and forwards every operation to a
/// [`ManifestReader`] anchored at whichever was found.
#[derive(Debug)]
pub struct DirectoryReader {
    inner: ManifestReader,
}

impl DirectoryReader {
    /// Open a reader over the loose package tree at `root`.
    ///
    /// Fails [`ReaderError::NotFound`] when `root` is not a directory and
    /// [`ReaderError::InvalidPackageLayout`] when it contains neither
    /// manifest variant.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ReaderError::NotFound(root.to_path_buf()));
        }

        let manifest = root.join(APPX_MANIFEST_FILE);
        if manifest.is_file() {
            return Ok(DirectoryReader {
                inner: ManifestReader::open(manifest)?,
            });
        }

        let bundle = root.join(APPX_BUNDLE_MANIFEST_FILE);
        if bundle.is_file() {
            return Ok(DirectoryReader {
                inner: ManifestReader::open(bundle)?,
            });
        }

        Err(ReaderError::InvalidPackageLayout(root.to_path_buf()))
    }

    /// Path of the manifest the probe settled on.
    pub fn manifest_path(&self) -> &Path {
        self.inner.manifest_path()
    }
}

#[async_trait]
impl PackageReader for DirectoryReader {
    fn root_directory(&self) -> &Path {
        self.inner.root_directory()
    }

    async fn get_file(&self, relative_path: &str) -> Result<File, ReaderError> {
        if relative_path.is_empty() {
            return Err(ReaderError::InvalidArgument);
        }
        self.inner.get_file(relative_path).await
    }

    fn file_exists(&self, relative_path: &str) -> bool {
        !relative_path.is_empty() && self.inner.file_exists(relative_path)
    }

    fn directory_exists(&self, relative_path: &str) -> bool {
        relative_path.is_empty() || self.inner.directory_exists(relative_path)
    }

    fn enumerate_directories(
        &self,
        relative_path: Option<&str>,
        cancel: CancellationToken,
    ) -> BoxStream<'static, Result<PathBuf, ReaderError>> {
        self.inner.enumerate_directories(relative_path, cancel)
    }

    fn enumerate_files(
        &self,
        relative_path: Option<&str>,
        wildcard: &str,
        recursive: bool,
        cancel: CancellationToken,
    ) -> BoxStream<'static, Result<FileEntry, ReaderError>> {
        self.inner
            .enumerate_files(relative_path, wildcard, recursive, cancel)
    }

    async fn get_resource(
        &self,
        relative_path: &str,
        cancel: CancellationToken,
    ) -> Result<Option<File>, ReaderError> {
        if relative_path.is_empty() {
            return Ok(None);
        }
        self.inner.get_resource(relative_path, cancel).await
    }
}
