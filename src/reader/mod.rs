pub mod directory;
pub mod entry;
pub mod manifest;
mod walk;

pub use directory::DirectoryReader;
pub use entry::FileEntry;
pub use manifest::ManifestReader;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use crate::error::ReaderError;

/// Well-known name of the default package manifest inside a package root.
pub const APPX_MANIFEST_FILE: &str = "AppxManifest.xml";

/// Well-known root-relative path of the manifest inside a package bundle.
pub const APPX_BUNDLE_MANIFEST_FILE: &str = "AppxMetadata/AppxBundleManifest.xml";

/// Uniform read-only view over an application package tree.
///
/// A package on disk is either a loose unpacked directory or a single
/// manifest file with the package contents as its siblings. Both shapes
/// implement this one contract; [`DirectoryReader`] resolves which manifest
/// to anchor to and then forwards to a [`ManifestReader`], so the
/// enumeration and resource-resolution logic exists exactly once.
///
/// Readers hold no open handles between calls and no mutable state beyond
/// the immutable root, so sharing one across tasks is safe as long as the
/// underlying filesystem tolerates concurrent reads. Dropping a reader is
/// its release; there is nothing else to tear down.
#[async_trait]
pub trait PackageReader: Send + Sync {
    /// Directory all relative paths are resolved against.
    fn root_directory(&self) -> &Path;

    /// Open the exact `relative_path` under the root for reading.
    ///
    /// No qualifier fallback is attempted: a miss is
    /// [`ReaderError::FileNotFound`], and an empty path is
    /// [`ReaderError::InvalidArgument`]. The returned file is caller-owned;
    /// the reader keeps no reference to it.
    async fn get_file(&self, relative_path: &str) -> Result<File, ReaderError>;

    /// Whether the exact `relative_path` exists as a file.
    ///
    /// An empty path is defined to be false.
    fn file_exists(&self, relative_path: &str) -> bool;

    /// Whether `relative_path` exists as a directory.
    ///
    /// An empty path means the root and is always true.
    fn directory_exists(&self, relative_path: &str) -> bool;

    /// Absolute paths of the directories immediately under `relative_path`
    /// (the root when `None`), non-recursive.
    ///
    /// The stream is lazy and restartable; `cancel` is observed before each
    /// yield and terminates the stream with [`ReaderError::Cancelled`].
    fn enumerate_directories(
        &self,
        relative_path: Option<&str>,
        cancel: CancellationToken,
    ) -> BoxStream<'static, Result<PathBuf, ReaderError>>;

    /// Files under `relative_path` (the root when `None`) whose names match
    /// `wildcard`, descending into subdirectories when `recursive`.
    ///
    /// Same cancellation contract as [`enumerate_directories`].
    ///
    /// [`enumerate_directories`]: PackageReader::enumerate_directories
    fn enumerate_files(
        &self,
        relative_path: Option<&str>,
        wildcard: &str,
        recursive: bool,
        cancel: CancellationToken,
    ) -> BoxStream<'static, Result<FileEntry, ReaderError>>;

    /// Qualifier-fallback lookup via [`ResourceResolver`].
    ///
    /// Returns the best-matching concrete file for a resource request such
    /// as `Assets/Logo.png`, considering qualifier-decorated variants like
    /// `Assets/Logo.scale-150.png` and `Assets/en-US/Logo.png`. A total
    /// miss is `Ok(None)`, never an error; so is an empty path.
    ///
    /// [`ResourceResolver`]: crate::resource::ResourceResolver
    async fn get_resource(
        &self,
        relative_path: &str,
        cancel: CancellationToken,
    ) -> Result<Option<File>, ReaderError>;

    /// Read the exact `relative_path` fully into memory.
    async fn get_file_bytes(&self, relative_path: &str) -> Result<Bytes, ReaderError> {
        let mut file = self.get_file(relative_path).await?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).await?;
        Ok(Bytes::from(buffer))
    }
}

/// Open `root` as whichever backing-store variant matches its shape: a
/// directory is probed for a manifest, anything else is treated as a
/// manifest file path.
pub fn open(root: impl AsRef<Path>) -> Result<Box<dyn PackageReader>, ReaderError> {
    let root = root.as_ref();
    if root.is_dir() {
        Ok(Box::new(DirectoryReader::open(root)?))
    } else {
        Ok(Box::new(ManifestReader::open(root)?))
    }
}
