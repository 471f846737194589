use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::fs::File;
use tokio_util::sync::CancellationToken;

use crate::error::ReaderError;
use crate::resource::ResourceResolver;

use super::entry::FileEntry;
use super::{PackageReader, walk};

/// Single-descriptor backing store: rooted at one known manifest-like file,
/// with the package contents as its sibling tree.
#[derive(Debug)]
pub struct ManifestReader {
    manifest_path: PathBuf,
    root: PathBuf,
}

impl ManifestReader {
    /// Open a reader anchored at `manifest_path`, rooted at its parent
    /// directory. Fails [`ReaderError::NotFound`] when the file does not
    /// exist, so a constructed reader always has a verified root.
    pub fn open(manifest_path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let manifest_path = manifest_path.as_ref().to_path_buf();
        if !manifest_path.is_file() {
            return Err(ReaderError::NotFound(manifest_path));
        }
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(ManifestReader {
            manifest_path,
            root,
        })
    }

    /// Path of the manifest file this reader is anchored to.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    fn absolute(&self, relative_path: Option<&str>) -> PathBuf {
        match relative_path {
            Some(rel) if !rel.is_empty() => self.root.join(rel),
            _ => self.root.clone(),
        }
    }
}

#[async_trait]
impl PackageReader for ManifestReader {
    fn root_directory(&self) -> &Path {
        &self.root
    }

    async fn get_file(&self, relative_path: &str) -> Result<File, ReaderError> {
        if relative_path.is_empty() {
            return Err(ReaderError::InvalidArgument);
        }
        match File::open(self.root.join(relative_path)).await {
            Ok(file) => Ok(file),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(ReaderError::FileNotFound(PathBuf::from(relative_path)))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn file_exists(&self, relative_path: &str) -> bool {
        !relative_path.is_empty() && self.root.join(relative_path).is_file()
    }

    fn directory_exists(&self, relative_path: &str) -> bool {
        relative_path.is_empty() || self.root.join(relative_path).is_dir()
    }

    fn enumerate_directories(
        &self,
        relative_path: Option<&str>,
        cancel: CancellationToken,
    ) -> BoxStream<'static, Result<PathBuf, ReaderError>> {
        walk::directories(self.absolute(relative_path), cancel)
    }

    fn enumerate_files(
        &self,
        relative_path: Option<&str>,
        wildcard: &str,
        recursive: bool,
        cancel: CancellationToken,
    ) -> BoxStream<'static, Result<FileEntry, ReaderError>> {
        walk::files(
            self.root.clone(),
            self.absolute(relative_path),
            wildcard,
            recursive,
            cancel,
        )
    }

    async fn get_resource(
        &self,
        relative_path: &str,
        cancel: CancellationToken,
    ) -> Result<Option<File>, ReaderError> {
        if relative_path.is_empty() {
            return Ok(None);
        }
        match ResourceResolver::new(self)
            .resolve(relative_path, &cancel)
            .await?
        {
            Some(found) => Ok(Some(self.get_file(&found.to_string_lossy()).await?)),
            None => Ok(None),
        }
    }
}
