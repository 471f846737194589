//! Breadth-first qualifier-fallback resource search.

mod qualifier;

use std::collections::VecDeque;
use std::path::PathBuf;

use futures::TryStreamExt;
use tokio_util::sync::CancellationToken;

use crate::error::ReaderError;
use crate::reader::PackageReader;

use qualifier::{ResourceQuery, is_qualifier_dir};

/// Pure search algorithm over a reader's query capabilities.
///
/// There is no index of available resource variants, so matches are
/// discovered by structural name-convention search over the backing store.
/// The resolver holds no state between calls; each [`resolve`] builds its
/// own work queue, so one resolver can serve concurrent lookups.
///
/// [`resolve`]: ResourceResolver::resolve
pub struct ResourceResolver<'a> {
    reader: &'a dyn PackageReader,
}

impl<'a> ResourceResolver<'a> {
    pub fn new(reader: &'a dyn PackageReader) -> Self {
        ResourceResolver { reader }
    }

    /// Find the best concrete file for `relative_path`, returning its
    /// root-relative path.
    ///
    /// An exact hit short-circuits, even when qualifier variants also exist.
    /// Otherwise directories are searched breadth-first starting at the
    /// request's directory part: each directory's own files are scanned
    /// before any qualifier-named subdirectory is examined, so a shallower
    /// match always beats a deeper one. Within one directory the first
    /// candidate in the backing store's native listing order wins; that
    /// order is not normalized. A total miss is `Ok(None)`, never an error.
    pub async fn resolve(
        &self,
        relative_path: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<PathBuf>, ReaderError> {
        if relative_path.is_empty() {
            return Ok(None);
        }
        if self.reader.file_exists(relative_path) {
            return Ok(Some(PathBuf::from(relative_path)));
        }

        let query = ResourceQuery::parse(relative_path);
        let mut queue = VecDeque::new();
        queue.push_back(query.directory().to_string());

        while let Some(dir) = queue.pop_front() {
            if cancel.is_cancelled() {
                return Err(ReaderError::Cancelled);
            }
            if !self.reader.directory_exists(&dir) {
                continue;
            }
            let scope = (!dir.is_empty()).then_some(dir.as_str());

            let mut files = self.reader.enumerate_files(scope, "*", false, cancel.clone());
            while let Some(entry) = files.try_next().await? {
                let matched = {
                    let name = entry.file_name();
                    query.is_candidate(name) && query.matches(name)
                };
                if matched {
                    return Ok(Some(entry.path));
                }
            }

            let mut subdirs = self.reader.enumerate_directories(scope, cancel.clone());
            while let Some(path) = subdirs.try_next().await? {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if is_qualifier_dir(name) {
                    queue.push_back(if dir.is_empty() {
                        name.to_string()
                    } else {
                        format!("{dir}/{name}")
                    });
                }
            }
        }

        Ok(None)
    }
}
