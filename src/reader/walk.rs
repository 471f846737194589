use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use glob::{MatchOptions, Pattern};
use tokio::fs;
use tokio_util::sync::CancellationToken;

use crate::error::ReaderError;

use super::entry::FileEntry;

/// Wildcards match the way Windows directory listings do: case-insensitive,
/// against the file name only.
fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

struct DirWalk {
    dir: PathBuf,
    entries: Option<fs::ReadDir>,
    cancel: CancellationToken,
}

/// Lazy stream of the absolute paths of directories immediately under `dir`.
///
/// The directory handle is opened on first poll, so the stream is restartable
/// by calling this again. Cancellation is checked before each yield and
/// terminates the stream with [`ReaderError::Cancelled`].
pub(super) fn directories(
    dir: PathBuf,
    cancel: CancellationToken,
) -> BoxStream<'static, Result<PathBuf, ReaderError>> {
    let state = DirWalk {
        dir,
        entries: None,
        cancel,
    };
    stream::try_unfold(state, |mut state| async move {
        loop {
            if state.cancel.is_cancelled() {
                return Err(ReaderError::Cancelled);
            }
            let next = match &mut state.entries {
                Some(entries) => entries.next_entry().await?,
                None => {
                    let mut entries = fs::read_dir(&state.dir).await?;
                    let first = entries.next_entry().await?;
                    state.entries = Some(entries);
                    first
                }
            };
            match next {
                Some(entry) => {
                    if entry.file_type().await?.is_dir() {
                        return Ok(Some((entry.path(), state)));
                    }
                }
                None => return Ok(None),
            }
        }
    })
    .boxed()
}

struct FileWalk {
    root: PathBuf,
    pending: Vec<PathBuf>,
    current: Option<fs::ReadDir>,
    pattern: Pattern,
    recursive: bool,
    cancel: CancellationToken,
}

/// Lazy stream of [`FileEntry`] for files under `dir` whose names match
/// `wildcard`, descending into subdirectories when `recursive`.
///
/// Entry paths are reported relative to `root`. Same cancellation contract
/// as [`directories`]. An invalid wildcard surfaces as a single
/// [`ReaderError::InvalidArgument`] element.
pub(super) fn files(
    root: PathBuf,
    dir: PathBuf,
    wildcard: &str,
    recursive: bool,
    cancel: CancellationToken,
) -> BoxStream<'static, Result<FileEntry, ReaderError>> {
    let pattern = match Pattern::new(wildcard) {
        Ok(pattern) => pattern,
        Err(_) => return stream::once(async { Err(ReaderError::InvalidArgument) }).boxed(),
    };
    let state = FileWalk {
        root,
        pending: vec![dir],
        current: None,
        pattern,
        recursive,
        cancel,
    };
    stream::try_unfold(state, |mut state| async move {
        loop {
            if state.cancel.is_cancelled() {
                return Err(ReaderError::Cancelled);
            }
            let next = match &mut state.current {
                Some(entries) => entries.next_entry().await?,
                None => match state.pending.pop() {
                    Some(dir) => {
                        state.current = Some(fs::read_dir(dir).await?);
                        continue;
                    }
                    None => return Ok(None),
                },
            };
            let Some(entry) = next else {
                state.current = None;
                continue;
            };
            if entry.file_type().await?.is_dir() {
                if state.recursive {
                    state.pending.push(entry.path());
                }
                continue;
            }
            let name = entry.file_name();
            if !state
                .pattern
                .matches_with(&name.to_string_lossy(), match_options())
            {
                continue;
            }
            let metadata = entry.metadata().await?;
            let path = entry
                .path()
                .strip_prefix(&state.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| entry.path());
            let item = FileEntry {
                path,
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            };
            return Ok(Some((item, state)));
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_matching_is_case_insensitive() {
        let pattern = Pattern::new("*.PNG").unwrap();
        assert!(pattern.matches_with("logo.png", match_options()));
        assert!(pattern.matches_with("LOGO.png", match_options()));
        assert!(!pattern.matches_with("logo.jpg", match_options()));
    }

    #[test]
    fn wildcard_does_not_cross_separators() {
        let pattern = Pattern::new("*.png").unwrap();
        assert!(!pattern.matches_with("assets/logo.png", match_options()));
    }
}
