// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use super::DocumentStore;
use crate::ops::{CommitError, Committed};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush file contents and the rename to stable storage where possible.
    Durable,
}

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    SymlinkRefused { path: PathBuf },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::SymlinkRefused { .. } => None,
        }
    }
}

impl From<StoreError> for CommitError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io { path, source } => CommitError::Persist { path, source },
            StoreError::SymlinkRefused { path } => CommitError::Persist {
                source: io::Error::other(format!("refusing to write through symlink at {path:?}")),
                path,
            },
        }
    }
}

/// A JSON file on disk acting as the canonical document.
///
/// The text is cached in memory; every publish writes the file first and only updates the cache
/// once the write landed.
#[derive(Debug)]
pub struct FileDocumentStore {
    path: PathBuf,
    durability: WriteDurability,
    text: Mutex<String>,
}

impl FileDocumentStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let text = fs::read_to_string(&path)
            .map_err(|source| StoreError::Io { path: path.clone(), source })?;
        Ok(Self { path, durability: WriteDurability::default(), text: Mutex::new(text) })
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileDocumentStore {
    fn text(&self) -> String {
        self.text.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn replace_with(
        &self,
        update: &mut dyn FnMut(&str) -> Result<Committed, CommitError>,
    ) -> Result<Committed, CommitError> {
        let mut text = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        let mut committed = update(&text)?;
        if !committed.text.ends_with('\n') {
            committed.text.push('\n');
        }
        write_atomic(&self.path, committed.text.as_bytes(), self.durability)?;
        *text = committed.text.clone();
        Ok(committed)
    }
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused { path: path.to_path_buf() });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path = parent.join(format!(".jsonode.tmp.{}.{}", file_name.to_string_lossy(), nanos));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;

    if let Err(source) = file.write_all(contents) {
        drop(file);
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io { path: tmp_path, source });
    }

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io { path: path.to_path_buf(), source });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent)
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
            dir.sync_all()
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    use rstest::{fixture, rstest};

    use super::{FileDocumentStore, StoreError, WriteDurability};
    use crate::model::{JsonPath, StagedFields, ValueKind};
    use crate::ops::{commit_document, CommitError, CommitErrorKind, CommitOptions, Committed};
    use crate::store::DocumentStore;

    static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    struct TempDir {
        path: PathBuf,
    }

    impl TempDir {
        fn new(prefix: &str) -> Self {
            let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
            let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
            let mut path = env::temp_dir();
            path.push(format!("jsonode-{prefix}-{}-{nanos}-{counter}", std::process::id()));
            std::fs::create_dir_all(&path).unwrap();
            Self { path }
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    struct FileCtx {
        _tmp: TempDir,
        doc_path: PathBuf,
    }

    #[fixture]
    fn ctx() -> FileCtx {
        let tmp = TempDir::new("file-store");
        let doc_path = tmp.path.join("doc.json");
        std::fs::write(&doc_path, "{\"a\": 1}").unwrap();
        FileCtx { _tmp: tmp, doc_path }
    }

    #[rstest]
    fn open_reads_existing_text(ctx: FileCtx) {
        let store = FileDocumentStore::open(&ctx.doc_path).unwrap();
        assert_eq!(store.text(), "{\"a\": 1}");
        assert_eq!(store.path(), ctx.doc_path.as_path());
    }

    #[rstest]
    #[case(WriteDurability::BestEffort)]
    #[case(WriteDurability::Durable)]
    fn publish_writes_file_and_cache(ctx: FileCtx, #[case] durability: WriteDurability) {
        let store = FileDocumentStore::open(&ctx.doc_path).unwrap().with_durability(durability);
        let next = store
            .replace_with(&mut |_| Ok(Committed::replacement("{\n  \"a\": 2\n}")))
            .unwrap()
            .text;

        assert_eq!(next, "{\n  \"a\": 2\n}\n");
        assert_eq!(store.text(), next);
        assert_eq!(std::fs::read_to_string(&ctx.doc_path).unwrap(), next);

        let leftovers = std::fs::read_dir(ctx.doc_path.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".jsonode.tmp."))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[rstest]
    fn failed_update_leaves_file_untouched(ctx: FileCtx) {
        let store = FileDocumentStore::open(&ctx.doc_path).unwrap();
        store
            .replace_with(&mut |_| {
                Err(CommitError::InvalidTarget { path: JsonPath::root(), found: ValueKind::Null })
            })
            .unwrap_err();
        assert_eq!(std::fs::read_to_string(&ctx.doc_path).unwrap(), "{\"a\": 1}");
        assert_eq!(store.text(), "{\"a\": 1}");
    }

    #[rstest]
    fn persist_failure_keeps_cached_text(ctx: FileCtx) {
        let store = FileDocumentStore::open(&ctx.doc_path).unwrap();
        std::fs::remove_dir_all(ctx.doc_path.parent().unwrap()).unwrap();

        let err = store.replace_with(&mut |_| Ok(Committed::replacement("{}"))).unwrap_err();
        assert_eq!(err.kind(), CommitErrorKind::Persist);
        assert_eq!(store.text(), "{\"a\": 1}");
    }

    #[rstest]
    fn concurrent_commits_keep_every_field(ctx: FileCtx) {
        let store = FileDocumentStore::open(&ctx.doc_path).unwrap();
        let keys = ["w1", "w2", "w3", "w4"];

        std::thread::scope(|scope| {
            for key in keys {
                let store = &store;
                scope.spawn(move || {
                    let staged: StagedFields = [(key.to_owned(), "done".to_owned())].into_iter().collect();
                    store
                        .replace_with(&mut |text| {
                            commit_document(text, &JsonPath::root(), &staged, CommitOptions::default())
                        })
                        .unwrap();
                });
            }
        });

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&ctx.doc_path).unwrap()).unwrap();
        assert_eq!(on_disk["a"], 1);
        for key in keys {
            assert_eq!(on_disk[key], "done", "lost write for {key}");
        }
        assert_eq!(store.text(), std::fs::read_to_string(&ctx.doc_path).unwrap());
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let tmp = TempDir::new("file-store-missing");
        let err = FileDocumentStore::open(tmp.path.join("absent.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
