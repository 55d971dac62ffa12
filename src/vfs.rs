//! The filesystem collaborator. The engine never touches `std::fs` directly;
//! it goes through the [`Vfs`] trait so tests can substitute an in-memory
//! stub and hosts can wrap whatever storage they have. [`DiskFs`] is the
//! obvious implementation over the local filesystem.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// The file times the engine cares about.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metadata {
    /// Last modification time.
    pub modified: DateTime<Utc>,

    /// Creation time. Used as the publish-date fallback when a post's file
    /// name carries no date.
    pub created: DateTime<Utc>,
}

/// Filesystem operations the engine needs: stat, read, and a flat directory
/// listing.
pub trait Vfs {
    fn metadata(&self, path: &Path) -> Result<Metadata>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Entry names (not full paths) of `dir`, in unspecified order.
    fn read_dir(&self, dir: &Path) -> Result<Vec<String>>;
}

/// [`Vfs`] over the local filesystem.
pub struct DiskFs;

impl Vfs for DiskFs {
    fn metadata(&self, path: &Path) -> Result<Metadata> {
        let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        let modified = meta.modified().map_err(|e| Error::io(path, e))?;
        // creation time is unsupported on some filesystems
        let created = meta.created().unwrap_or(modified);
        Ok(Metadata {
            modified: modified.into(),
            created: created.into(),
        })
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| Error::io(path, e))
    }

    fn read_dir(&self, dir: &Path) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        for result in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = result.map_err(|e| Error::io(dir, e))?;
            entries.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(entries)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! An in-memory [`Vfs`] for parser, index, and router tests.

    use super::*;
    use chrono::TimeZone;
    use std::cell::Cell;
    use std::collections::{BTreeMap, BTreeSet};
    use std::io;
    use std::path::PathBuf;

    pub fn timestamp(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    struct MemFile {
        contents: String,
        meta: Metadata,
    }

    #[derive(Default)]
    pub struct MemFs {
        files: BTreeMap<PathBuf, MemFile>,
        dirs: BTreeSet<PathBuf>,
        poisoned: BTreeSet<PathBuf>,
        /// Counts `read_dir` calls so tests can assert the index cache
        /// avoids new I/O.
        pub read_dir_calls: Cell<usize>,
    }

    impl MemFs {
        pub fn new() -> MemFs {
            MemFs::default()
        }

        pub fn add(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
            self.add_with_times(path, contents, timestamp(2020, 1, 1), timestamp(2020, 1, 1));
        }

        pub fn add_with_times(
            &mut self,
            path: impl Into<PathBuf>,
            contents: impl Into<String>,
            modified: DateTime<Utc>,
            created: DateTime<Utc>,
        ) {
            let path = path.into();
            if let Some(parent) = path.parent() {
                self.dirs.insert(parent.to_owned());
            }
            self.files.insert(
                path,
                MemFile {
                    contents: contents.into(),
                    meta: Metadata { modified, created },
                },
            );
        }

        pub fn add_dir(&mut self, path: impl Into<PathBuf>) {
            self.dirs.insert(path.into());
        }

        /// Makes `path` appear in directory listings but fail every read.
        pub fn poison(&mut self, path: impl Into<PathBuf>) {
            let path = path.into();
            self.add(path.clone(), "");
            self.poisoned.insert(path);
        }

        fn missing(path: &Path) -> Error {
            Error::io(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            )
        }
    }

    impl Vfs for MemFs {
        fn metadata(&self, path: &Path) -> Result<Metadata> {
            if self.poisoned.contains(path) {
                return Err(Self::missing(path));
            }
            match self.files.get(path) {
                Some(file) => Ok(file.meta),
                None => Err(Self::missing(path)),
            }
        }

        fn read_to_string(&self, path: &Path) -> Result<String> {
            if self.poisoned.contains(path) {
                return Err(Self::missing(path));
            }
            match self.files.get(path) {
                Some(file) => Ok(file.contents.clone()),
                None => Err(Self::missing(path)),
            }
        }

        fn read_dir(&self, dir: &Path) -> Result<Vec<String>> {
            self.read_dir_calls.set(self.read_dir_calls.get() + 1);
            if !self.dirs.contains(dir) {
                return Err(Self::missing(dir));
            }
            Ok(self
                .files
                .keys()
                .filter(|path| path.parent() == Some(dir))
                .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
                .collect())
        }
    }
}
