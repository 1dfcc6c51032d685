//! Traverser over a directory tree
//!
//! Directories are interior nodes, everything else is a leaf. Symbolic links
//! are reported as the link itself and never followed, so a tree with link
//! cycles still has finite descendants.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::traverser::{ParentCache, Traverser};

/// A directory entry seen by the traverser
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FsEntry {
    path: PathBuf,
    is_dir: bool,
}

impl FsEntry {
    /// Look up `path` on disk
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match fs::symlink_metadata(&path) {
            Ok(meta) => Ok(FsEntry {
                is_dir: meta.is_dir(),
                path,
            }),
            Err(e) => Err(lookup_error(path, e)),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn file_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }
}

fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
    let path = path.into();
    debug!(path = %path.display(), error = %source, "file-system access failed");
    Error::io(path, source)
}

fn lookup_error(path: PathBuf, source: std::io::Error) -> Error {
    if source.kind() == std::io::ErrorKind::NotFound {
        Error::NotFound { path }
    } else {
        io_error(path, source)
    }
}

/// Absolute form of `path` with `.`, `..` and symbolic links resolved
fn canonical(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| lookup_error(path.to_path_buf(), e))
}

/// Entries of `dir`, sorted by file name
fn list_dir(dir: &Path) -> Result<Vec<FsEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
        let entry = entry.map_err(|e| io_error(dir, e))?;
        let file_type = entry.file_type().map_err(|e| io_error(entry.path(), e))?;
        entries.push(FsEntry {
            path: entry.path(),
            is_dir: file_type.is_dir(),
        });
    }
    entries.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

/// Cursor over the file system rooted at one entry.
///
/// A directory is listed at most once per traverser and per purpose
/// (children, following siblings, preceding siblings).
#[derive(Debug)]
pub struct FsTraverser {
    origin: FsEntry,
    /// Ancestors above this directory are not reported
    boundary: Option<Arc<Path>>,
    children: Option<std::vec::IntoIter<FsEntry>>,
    following: ParentCache<std::vec::IntoIter<FsEntry>>,
    preceding: ParentCache<std::vec::IntoIter<FsEntry>>,
}

impl FsTraverser {
    /// Traverser at `path`, which must exist
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        FsEntry::from_path(path).map(Self::from_entry)
    }

    pub fn from_entry(origin: FsEntry) -> Self {
        Self::bounded(origin, None)
    }

    /// Traverser at `path` whose ancestors stop at `root`.
    ///
    /// Both paths are canonicalized first, so they may be spelled
    /// differently (relative, with `.` or `..`, through a link). Every
    /// entry the traverser reports is then absolute. `root` itself reports
    /// no parent and no siblings.
    pub fn with_root(path: impl Into<PathBuf>, root: impl AsRef<Path>) -> Result<Self> {
        let root = canonical(root.as_ref())?;
        let origin = FsEntry::from_path(canonical(&path.into())?)?;
        Ok(Self::bounded(origin, Some(Arc::from(root))))
    }

    fn bounded(origin: FsEntry, boundary: Option<Arc<Path>>) -> Self {
        FsTraverser {
            origin,
            boundary,
            children: None,
            following: ParentCache::Uninitialized,
            preceding: ParentCache::Uninitialized,
        }
    }

    pub fn entry(&self) -> &FsEntry {
        &self.origin
    }

    fn parent_path(&self) -> Option<&Path> {
        if self.boundary.as_deref() == Some(self.origin.path.as_path()) {
            return None;
        }
        self.origin
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Sibling listing of the origin, `None` when it has no parent
    fn siblings(&self) -> Result<Option<std::vec::IntoIter<FsEntry>>> {
        match self.parent_path() {
            Some(parent) => Ok(Some(list_dir(parent)?.into_iter())),
            None => Ok(None),
        }
    }
}

impl Traverser for FsTraverser {
    type Node = FsEntry;
    type Error = Error;

    fn origin(&self) -> FsEntry {
        self.origin.clone()
    }

    fn try_get_parent(&self) -> Result<Option<FsEntry>> {
        Ok(self.parent_path().map(|p| FsEntry {
            path: p.to_path_buf(),
            is_dir: true,
        }))
    }

    fn try_get_has_child(&mut self) -> Result<Option<bool>> {
        if !self.origin.is_dir {
            return Ok(Some(false));
        }
        let mut probe =
            fs::read_dir(&self.origin.path).map_err(|e| io_error(&self.origin.path, e))?;
        match probe.next() {
            Some(Err(e)) => Err(io_error(&self.origin.path, e)),
            next => Ok(Some(next.is_some())),
        }
    }

    fn try_get_next_child(&mut self) -> Result<Option<FsEntry>> {
        if !self.origin.is_dir {
            return Ok(None);
        }
        if self.children.is_none() {
            self.children = Some(list_dir(&self.origin.path)?.into_iter());
        }
        Ok(self.children.as_mut().and_then(Iterator::next))
    }

    fn try_get_next_sibling(&mut self) -> Result<Option<FsEntry>> {
        if !self.following.is_resolved() {
            let name = self.origin.file_name().map(OsStr::to_os_string);
            let listing = self.siblings()?.map(|mut entries| {
                // Skip up to and including the origin itself
                let _ = entries.by_ref().find(|e| e.file_name() == name.as_deref());
                entries
            });
            self.following = match listing {
                Some(entries) => ParentCache::HasParent(entries),
                None => ParentCache::NoParent,
            };
        }
        match &mut self.following {
            ParentCache::HasParent(entries) => Ok(entries.next()),
            _ => Ok(None),
        }
    }

    fn try_get_previous_sibling(&mut self) -> Result<Option<FsEntry>> {
        if !self.preceding.is_resolved() {
            self.preceding = match self.siblings()? {
                Some(entries) => ParentCache::HasParent(entries),
                None => ParentCache::NoParent,
            };
        }
        let ParentCache::HasParent(entries) = &mut self.preceding else {
            return Ok(None);
        };
        match entries.next() {
            Some(entry) if entry.path != self.origin.path => Ok(Some(entry)),
            _ => {
                entries.by_ref().for_each(drop);
                Ok(None)
            }
        }
    }

    fn convert_to_traverser(&self, node: FsEntry) -> Result<Self> {
        Ok(Self::bounded(node, self.boundary.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{AxisCursor, TraverserExt};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    /// root/
    ///   a/
    ///     a1.txt
    ///     a2/
    ///   b.txt
    ///   c/
    fn sample() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("a")).unwrap();
        fs::write(root.join("a").join("a1.txt"), b"one").unwrap();
        fs::create_dir(root.join("a").join("a2")).unwrap();
        fs::write(root.join("b.txt"), b"two").unwrap();
        fs::create_dir(root.join("c")).unwrap();
        dir
    }

    fn relative(root: &Path, entries: Vec<FsEntry>) -> Vec<String> {
        entries
            .iter()
            .map(|e| {
                let rel = e.path().strip_prefix(root).unwrap_or(e.path());
                rel.to_string_lossy().replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_descendants_sorted_preorder() {
        let dir = sample();
        let all = FsTraverser::new(dir.path())
            .unwrap()
            .descendants()
            .try_to_vec()
            .unwrap();
        assert_eq!(
            relative(dir.path(), all),
            ["a", "a/a1.txt", "a/a2", "b.txt", "c"]
        );
    }

    #[test]
    fn test_siblings_by_name() {
        let dir = sample();
        let b = dir.path().join("b.txt");
        let before = FsTraverser::new(&b).unwrap().before_self().try_to_vec().unwrap();
        let after = FsTraverser::new(&b)
            .unwrap()
            .after_self_and_self()
            .try_to_vec()
            .unwrap();
        assert_eq!(relative(dir.path(), before), ["a"]);
        assert_eq!(relative(dir.path(), after), ["b.txt", "c"]);
    }

    #[test]
    fn test_ancestors_stop_at_root() {
        let dir = sample();
        let leaf = dir.path().join("a").join("a1.txt");
        let up = FsTraverser::with_root(&leaf, dir.path())
            .unwrap()
            .ancestors()
            .try_to_vec()
            .unwrap();
        assert_eq!(up.len(), 2);
        assert_eq!(up[1].path(), fs::canonicalize(dir.path()).unwrap());
        assert!(up.iter().all(FsEntry::is_dir));

        let mut root = FsTraverser::with_root(dir.path(), dir.path()).unwrap();
        assert_eq!(root.try_get_parent().unwrap(), None);
        assert_eq!(root.try_get_next_sibling().unwrap(), None);
        assert_eq!(root.try_get_previous_sibling().unwrap(), None);
    }

    #[test]
    fn test_root_boundary_spelled_differently() {
        let dir = sample();
        let leaf = dir.path().join(".").join("a").join("a1.txt");
        let root = dir.path().join("a").join("..");
        let up = FsTraverser::with_root(&leaf, &root)
            .unwrap()
            .ancestors_and_self()
            .try_to_vec()
            .unwrap();
        let base = fs::canonicalize(dir.path()).unwrap();
        let got: Vec<_> = up.iter().map(|e| e.path().to_path_buf()).collect();
        assert_eq!(got, [base.join("a").join("a1.txt"), base.join("a"), base.clone()]);

        let err = FsTraverser::with_root(&leaf, dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_sibling_axes_stay_exhausted() {
        let dir = sample();
        let mut after = FsTraverser::new(dir.path().join("b.txt")).unwrap().after_self();
        let next = after.try_next().unwrap().map(|e| e.path().to_path_buf());
        assert_eq!(next, Some(dir.path().join("c")));
        for _ in 0..3 {
            assert!(after.try_next().unwrap().is_none());
        }

        let mut before = FsTraverser::new(dir.path().join("a")).unwrap().before_self_and_self();
        let first = before.try_next().unwrap().map(|e| e.path().to_path_buf());
        assert_eq!(first, Some(dir.path().join("a")));
        for _ in 0..3 {
            assert!(before.try_next().unwrap().is_none());
        }
    }

    #[test]
    fn test_leaf_hints() {
        let dir = sample();
        let mut file = FsTraverser::new(dir.path().join("b.txt")).unwrap();
        assert_eq!(file.try_get_has_child().unwrap(), Some(false));
        assert_eq!(file.try_get_next_child().unwrap(), None);

        let mut empty = FsTraverser::new(dir.path().join("c")).unwrap();
        assert_eq!(empty.try_get_has_child().unwrap(), Some(false));

        let mut full = FsTraverser::new(dir.path().join("a")).unwrap();
        assert_eq!(full.try_get_has_child().unwrap(), Some(true));
        assert_eq!(full.children().try_count().unwrap(), 2);
    }

    #[test]
    fn test_missing_start_path() {
        let dir = sample();
        let err = FsTraverser::new(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(err.path(), dir.path().join("nope"));
    }

    #[test]
    fn test_io_error_propagates_and_ends_axis() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        let dir = sample();
        let gone = dir.path().join("c");
        let t = FsTraverser::new(&gone).unwrap();
        fs::remove_dir(&gone).unwrap();

        let mut axis = t.descendants_and_self();
        assert_eq!(axis.try_next().unwrap().map(|e| e.path().to_path_buf()), Some(gone.clone()));
        match axis.try_next() {
            Err(Error::Io { path, source }) => {
                assert_eq!(path, gone);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected i/o error, got {:?}", other),
        }
        assert!(axis.try_next().unwrap().is_none());
    }
}
