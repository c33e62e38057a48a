//! Input traversal: which files become assets.
//!
//! Every root is walked in lexical order so that ingest order (and therefore
//! symbol numbering) is stable between runs. Directories are descended but
//! never emitted, and files whose basename starts with `.` are skipped.
//! Dot-prefixed directories are still descended.
//!
//! A root is keyed exactly as given. Everything below it is keyed by the
//! lexically cleaned join of root and relative path, so `./` and `a/../`
//! segments and doubled separators do not reach the table.

use crate::debug;
use jwalk::WalkDir;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// A file accepted for embedding.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The path exactly as traversed (root prefix and separators preserved).
    pub path: String,
    /// Seconds since the Unix epoch.
    pub mtime: i64,
    pub bytes: Vec<u8>,
}

/// Why a file was left out of the output.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("read failed: {0}")]
    Read(#[from] io::Error),

    #[error("path is not valid UTF-8")]
    NonUtf8,
}

/// A file that was dropped and the reason.
#[derive(Debug)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// A root whose walk stopped early.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("cannot read root `{}`", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("traversal failed under `{}`", root.display())]
    Traverse {
        root: PathBuf,
        #[source]
        source: jwalk::Error,
    },
}

/// Everything the walk produced, including what it had to leave out.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub entries: Vec<Entry>,
    pub skipped: Vec<Skipped>,
    pub failed_roots: Vec<WalkError>,
}

/// Walk all roots in order. A failing root does not stop later roots.
pub fn walk<P: AsRef<Path>>(roots: &[P]) -> WalkReport {
    let mut report = WalkReport::default();
    for root in roots {
        if let Err(e) = walk_root(root.as_ref(), &mut report) {
            report.failed_roots.push(e);
        }
    }
    report
}

/// Walk a single root, appending accepted and skipped files to `report`.
///
/// Returns an error when traversal itself fails; files gathered before the
/// failure stay in the report.
pub fn walk_root(root: &Path, report: &mut WalkReport) -> Result<(), WalkError> {
    fs::symlink_metadata(root).map_err(|source| WalkError::Root {
        path: root.to_path_buf(),
        source,
    })?;

    let walker = WalkDir::new(root)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false);

    for entry in walker {
        let entry = entry.map_err(|source| WalkError::Traverse {
            root: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_dir() || is_hidden(entry.file_name()) {
            continue;
        }

        let path = entry.path();
        let key = if entry.depth == 0 {
            path.clone()
        } else {
            clean(&path)
        };
        match read_entry(&path, &key) {
            Ok(accepted) => report.entries.push(accepted),
            Err(reason) => {
                debug!("walk"; "skipping {}: {}", path.display(), reason);
                report.skipped.push(Skipped { path, reason });
            }
        }
    }
    Ok(())
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

fn read_entry(path: &Path, key: &Path) -> Result<Entry, SkipReason> {
    let logical = key.to_str().ok_or(SkipReason::NonUtf8)?.to_string();
    let mtime = fs::symlink_metadata(path)?.modified()?;
    let bytes = fs::read(path)?;
    Ok(Entry {
        path: logical,
        mtime: unix_seconds(mtime),
        bytes,
    })
}

/// Lexically clean `path`: drop `.` segments and doubled separators, fold
/// `name/..` pairs. Never touches the filesystem.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.into_iter().collect()
}

/// Whole seconds since the epoch, rounding toward negative infinity.
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => {
            let before = before.duration();
            let secs = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
            if before.subsec_nanos() > 0 {
                -secs - 1
            } else {
                -secs
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn tree(files: &[(&str, &[u8])]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn rel_paths(report: &WalkReport, root: &Path) -> Vec<String> {
        report
            .entries
            .iter()
            .map(|e| {
                Path::new(&e.path)
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_dotfile_skipped() {
        let dir = tree(&[(".hidden", b"x"), ("visible", b"y")]);
        let report = walk(&[dir.path()]);
        assert_eq!(rel_paths(&report, dir.path()), ["visible"]);
        assert_eq!(report.entries[0].bytes, b"y");
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_directories_not_emitted() {
        let dir = tree(&[("css/site.css", b"body{}"), ("index.html", b"<html>")]);
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        let report = walk(&[dir.path()]);
        assert_eq!(rel_paths(&report, dir.path()), ["css/site.css", "index.html"]);
    }

    #[test]
    fn test_hidden_directory_descended() {
        let dir = tree(&[(".well-known/security.txt", b"contact")]);
        let report = walk(&[dir.path()]);
        assert_eq!(rel_paths(&report, dir.path()), [".well-known/security.txt"]);
    }

    #[test]
    fn test_paths_keep_root_prefix() {
        let dir = tree(&[("a.txt", b"hi")]);
        let report = walk(&[dir.path()]);
        assert!(report.entries[0].path.starts_with(dir.path().to_str().unwrap()));
    }

    #[test]
    fn test_missing_root_does_not_stop_later_roots() {
        let dir = tree(&[("a.txt", b"hi")]);
        let missing = dir.path().join("does-not-exist");
        let report = walk(&[missing.as_path(), dir.path()]);
        assert_eq!(report.failed_roots.len(), 1);
        assert!(matches!(report.failed_roots[0], WalkError::Root { .. }));
        assert_eq!(rel_paths(&report, dir.path()), ["a.txt"]);
    }

    #[test]
    fn test_file_root_is_ingested() {
        let dir = tree(&[("single.bin", &[0, 1, 2])]);
        let file = dir.path().join("single.bin");
        let report = walk(&[file.as_path()]);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].bytes, [0, 1, 2]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_skipped() {
        let dir = tree(&[("ok.txt", b"ok")]);
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling"))
            .unwrap();
        let report = walk(&[dir.path()]);
        assert_eq!(rel_paths(&report, dir.path()), ["ok.txt"]);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path.ends_with("dangling"));
        assert!(report.failed_roots.is_empty());
    }

    #[test]
    fn test_mtime_recorded() {
        let dir = tree(&[("a.txt", b"hi")]);
        let stamp = UNIX_EPOCH + Duration::from_secs(1_718_461_845);
        fs::File::options()
            .write(true)
            .open(dir.path().join("a.txt"))
            .unwrap()
            .set_modified(stamp)
            .unwrap();
        let report = walk(&[dir.path()]);
        assert_eq!(report.entries[0].mtime, 1_718_461_845);
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(Path::new("./a.txt")), Path::new("a.txt"));
        assert_eq!(clean(Path::new("./sub/rand.bin")), Path::new("sub/rand.bin"));
        assert_eq!(clean(Path::new("static//css/./site.css")), Path::new("static/css/site.css"));
        assert_eq!(clean(Path::new("a/../b/c")), Path::new("b/c"));
        assert_eq!(clean(Path::new("../x/y")), Path::new("../x/y"));
        assert_eq!(clean(Path::new("/../etc")), Path::new("/etc"));
        assert_eq!(clean(Path::new("./")), Path::new("."));
    }

    #[test]
    fn test_dot_segments_cleaned_below_root() {
        let dir = tree(&[("sub/rand.bin", b"r"), ("a.txt", b"a")]);
        let root = dir.path().join(".").join("sub").join("..");
        let report = walk(&[root.as_path()]);
        let keys: Vec<_> = report.entries.iter().map(|e| e.path.as_str()).collect();
        let expect_a = dir.path().join("a.txt");
        let expect_sub = dir.path().join("sub").join("rand.bin");
        assert_eq!(keys, [expect_a.to_str().unwrap(), expect_sub.to_str().unwrap()]);
    }

    #[test]
    fn test_relative_dot_root() {
        // Tests run from the package root, which holds `src/`.
        let report = walk(&["./src"]);
        let keys: Vec<_> = report.entries.iter().map(|e| e.path.replace('\\', "/")).collect();
        assert!(keys.iter().any(|k| k == "src/walk.rs"));
        assert!(keys.iter().all(|k| !k.starts_with("./")));
    }

    #[test]
    fn test_file_root_keyed_as_given() {
        let dir = tree(&[("single.bin", &[7])]);
        let root = format!("{}/./single.bin", dir.path().display());
        let report = walk(&[root.as_str()]);
        assert_eq!(report.entries[0].path, root);
    }

    #[test]
    fn test_unix_seconds_before_epoch() {
        assert_eq!(unix_seconds(UNIX_EPOCH - Duration::from_millis(1500)), -2);
        assert_eq!(unix_seconds(UNIX_EPOCH - Duration::from_secs(3)), -3);
        assert_eq!(unix_seconds(UNIX_EPOCH + Duration::from_millis(1500)), 1);
    }
}
