//! Writing downloaded reports to disk
//!
//! The body goes to a temporary file in the target directory first and is
//! then persisted under its final name, so a partial report is never left
//! behind. An existing file is not overwritten; ` (n)` is appended instead.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Pick a name in `dir` that does not exist yet
pub fn unique_target(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };
    (1u32..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Write `bytes` as `filename` inside `dir`
pub fn write_report(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let mut temp = tempfile::Builder::new()
        .prefix(".roi-report-")
        .suffix(".part")
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;

    let target = unique_target(dir, filename);
    temp.persist_noclobber(&target).map_err(|e| e.error)?;
    Ok(target)
}

/// [`write_report`] off the async executor
pub async fn save_report(dir: PathBuf, filename: String, bytes: Vec<u8>) -> io::Result<PathBuf> {
    tokio::task::spawn_blocking(move || write_report(&dir, &filename, &bytes))
        .await
        .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "roi.pdf", b"report").unwrap();

        assert_eq!(path, dir.path().join("roi.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"report");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "roi.pdf", b"first").unwrap();
        let second = write_report(dir.path(), "roi.pdf", b"second").unwrap();
        let third = write_report(dir.path(), "roi.pdf", b"third").unwrap();

        assert_eq!(second, dir.path().join("roi (1).pdf"));
        assert_eq!(third, dir.path().join("roi (2).pdf"));
        assert_eq!(std::fs::read(dir.path().join("roi.pdf")).unwrap(), b"first");
    }

    #[test]
    fn names_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "report", b"a").unwrap();
        assert_eq!(unique_target(dir.path(), "report"), dir.path().join("report (1)"));
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("reports");
        let path = save_report(nested.clone(), "r.pdf".into(), b"x".to_vec())
            .await
            .unwrap();
        assert_eq!(path, nested.join("r.pdf"));
    }
}
