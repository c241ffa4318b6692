//! Host capabilities the editor needs: network fetch, file read and file save.
//!
//! Orchestration code only talks to [`Platform`], so tests can swap in an
//! in-memory implementation.

use crate::error::{QrError, Result};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub trait Platform {
    /// Fetches the body of `url`; any non-success status is an error.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Writes `bytes` to `dir/name` and returns the final path.
    ///
    /// Whatever is staged on the way must be gone once this returns, on success and on failure.
    fn save_file(&self, dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

pub struct NativePlatform {
    client: reqwest::blocking::Client,
}

impl NativePlatform {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| QrError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Platform for NativePlatform {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |e: reqwest::Error| QrError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(QrError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(fetch_error)?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body.to_vec())
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|e| QrError::io(path, e))
    }

    fn save_file(&self, dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let target = dir.join(name);

        // Dropping the staged file deletes it, so every early return cleans up.
        let mut staged = tempfile::Builder::new()
            .prefix(".qrcode-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| QrError::io(dir, e))?;
        let staged_path = staged.path().to_path_buf();
        staged
            .write_all(bytes)
            .map_err(|e| QrError::io(&staged_path, e))?;
        staged
            .persist(&target)
            .map_err(|e| QrError::io(&target, e.error))?;

        debug!(path = %target.display(), bytes = bytes.len(), "saved");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn save_leaves_only_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let platform = NativePlatform::new().unwrap();

        let path = platform.save_file(dir.path(), "qrcode-1.png", b"png").unwrap();

        assert_eq!(path, dir.path().join("qrcode-1.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"png");
        assert_eq!(entries(dir.path()), vec!["qrcode-1.png"]);
    }

    #[test]
    fn failed_save_removes_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("taken")).unwrap();
        let platform = NativePlatform::new().unwrap();

        let result = platform.save_file(dir.path(), "taken", b"png");

        assert!(matches!(result, Err(QrError::Io { .. })));
        assert_eq!(entries(dir.path()), vec!["taken"]);
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let platform = NativePlatform::new().unwrap();

        let result = platform.save_file(&dir.path().join("nope"), "qrcode-1.png", b"png");
        assert!(result.is_err());
    }

    #[test]
    fn read_missing_file_reports_path() {
        let platform = NativePlatform::new().unwrap();
        let err = platform.read_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.png"));
    }
}
