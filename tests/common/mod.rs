#![allow(dead_code)]

use qr_editor::error::{QrError, Result};
use qr_editor::platform::Platform;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory [`Platform`]: canned HTTP bodies and files, saves recorded instead of written.
#[derive(Default)]
pub struct MemoryPlatform {
    pub responses: HashMap<String, Vec<u8>>,
    pub files: HashMap<PathBuf, Vec<u8>>,
    pub fail_saves: bool,
    pub fetched: RefCell<Vec<String>>,
    pub saved: RefCell<Vec<(PathBuf, Vec<u8>)>>,
    /// Staged buffers currently alive; must be back to zero after every save.
    pub staged: Cell<usize>,
    pub staged_total: Cell<usize>,
}

impl MemoryPlatform {
    pub fn respond(mut self, url: impl Into<String>, body: Vec<u8>) -> Self {
        self.responses.insert(url.into(), body);
        self
    }

    pub fn file(mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        self.files.insert(path.into(), bytes);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.borrow().len()
    }
}

struct StagedGuard<'a>(&'a Cell<usize>);

impl Drop for StagedGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

impl Platform for MemoryPlatform {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetched.borrow_mut().push(url.to_string());
        self.responses.get(url).cloned().ok_or_else(|| QrError::Status {
            url: url.to_string(),
            status: 404,
        })
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            QrError::io(path, std::io::Error::from(std::io::ErrorKind::NotFound))
        })
    }

    fn save_file(&self, dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.staged.set(self.staged.get() + 1);
        self.staged_total.set(self.staged_total.get() + 1);
        let _guard = StagedGuard(&self.staged);

        let target = dir.join(name);
        if self.fail_saves {
            return Err(QrError::io(
                &target,
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ));
        }
        self.saved.borrow_mut().push((target.clone(), bytes.to_vec()));
        Ok(target)
    }
}

pub fn png(surface: &image::RgbaImage) -> Vec<u8> {
    qr_editor::export::encode_png(surface).unwrap()
}
